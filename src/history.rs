// Kotoba Crossword – A vocabulary crossword game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use super::word::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleResult {
    pub word_count: usize,
    pub mode: Mode,
    pub time_seconds: u32,
    pub completion_percentage: u32,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl fmt::Display for PuzzleResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} words ({}), {}:{:02}, {}%",
            self.word_count,
            self.mode,
            self.time_seconds / 60,
            self.time_seconds % 60,
            self.completion_percentage,
        )
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => e.fmt(f),
            Error::Json(e) => e.fmt(f),
        }
    }
}

/// Somewhere to keep the results of finished puzzles. Saving is best
/// effort so failures are only logged.
pub trait ScoreStore {
    fn save_result(&mut self, result: &PuzzleResult);

    /// Returns the saved results, oldest first
    fn load_history(&self) -> Vec<PuzzleResult>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    results: Vec<PuzzleResult>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl ScoreStore for MemoryStore {
    fn save_result(&mut self, result: &PuzzleResult) {
        self.results.push(result.clone());
    }

    fn load_history(&self) -> Vec<PuzzleResult> {
        self.results.clone()
    }
}

pub fn parse_history(s: &str) -> Result<Vec<PuzzleResult>, Error> {
    Ok(serde_json::from_str(s)?)
}

pub fn history_to_json(results: &[PuzzleResult]) -> Result<String, Error> {
    Ok(serde_json::to_string(results)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::io::ErrorKind;

    /// Keeps the history as a JSON array in a file
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new<P: AsRef<Path>>(path: P) -> JsonFileStore {
            JsonFileStore {
                path: path.as_ref().to_owned(),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read(&self) -> Result<Vec<PuzzleResult>, Error> {
            match std::fs::read_to_string(&self.path) {
                Ok(s) => parse_history(&s),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn append(&self, result: &PuzzleResult) -> Result<(), Error> {
            let mut results = self.read()?;
            results.push(result.clone());
            std::fs::write(&self.path, history_to_json(&results)?)?;
            Ok(())
        }
    }

    impl ScoreStore for JsonFileStore {
        fn save_result(&mut self, result: &PuzzleResult) {
            if let Err(e) = self.append(result) {
                log::warn!("{}: {}", self.path.display(), e);
            }
        }

        fn load_history(&self) -> Vec<PuzzleResult> {
            self.read().unwrap_or_else(|e| {
                log::warn!("{}: {}", self.path.display(), e);
                Vec::new()
            })
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(test)]
mod test {
    use super::*;

    fn result(word_count: usize, timestamp: u64) -> PuzzleResult {
        PuzzleResult {
            word_count,
            mode: Mode::Phonetic,
            time_seconds: 125,
            completion_percentage: 100,
            timestamp,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "kotoba-crossword-{}-{}.json",
            name,
            std::process::id(),
        ))
    }

    #[test]
    fn json_names() {
        let json = serde_json::to_string(&result(7, 1700000000000)).unwrap();

        assert_eq!(
            json,
            "{\"wordCount\":7,\
             \"mode\":\"PHONETIC\",\
             \"timeSeconds\":125,\
             \"completionPercentage\":100,\
             \"timestamp\":1700000000000}",
        );

        assert_eq!(
            parse_history(&format!("[{}]", json)).unwrap(),
            vec![result(7, 1700000000000)],
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            result(7, 0).to_string(),
            "7 words (phonetic), 2:05, 100%",
        );
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::new();

        assert!(store.load_history().is_empty());

        store.save_result(&result(3, 1));
        store.save_result(&result(4, 2));

        assert_eq!(
            store.load_history(),
            vec![result(3, 1), result(4, 2)],
        );
    }

    #[test]
    fn file_store() {
        let path = temp_path("history");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);

        assert!(store.load_history().is_empty());

        store.save_result(&result(3, 1));
        store.save_result(&result(4, 2));

        let store = JsonFileStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        assert_eq!(
            store.load_history(),
            vec![result(3, 1), result(4, 2)],
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "this isn’t json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(store.load_history().is_empty());

        // The corrupt file is left alone
        store.save_result(&result(1, 1));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "this isn’t json",
        );

        std::fs::remove_file(&path).unwrap();
    }
}
