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

use super::word::CandidateWord;
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

pub const DEFAULT_LEVEL: &str = "n5";

/// Somewhere to get the vocabulary for a level from. Failing to get
/// any words just gives an empty list.
pub trait WordSource {
    fn candidate_words(&self, level: &str) -> Vec<CandidateWord>;
}

impl<F> WordSource for F
    where F: Fn(&str) -> Vec<CandidateWord>
{
    fn candidate_words(&self, level: &str) -> Vec<CandidateWord> {
        self(level)
    }
}

/// Gets the words for the level, or for the default level if the
/// requested one doesn’t have any.
pub fn candidates_for_level<S>(source: &S, level: &str) -> Vec<CandidateWord>
    where S: WordSource + ?Sized
{
    let words = source.candidate_words(level);

    if words.is_empty() && !level.eq_ignore_ascii_case(DEFAULT_LEVEL) {
        log::info!(
            "no words for level “{}”, using {} instead",
            level,
            DEFAULT_LEVEL,
        );
        source.candidate_words(DEFAULT_LEVEL)
    } else {
        words
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

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WordEntry {
    text: String,
    phonetics: String,
    #[serde(alias = "translation")]
    meaning: String,
    jlpt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WordListRoot {
    words: Vec<WordEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Level {
    All,
    Jlpt(u8),
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Level, ()> {
        let s = s.trim().to_ascii_lowercase();

        if s == "all" {
            return Ok(Level::All);
        }

        let id = s.strip_prefix("jlpt_wordlist_").unwrap_or(&s);

        match id.strip_prefix('n').and_then(|n| n.parse::<u8>().ok()) {
            Some(n @ 1..=5) => Ok(Level::Jlpt(n)),
            _ => Err(()),
        }
    }
}

impl Level {
    fn matches(self, entry: &WordEntry) -> bool {
        match self {
            Level::All => true,
            Level::Jlpt(n) => entry.jlpt.as_deref().is_some_and(|jlpt| {
                jlpt.trim()
                    .strip_prefix(['n', 'N'])
                    .and_then(|level| level.parse::<u8>().ok())
                    == Some(n)
            }),
        }
    }
}

/// A vocabulary list loaded from JSON in the form
/// `{"words": [{"text": …, "phonetics": …, "meaning": …, "jlpt": "N5"}]}`
#[derive(Debug, Default)]
pub struct WordList {
    entries: Vec<WordEntry>,
}

impl WordList {
    pub fn from_reader<R: Read>(reader: R) -> Result<WordList, Error> {
        let root = serde_json::from_reader::<_, WordListRoot>(reader)?;

        Ok(WordList { entries: root.words })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<WordList, Error> {
        let file = std::fs::File::open(path)?;
        WordList::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for WordList {
    type Err = Error;

    fn from_str(s: &str) -> Result<WordList, Error> {
        WordList::from_reader(s.as_bytes())
    }
}

impl WordSource for WordList {
    fn candidate_words(&self, level: &str) -> Vec<CandidateWord> {
        let Ok(level_filter) = level.parse::<Level>()
        else {
            log::warn!("unknown level “{}”", level);
            return Vec::new();
        };

        self.entries.iter()
            .filter(|entry| level_filter.matches(entry))
            .map(|entry| {
                CandidateWord::new(
                    entry.text.as_str(),
                    entry.phonetics.as_str(),
                    entry.meaning.as_str(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static WORDS_JSON: &str = r#"{
        "words": [
            {"id": "1", "text": "猫", "phonetics": "ねこ",
             "meaning": "cat", "jlpt": "N5", "rank": "1200"},
            {"id": "2", "text": "犬", "phonetics": "いぬ",
             "meaning": "dog", "jlpt": "N5"},
            {"id": "3", "text": "政治", "phonetics": "せいじ",
             "translation": "politics", "jlpt": "N2", "type": "noun"},
            {"id": "4", "text": "何か", "phonetics": "なにか",
             "jlpt": null},
            {"id": "5", "text": "熊", "phonetics": "くま"}
        ]
    }"#;

    fn texts(words: &[CandidateWord]) -> Vec<&str> {
        words.iter().map(|word| word.text.as_str()).collect()
    }

    #[test]
    fn parse_level() {
        assert_eq!("n5".parse::<Level>(), Ok(Level::Jlpt(5)));
        assert_eq!("N1".parse::<Level>(), Ok(Level::Jlpt(1)));
        assert_eq!("jlpt_wordlist_n3".parse::<Level>(), Ok(Level::Jlpt(3)));
        assert_eq!("ALL".parse::<Level>(), Ok(Level::All));
        assert!("n6".parse::<Level>().is_err());
        assert!("n0".parse::<Level>().is_err());
        assert!("beginner".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn word_list() {
        let list = WORDS_JSON.parse::<WordList>().unwrap();

        assert_eq!(list.len(), 5);

        let n5 = list.candidate_words("n5");
        assert_eq!(texts(&n5), ["猫", "犬"]);
        assert_eq!(n5[0].phonetics, "ねこ");
        assert_eq!(n5[0].translation, "cat");

        let n2 = list.candidate_words("jlpt_wordlist_n2");
        assert_eq!(texts(&n2), ["政治"]);
        assert_eq!(n2[0].translation, "politics");

        assert_eq!(list.candidate_words("all").len(), 5);
        assert!(list.candidate_words("n1").is_empty());
        assert!(list.candidate_words("nonsense").is_empty());
    }

    #[test]
    fn fallback() {
        let list = WORDS_JSON.parse::<WordList>().unwrap();

        assert_eq!(texts(&candidates_for_level(&list, "n1")), ["猫", "犬"]);
        assert_eq!(texts(&candidates_for_level(&list, "bad")), ["猫", "犬"]);
        assert_eq!(texts(&candidates_for_level(&list, "n2")), ["政治"]);

        let empty = WordList::default();
        assert!(candidates_for_level(&empty, "n3").is_empty());
    }

    #[test]
    fn closure_source() {
        let source = |level: &str| {
            if level == "n4" {
                vec![CandidateWord::new("本", "ほん", "book")]
            } else {
                Vec::new()
            }
        };

        assert_eq!(texts(&candidates_for_level(&source, "n4")), ["本"]);
        assert!(candidates_for_level(&source, "n3").is_empty());
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            "{\"words\": 3}".parse::<WordList>(),
            Err(Error::Json(_)),
        ));
        assert!("{}".parse::<WordList>().unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("kotoba-crossword-no-such-file");

        assert!(matches!(WordList::load(path), Err(Error::Io(_))));
    }
}
