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

use wasm_bindgen::prelude::*;
use serde::Serialize;
use super::generator::{self, Parameters};
use super::grid::Direction;
use super::history::{self, PuzzleResult, ScoreStore};
use super::log::init_logger;
use super::puzzle::{ClueKind, Puzzle};
use super::puzzle_data::PuzzleData;
use super::word::Mode;
use super::word_source::{self, WordList};

const HISTORY_KEY: &str = "kotoba-crossword-history";

fn get_local_storage() -> Option<web_sys::Storage> {
    let window = web_sys::window()?;

    match window.local_storage() {
        Ok(Some(local_storage)) => Some(local_storage),
        Ok(None) => {
            log::warn!("local storage is not available");
            None
        },
        Err(_) => {
            log::warn!("error getting local storage");
            None
        },
    }
}

/// Keeps the results as a JSON array under a single key in the
/// browser’s local storage
struct LocalStorageStore;

impl ScoreStore for LocalStorageStore {
    fn save_result(&mut self, result: &PuzzleResult) {
        let Some(local_storage) = get_local_storage()
        else {
            return;
        };

        let mut results = self.load_history();
        results.push(result.clone());

        match history::history_to_json(&results) {
            Ok(json) => {
                if local_storage.set_item(HISTORY_KEY, &json).is_err() {
                    log::warn!("error saving history");
                }
            },
            Err(e) => log::warn!("error saving history: {}", e),
        }
    }

    fn load_history(&self) -> Vec<PuzzleResult> {
        let Some(local_storage) = get_local_storage()
        else {
            return Vec::new();
        };

        match local_storage.get_item(HISTORY_KEY) {
            Ok(Some(json)) => {
                history::parse_history(&json).unwrap_or_else(|e| {
                    log::warn!("error parsing history: {}", e);
                    Vec::new()
                })
            },
            Ok(None) => Vec::new(),
            Err(_) => {
                log::warn!("error getting history");
                Vec::new()
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellSnapshot {
    row: usize,
    col: usize,
    is_black: bool,
    number: Option<u32>,
    user_input: Option<char>,
    is_correct: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordSnapshot<'a> {
    number: u32,
    row: usize,
    col: usize,
    direction: Direction,
    length: usize,
    text: &'a str,
    translation: &'a str,
    is_solved: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    size: usize,
    mode: Mode,
    cells: Vec<CellSnapshot>,
    words: Vec<WordSnapshot<'a>>,
    selection: Option<(usize, usize)>,
    vertical_input: bool,
    active_word: Option<u32>,
    active_clue: Option<&'a str>,
    keyboard_keys: &'a [char],
    elapsed_seconds: u32,
    completion_percentage: u32,
    is_finished: bool,
    is_abandoned: bool,
}

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Sets up panic messages and logging for the browser console.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    console_error_panic_hook::set_once();
    init_logger(debug_enabled);
}

#[wasm_bindgen]
pub struct CrosswordGame {
    puzzle: Puzzle,
    store: LocalStorageStore,
}

impl CrosswordGame {
    fn save_if_finished(&mut self) {
        if self.puzzle.pending_finish() {
            let result = self.puzzle.result(history::now_millis());
            log::info!("finished: {}", result);
            self.store.save_result(&result);
        }
    }
}

#[wasm_bindgen]
impl CrosswordGame {
    /// Generates a new puzzle from a JSON word list
    #[wasm_bindgen(constructor)]
    pub fn new(
        words_json: &str,
        level: &str,
        mode: &str,
        word_count: usize,
    ) -> Result<CrosswordGame, JsValue> {
        let mode = mode.parse::<Mode>().map_err(to_js_error)?;
        let word_list = words_json.parse::<WordList>().map_err(to_js_error)?;
        let candidates = word_source::candidates_for_level(&word_list, level);

        let parameters = Parameters {
            target_word_count: word_count,
            mode,
            ..Parameters::default()
        };

        let grid = generator::generate_unseeded(&candidates, &parameters);

        log::info!(
            "generated {} words from {} candidates",
            grid.words().len(),
            candidates.len(),
        );

        Ok(CrosswordGame {
            puzzle: Puzzle::new(grid, mode),
            store: LocalStorageStore,
        })
    }

    /// Loads a puzzle that was saved with `puzzle_data`
    pub fn from_puzzle_data(
        puzzle_json: &str,
    ) -> Result<CrosswordGame, JsValue> {
        let data = puzzle_json.parse::<PuzzleData>().map_err(to_js_error)?;

        Ok(CrosswordGame {
            puzzle: data.into_puzzle().map_err(to_js_error)?,
            store: LocalStorageStore,
        })
    }

    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.puzzle.select_cell(row, col);
    }

    /// Types the first character of the string
    pub fn type_character(&mut self, input: &str) {
        if let Some(ch) = input.chars().next() {
            self.puzzle.type_character(ch);
            self.save_if_finished();
        }
    }

    pub fn delete_character(&mut self) {
        self.puzzle.delete_character();
    }

    pub fn abandon(&mut self) {
        self.puzzle.abandon();
    }

    /// Called once a second from `setInterval`
    pub fn tick(&mut self) -> u32 {
        self.puzzle.tick()
    }

    pub fn set_clue_kind(&mut self, clue_kind: &str) -> Result<(), JsValue> {
        let clue_kind = clue_kind.parse::<ClueKind>().map_err(to_js_error)?;
        self.puzzle.set_clue_kind(clue_kind);
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.puzzle.is_finished()
    }

    pub fn pending_cue(&mut self) -> Option<String> {
        self.puzzle.pending_cue().map(|cue| cue.to_string())
    }

    /// Pairs of row and column for the cells that need redrawing
    pub fn changed_cells(&mut self) -> Vec<u32> {
        self.puzzle.changed_cells()
            .flat_map(|(row, col)| [row as u32, col as u32])
            .collect()
    }

    pub fn keyboard_keys(&self) -> String {
        self.puzzle.keyboard_keys().iter().collect()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let puzzle = &self.puzzle;

        let snapshot = Snapshot {
            size: puzzle.size(),
            mode: puzzle.mode(),
            cells: puzzle.cells().iter().map(|cell| CellSnapshot {
                row: cell.row(),
                col: cell.col(),
                is_black: cell.is_black(),
                number: cell.number(),
                user_input: cell.user_input(),
                is_correct: cell.is_correct(),
            }).collect(),
            words: puzzle.words().iter().map(|word| WordSnapshot {
                number: word.number,
                row: word.row,
                col: word.col,
                direction: word.direction,
                length: word.len(),
                text: &word.text,
                translation: &word.translation,
                is_solved: word.is_solved,
            }).collect(),
            selection: puzzle.selection(),
            vertical_input: puzzle.is_vertical_input(),
            active_word: puzzle.active_word().map(|word| word.number),
            active_clue: puzzle.active_clue(),
            keyboard_keys: puzzle.keyboard_keys(),
            elapsed_seconds: puzzle.elapsed_seconds(),
            completion_percentage: puzzle.completion_percentage(),
            is_finished: puzzle.is_finished(),
            is_abandoned: puzzle.is_abandoned(),
        };

        serde_json::to_string(&snapshot).map_err(to_js_error)
    }

    pub fn puzzle_data(&self) -> String {
        PuzzleData::from(&self.puzzle).to_string()
    }

    pub fn history(&self) -> Result<String, JsValue> {
        history::history_to_json(&self.store.load_history())
            .map_err(to_js_error)
    }
}
