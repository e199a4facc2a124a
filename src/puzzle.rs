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

use super::grid::{Cell, Direction, Grid, PlacedWord};
use super::history::PuzzleResult;
use super::keyboard;
use super::timer::Stopwatch;
use super::word::Mode;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Sounds that the front end should play in response to the player
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Cue {
    CorrectLetter,
    IncorrectLetter,
    WordSolved,
    Finished,
    GameOver,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Cue::CorrectLetter => "correctLetter",
            Cue::IncorrectLetter => "incorrectLetter",
            Cue::WordSolved => "wordSolved",
            Cue::Finished => "finished",
            Cue::GameOver => "gameOver",
        };

        f.write_str(name)
    }
}

/// What to show as the clue for the active word
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum ClueKind {
    /// The written form of the word
    #[default]
    Text,
    Translation,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidClueKind;

impl fmt::Display for InvalidClueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid clue kind")
    }
}

impl std::error::Error for InvalidClueKind {
}

impl FromStr for ClueKind {
    type Err = InvalidClueKind;

    fn from_str(s: &str) -> Result<ClueKind, InvalidClueKind> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "kanji" => Ok(ClueKind::Text),
            "translation" | "meaning" => Ok(ClueKind::Translation),
            _ => Err(InvalidClueKind),
        }
    }
}

pub struct Puzzle {
    grid: Grid,
    mode: Mode,
    clue_kind: ClueKind,

    selection: Option<(usize, usize)>,
    vertical_input: bool,
    keyboard_keys: Vec<char>,

    stopwatch: Stopwatch,
    // Set when the session ends so that the time stops counting
    end_time: Option<u32>,
    abandoned: bool,

    pending_cues: VecDeque<Cue>,
    pending_finish: bool,

    cells_dirty: Vec<u64>,
}

impl Puzzle {
    pub fn new(grid: Grid, mode: Mode) -> Puzzle {
        let n_cells = grid.size() * grid.size();
        let n_words = n_cells.div_ceil(64);
        let mut cells_dirty = vec![u64::MAX; n_words];

        if let Some(last) = cells_dirty.last_mut() {
            *last >>= n_words * 64 - n_cells;
        }

        Puzzle {
            grid,
            mode,
            clue_kind: ClueKind::default(),

            selection: None,
            vertical_input: false,
            keyboard_keys: Vec::new(),

            stopwatch: Stopwatch::new(),
            end_time: None,
            abandoned: false,

            pending_cues: VecDeque::new(),
            pending_finish: false,

            cells_dirty,
        }
    }

    fn is_over(&self) -> bool {
        self.end_time.is_some()
    }

    fn dirty_cell(&mut self, row: usize, col: usize) {
        let index = row * self.grid.size() + col;
        self.cells_dirty[index / 64] |= 1 << (index % 64);
    }

    fn end(&mut self, cue: Cue) {
        self.end_time = Some(self.stopwatch.seconds());
        self.pending_cues.push_back(cue);
    }

    fn update_keyboard_keys(&mut self) {
        self.keyboard_keys = match self.active_word_index() {
            Some(index) => keyboard::keyboard_keys(
                &self.grid.word(index).solution,
                self.mode,
                self.grid.words().iter()
                    .enumerate()
                    .filter(|&(other, _)| other != index)
                    .map(|(_, word)| word.solution.as_str()),
            ),
            None => Vec::new(),
        };
    }

    /// Selecting the cell that is already selected switches between
    /// the across and down words if both cross it.
    pub fn select_cell(&mut self, row: usize, col: usize) {
        if self.is_over() {
            return;
        }

        if !self.grid.at(row, col).is_some_and(|cell| !cell.is_black()) {
            return;
        }

        let across = self.grid.word_at(row, col, Direction::Across);
        let down = self.grid.word_at(row, col, Direction::Down);

        if self.selection == Some((row, col)) {
            if across.is_some() && down.is_some() {
                self.vertical_input = !self.vertical_input;
            }
        } else {
            if let Some((old_row, old_col)) = self.selection {
                self.dirty_cell(old_row, old_col);
            }

            self.selection = Some((row, col));
            self.vertical_input = across.is_none() && down.is_some();
            self.dirty_cell(row, col);
        }

        self.update_keyboard_keys();
    }

    pub fn type_character(&mut self, ch: char) {
        if self.is_over() {
            return;
        }

        let Some((row, col)) = self.selection
        else {
            return;
        };

        let Some(word_index) = self.active_word_index()
        else {
            return;
        };

        let Some(cell) = self.grid.at_mut(row, col)
        else {
            return;
        };

        if cell.is_correct() {
            return;
        }

        // Typing the letter that is already there only moves along
        if cell.set_user_input(Some(ch)) {
            let cue = if cell.solution() == Some(ch) {
                Cue::CorrectLetter
            } else {
                Cue::IncorrectLetter
            };

            self.pending_cues.push_back(cue);
            self.dirty_cell(row, col);

            self.check_completion(row, col);

            if self.is_over() {
                return;
            }
        }

        if let Some((next_row, next_col)) =
            self.grid.word(word_index).next_position(row, col)
        {
            self.selection = Some((next_row, next_col));
            self.dirty_cell(row, col);
            self.dirty_cell(next_row, next_col);
        }
    }

    pub fn delete_character(&mut self) {
        if self.is_over() {
            return;
        }

        let Some((row, col)) = self.selection
        else {
            return;
        };

        if self.grid.at_mut(row, col)
            .is_some_and(|cell| cell.set_user_input(None))
        {
            self.dirty_cell(row, col);
        }
    }

    fn check_completion(&mut self, row: usize, col: usize) {
        let word_indices = self.grid.words_at(row, col).collect::<Vec<_>>();

        for index in word_indices {
            let word = self.grid.word(index);

            if word.is_solved || !self.grid.word_matches(index) {
                continue;
            }

            for (r, c) in self.grid.word(index).positions() {
                if let Some(cell) = self.grid.at_mut(r, c) {
                    cell.mark_correct();
                }
                self.dirty_cell(r, c);
            }

            self.grid.word_mut(index).is_solved = true;
            self.pending_cues.push_back(Cue::WordSolved);

            log::debug!(
                "solved {} ({}/{})",
                self.grid.word(index).solution,
                self.grid.n_solved(),
                self.grid.words().len(),
            );
        }

        if self.grid.is_solved() {
            self.end(Cue::Finished);
            self.pending_finish = true;
        }
    }

    /// Gives up on an unfinished puzzle
    pub fn abandon(&mut self) {
        if !self.is_over() {
            self.abandoned = true;
            self.end(Cue::GameOver);
        }
    }

    /// Counts a second of play time. This is only needed when
    /// nothing else is ticking the stopwatch.
    pub fn tick(&mut self) -> u32 {
        if self.is_over() {
            self.elapsed_seconds()
        } else {
            self.stopwatch.tick()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.grid.is_solved()
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    pub fn pending_cue(&mut self) -> Option<Cue> {
        self.pending_cues.pop_front()
    }

    pub fn pending_finish(&mut self) -> bool {
        std::mem::replace(&mut self.pending_finish, false)
    }

    pub fn changed_cells(&mut self) -> ChangedCells {
        let n_words = self.cells_dirty.len();
        let bits = std::mem::replace(&mut self.cells_dirty, vec![0; n_words]);

        ChangedCells::new(self.grid.size(), bits)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    pub fn words(&self) -> &[PlacedWord] {
        self.grid.words()
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn is_vertical_input(&self) -> bool {
        self.vertical_input
    }

    fn active_word_index(&self) -> Option<usize> {
        let (row, col) = self.selection?;

        let direction = if self.vertical_input {
            Direction::Down
        } else {
            Direction::Across
        };

        self.grid.word_at(row, col, direction)
            .or_else(|| self.grid.word_at(row, col, direction.other()))
    }

    pub fn active_word(&self) -> Option<&PlacedWord> {
        self.active_word_index().map(|index| self.grid.word(index))
    }

    pub fn clue_kind(&self) -> ClueKind {
        self.clue_kind
    }

    pub fn set_clue_kind(&mut self, clue_kind: ClueKind) {
        self.clue_kind = clue_kind;
    }

    pub fn active_clue(&self) -> Option<&str> {
        self.active_word().map(|word| match self.clue_kind {
            ClueKind::Text => word.text.as_str(),
            ClueKind::Translation => word.translation.as_str(),
        })
    }

    pub fn keyboard_keys(&self) -> &[char] {
        &self.keyboard_keys
    }

    /// A handle on the play time that can be given to a ticker
    pub fn stopwatch(&self) -> Stopwatch {
        self.stopwatch.clone()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.end_time.unwrap_or_else(|| self.stopwatch.seconds())
    }

    pub fn completion_percentage(&self) -> u32 {
        let n_words = self.grid.words().len();

        if n_words == 0 {
            100
        } else {
            (self.grid.n_solved() * 100 / n_words) as u32
        }
    }

    pub fn result(&self, timestamp: u64) -> PuzzleResult {
        PuzzleResult {
            word_count: self.grid.words().len(),
            mode: self.mode,
            time_seconds: self.elapsed_seconds(),
            completion_percentage: self.completion_percentage(),
            timestamp,
        }
    }
}

pub struct ChangedCells {
    size: usize,
    bits: Vec<u64>,
    pos: usize,
}

impl ChangedCells {
    fn new(size: usize, bits: Vec<u64>) -> ChangedCells {
        ChangedCells {
            size,
            bits,
            pos: 0,
        }
    }
}

impl Iterator for ChangedCells {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        loop {
            let bits = self.bits.get_mut(self.pos)?;

            if *bits == 0 {
                self.pos += 1;
            } else {
                let next_bit = bits.trailing_zeros() as usize;
                *bits &= *bits - 1;
                let index = self.pos * 64 + next_bit;
                break Some((index / self.size, index % self.size));
            }
        }
    }
}
