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

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_GRID_SIZE: usize = 16;
pub const MAX_GRID_SIZE: usize = 255;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn other(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Direction::Across
    }

    fn step(
        self,
        row: usize,
        col: usize,
        offset: usize,
    ) -> Option<(usize, usize)> {
        match self {
            Direction::Across => Some((row, col.checked_add(offset)?)),
            Direction::Down => Some((row.checked_add(offset)?, col)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    solution: Option<char>,
    user_input: Option<char>,
    number: Option<u32>,
    is_correct: bool,
}

impl Cell {
    fn black(row: usize, col: usize) -> Cell {
        Cell {
            row,
            col,
            solution: None,
            user_input: None,
            number: None,
            is_correct: false,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn solution(&self) -> Option<char> {
        self.solution
    }

    pub fn user_input(&self) -> Option<char> {
        self.user_input
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn is_black(&self) -> bool {
        self.solution.is_none()
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    // Returns whether the input changed. Correct cells are frozen.
    pub(crate) fn set_user_input(&mut self, input: Option<char>) -> bool {
        if self.is_correct || self.is_black() || self.user_input == input {
            false
        } else {
            self.user_input = input;
            true
        }
    }

    pub(crate) fn mark_correct(&mut self) {
        debug_assert_eq!(self.user_input, self.solution);
        self.is_correct = true;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord {
    pub number: u32,
    pub solution: String,
    pub text: String,
    pub translation: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    #[serde(default)]
    pub is_solved: bool,
}

impl PlacedWord {
    pub fn len(&self) -> usize {
        self.solution.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.solution.is_empty()
    }

    pub fn is_horizontal(&self) -> bool {
        self.direction.is_horizontal()
    }

    /// Iterates over the (row, column) of each cell of the word in
    /// reading order.
    pub fn positions(&self) -> Positions {
        Positions {
            row: self.row,
            col: self.col,
            direction: self.direction,
            next: 0,
            length: self.len(),
        }
    }

    /// Returns the index of the letter of this word that lands on
    /// the given position, if any.
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        let offset = match self.direction {
            Direction::Across => {
                (row == self.row && col >= self.col)
                    .then(|| col - self.col)?
            },
            Direction::Down => {
                (col == self.col && row >= self.row)
                    .then(|| row - self.row)?
            },
        };

        (offset < self.len()).then_some(offset)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.index_of(row, col).is_some()
    }

    /// The position after the last letter, if any
    pub fn next_position(
        &self,
        row: usize,
        col: usize,
    ) -> Option<(usize, usize)> {
        let index = self.index_of(row, col)?;

        if index + 1 < self.len() {
            self.direction.step(self.row, self.col, index + 1)
        } else {
            None
        }
    }
}

pub struct Positions {
    row: usize,
    col: usize,
    direction: Direction,
    next: usize,
    length: usize,
}

impl Iterator for Positions {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.next >= self.length {
            return None;
        }

        let Some(pos) = self.direction.step(self.row, self.col, self.next)
        else {
            self.next = self.length;
            return None;
        };

        self.next += 1;

        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.length - self.next.min(self.length);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    EmptyGrid,
    TooBig(usize),
    EmptyWord,
    OutOfBounds(String),
    InvalidLetter {
        row: usize,
        col: usize,
    },
    Conflict {
        row: usize,
        col: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyGrid => write!(f, "empty grid"),
            Error::TooBig(size) => {
                write!(
                    f,
                    "grid size {} is bigger than {}",
                    size,
                    MAX_GRID_SIZE,
                )
            },
            Error::EmptyWord => write!(f, "empty word"),
            Error::OutOfBounds(word) => {
                write!(f, "word “{}” goes outside the grid", word)
            },
            Error::Conflict { row, col } => {
                write!(f, "conflicting letters at row {}, column {}", row, col)
            },
            Error::InvalidLetter { row, col } => {
                write!(f, "invalid letter at row {}, column {}", row, col)
            },
        }
    }
}

/// A square crossword grid. The cells are stored in a flat array in
/// row-major order and the words refer to them by position so that
/// intersecting words never alias each other.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Box<[Cell]>,
    words: Vec<PlacedWord>,
}

impl Grid {
    /// An all-black grid. The size must be at most [`MAX_GRID_SIZE`].
    pub fn empty(size: usize) -> Grid {
        let cells = (0..size * size)
            .map(|i| Cell::black(i / size, i % size))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Grid {
            size,
            cells,
            words: Vec::new(),
        }
    }

    /// Builds a grid from a list of words. The words are sorted into
    /// reading order of their first letter and renumbered from 1.
    /// Any play state in the words is discarded.
    pub fn new<I>(size: usize, words: I) -> Result<Grid, Error>
        where I: IntoIterator<Item = PlacedWord>
    {
        if size == 0 {
            return Err(Error::EmptyGrid);
        }

        if size > MAX_GRID_SIZE {
            return Err(Error::TooBig(size));
        }

        let mut grid = Grid::empty(size);
        let mut words = words.into_iter().collect::<Vec<_>>();

        words.sort_by_key(|word| {
            (word.row, word.col, !word.is_horizontal())
        });

        for (index, word) in words.iter_mut().enumerate() {
            word.number = index as u32 + 1;
            word.is_solved = false;

            let length = word.len();

            if length == 0 {
                return Err(Error::EmptyWord);
            }

            let in_bounds = word.direction
                .step(word.row, word.col, length - 1)
                .is_some_and(|(row, col)| row < size && col < size);

            if !in_bounds {
                return Err(Error::OutOfBounds(word.solution.clone()));
            }

            for ((row, col), letter) in
                word.positions().zip(word.solution.chars())
            {
                if letter.is_whitespace() || letter.is_control() {
                    return Err(Error::InvalidLetter { row, col });
                }

                let cell = &mut grid.cells[row * size + col];

                match cell.solution {
                    Some(existing) if existing != letter => {
                        return Err(Error::Conflict { row, col });
                    },
                    _ => cell.solution = Some(letter),
                }
            }

            let start = &mut grid.cells[word.row * size + word.col];

            if start.number.is_none() {
                start.number = Some(word.number);
            }
        }

        grid.words = words;

        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    pub fn word(&self, index: usize) -> &PlacedWord {
        &self.words[index]
    }

    pub(crate) fn word_mut(&mut self, index: usize) -> &mut PlacedWord {
        &mut self.words[index]
    }

    pub fn at(&self, row: usize, col: usize) -> Option<&Cell> {
        (row < self.size && col < self.size)
            .then(|| &self.cells[row * self.size + col])
    }

    pub(crate) fn at_mut(
        &mut self,
        row: usize,
        col: usize,
    ) -> Option<&mut Cell> {
        if row < self.size && col < self.size {
            Some(&mut self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Indices of the words that cover the given position
    pub fn words_at(
        &self,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        self.words.iter()
            .enumerate()
            .filter_map(move |(index, word)| {
                word.contains(row, col).then_some(index)
            })
    }

    pub fn word_at(
        &self,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Option<usize> {
        self.words_at(row, col)
            .find(|&index| self.words[index].direction == direction)
    }

    /// Whether every cell of the word holds the right letter
    pub fn word_matches(&self, index: usize) -> bool {
        self.words[index].positions().all(|(row, col)| {
            let cell = &self.cells[row * self.size + col];
            cell.user_input.is_some() && cell.user_input == cell.solution
        })
    }

    pub fn n_solved(&self) -> usize {
        self.words.iter().filter(|word| word.is_solved).count()
    }

    pub fn is_solved(&self) -> bool {
        self.words.iter().all(|word| word.is_solved)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.size == 0 {
            return Ok(());
        }

        for row in self.cells.chunks(self.size) {
            for cell in row {
                write!(f, "{}", cell.solution.unwrap_or('＃'))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
