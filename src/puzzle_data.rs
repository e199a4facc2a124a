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

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::grid::{self, Grid, PlacedWord};
use super::puzzle::Puzzle;
use super::word::Mode;

/// A generated layout in a form that can be saved and loaded again
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    #[serde(default)]
    pub mode: Mode,
    pub size: usize,
    pub words: Vec<PlacedWord>,
}

#[derive(Debug)]
pub enum Error {
    GridError(grid::Error),
    JsonError(serde_json::Error),
}

impl From<grid::Error> for Error {
    fn from(e: grid::Error) -> Error {
        Error::GridError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::JsonError(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::GridError(e) => e.fmt(f),
            Error::JsonError(e) => e.fmt(f),
        }
    }
}

impl PuzzleData {
    pub fn new(grid: &Grid, mode: Mode) -> PuzzleData {
        PuzzleData {
            mode,
            size: grid.size(),
            words: grid.words().iter()
                .map(|word| PlacedWord {
                    is_solved: false,
                    ..word.clone()
                })
                .collect(),
        }
    }

    pub fn into_puzzle(self) -> Result<Puzzle, Error> {
        let mode = self.mode;
        Ok(Puzzle::new(Grid::try_from(self)?, mode))
    }
}

impl From<&Puzzle> for PuzzleData {
    fn from(puzzle: &Puzzle) -> PuzzleData {
        PuzzleData::new(puzzle.grid(), puzzle.mode())
    }
}

impl TryFrom<PuzzleData> for Grid {
    type Error = grid::Error;

    fn try_from(data: PuzzleData) -> Result<Grid, grid::Error> {
        Grid::new(data.size, data.words)
    }
}

impl FromStr for PuzzleData {
    type Err = Error;

    fn from_str(s: &str) -> Result<PuzzleData, Error> {
        let data = serde_json::from_str::<PuzzleData>(s)?;

        // Make sure the layout is valid before handing it out
        Grid::new(data.size, data.words.iter().cloned())?;

        Ok(data)
    }
}

impl fmt::Display for PuzzleData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
