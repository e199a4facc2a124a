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

use std::{process::ExitCode, ffi::OsString};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use kotoba_crossword::generator::{self, Parameters};
use kotoba_crossword::grid::{Direction, Grid, DEFAULT_GRID_SIZE};
use kotoba_crossword::log::init_logger;
use kotoba_crossword::puzzle_data::PuzzleData;
use kotoba_crossword::word::Mode;
use kotoba_crossword::word_source::{self, WordList, DEFAULT_LEVEL};

#[derive(Parser)]
#[command(name = "build-crossword")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    words: OsString,
    #[arg(short, long, value_name = "LEVEL", default_value = DEFAULT_LEVEL)]
    level: String,
    #[arg(
        short,
        long,
        value_name = "COUNT",
        default_value_t = generator::DEFAULT_TARGET_WORD_COUNT,
    )]
    count: usize,
    #[arg(short, long, value_name = "MODE", default_value_t = Mode::Phonetic)]
    mode: Mode,
    #[arg(short, long, value_name = "SIZE", default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    #[arg(short = 'H', long)]
    human_readable: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn print_clues(grid: &Grid, direction: Direction, heading: &str) {
    println!("\n{}\n", heading);

    for word in grid.words().iter().filter(|w| w.direction == direction) {
        println!(
            "{:>3}. {} ({}): {}",
            word.number,
            word.text,
            word.solution,
            word.translation,
        );
    }
}

fn print_human_readable(grid: &Grid) {
    print!("{}", grid);

    print_clues(grid, Direction::Across, "Across");
    print_clues(grid, Direction::Down, "Down");
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let word_list = match WordList::load(&cli.words) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{}: {}", cli.words.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let candidates = word_source::candidates_for_level(&word_list, &cli.level);

    let parameters = Parameters {
        target_word_count: cli.count,
        mode: cli.mode,
        grid_size: cli.size,
        ..Parameters::default()
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = generator::generate(&candidates, &parameters, &mut rng);

    if grid.words().is_empty() {
        log::warn!(
            "none of the {} words for level {} could be used",
            candidates.len(),
            cli.level,
        );
    }

    if cli.human_readable {
        print_human_readable(&grid);
    } else {
        println!("{}", PuzzleData::new(&grid, cli.mode));
    }

    ExitCode::SUCCESS
}
