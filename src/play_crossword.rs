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

use std::{fs, process::ExitCode, ffi::OsString};
use std::io::BufRead;
use std::str::FromStr;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use kotoba_crossword::generator::{self, Parameters};
use kotoba_crossword::grid::{Direction, DEFAULT_GRID_SIZE};
use kotoba_crossword::history::{self, JsonFileStore, MemoryStore, ScoreStore};
use kotoba_crossword::log::init_logger;
use kotoba_crossword::puzzle::{ClueKind, Puzzle};
use kotoba_crossword::puzzle_data::PuzzleData;
use kotoba_crossword::timer::Ticker;
use kotoba_crossword::word::Mode;
use kotoba_crossword::word_source::{self, WordList, DEFAULT_LEVEL};

#[derive(Parser)]
#[command(name = "play-crossword")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        conflicts_with = "words",
        required_unless_present = "words",
    )]
    puzzle: Option<OsString>,
    #[arg(short, long, value_name = "FILE")]
    words: Option<OsString>,
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
    #[arg(long, value_name = "KIND", default_value = "text")]
    clue: ClueKind,
    #[arg(long, value_name = "FILE")]
    history: Option<OsString>,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(usize, usize),
    Type(String),
    Delete,
    Clues,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Command, String> {
        let mut parts = s.split_whitespace();

        let Some(command) = parts.next()
        else {
            return Err("empty command".to_string());
        };

        let command = match command {
            "s" => {
                let (Some(row), Some(col)) = (parts.next(), parts.next())
                else {
                    return Err("usage: s ROW COL".to_string());
                };

                match (row.parse(), col.parse()) {
                    (Ok(row), Ok(col)) => Command::Select(row, col),
                    _ => return Err("invalid position".to_string()),
                }
            },
            "t" => {
                let text = parts.collect::<String>();

                if text.is_empty() {
                    return Err("usage: t CHARACTERS".to_string());
                }

                return Ok(Command::Type(text));
            },
            "d" => Command::Delete,
            "c" => Command::Clues,
            "q" => Command::Quit,
            _ => return Err(format!("unknown command “{}”", command)),
        };

        if parts.next().is_some() {
            Err("too many arguments".to_string())
        } else {
            Ok(command)
        }
    }
}

fn load_puzzle(cli: &Cli) -> Result<Puzzle, String> {
    if let Some(path) = cli.puzzle.as_ref() {
        let path_str = path.to_string_lossy();

        let data = fs::read_to_string(path)
            .map_err(|e| format!("{}: {}", path_str, e))?;

        data.parse::<PuzzleData>()
            .and_then(PuzzleData::into_puzzle)
            .map_err(|e| format!("{}: {}", path_str, e))
    } else if let Some(path) = cli.words.as_ref() {
        let word_list = WordList::load(path)
            .map_err(|e| format!("{}: {}", path.to_string_lossy(), e))?;

        let candidates =
            word_source::candidates_for_level(&word_list, &cli.level);

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

        Ok(Puzzle::new(grid, cli.mode))
    } else {
        Err("no puzzle or word list given".to_string())
    }
}

fn render_board(puzzle: &Puzzle) -> String {
    let mut board = String::new();

    board.push_str("   ");

    for col in 0..puzzle.size() {
        board.push_str(&format!("{:>2}", col % 100));
    }

    board.push('\n');

    for (row, cells) in puzzle.cells().chunks(puzzle.size().max(1)).enumerate()
    {
        board.push_str(&format!("{:>2} ", row));

        for cell in cells {
            let ch = if cell.is_black() {
                '■'
            } else if puzzle.selection() == Some((cell.row(), cell.col())) {
                cell.user_input().unwrap_or('＊')
            } else {
                cell.user_input().unwrap_or('・')
            };

            board.push(ch);
        }

        board.push('\n');
    }

    board
}

fn print_status(puzzle: &Puzzle) {
    print!("{}", render_board(puzzle));

    if let Some(word) = puzzle.active_word() {
        let direction = match word.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };

        println!(
            "{} {}: {}",
            word.number,
            direction,
            puzzle.active_clue().unwrap_or(""),
        );
        println!(
            "keys: {}",
            puzzle.keyboard_keys().iter().collect::<String>(),
        );
    }

    println!(
        "{}%, {}s",
        puzzle.completion_percentage(),
        puzzle.elapsed_seconds(),
    );
}

fn print_clues(puzzle: &Puzzle) {
    for word in puzzle.words() {
        let clue = match puzzle.clue_kind() {
            ClueKind::Text => &word.text,
            ClueKind::Translation => &word.translation,
        };

        println!(
            "{:>3} {:<6} {}{}",
            word.number,
            if word.is_horizontal() { "across" } else { "down" },
            clue,
            if word.is_solved { " ✓" } else { "" },
        );
    }
}

fn run_command(puzzle: &mut Puzzle, command: Command) {
    match command {
        Command::Select(row, col) => puzzle.select_cell(row, col),
        Command::Type(text) => {
            for ch in text.chars() {
                puzzle.type_character(ch);
            }
        },
        Command::Delete => puzzle.delete_character(),
        Command::Clues => print_clues(puzzle),
        Command::Quit => puzzle.abandon(),
    }
}

fn play(puzzle: &mut Puzzle) -> Result<(), String> {
    print_status(puzzle);

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("stdin: {}", e))?;

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => run_command(puzzle, command),
            Err(e) => {
                eprintln!("{}", e);
                continue;
            },
        }

        while let Some(cue) = puzzle.pending_cue() {
            println!("[{}]", cue);
        }

        if puzzle.pending_finish() || puzzle.is_abandoned() {
            break;
        }

        print_status(puzzle);
    }

    if !puzzle.is_finished() {
        puzzle.abandon();
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let mut puzzle = match load_puzzle(&cli) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    puzzle.set_clue_kind(cli.clue);

    let mut store: Box<dyn ScoreStore> = match cli.history.as_ref() {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };

    let ticker = Ticker::start(puzzle.stopwatch());

    let status = play(&mut puzzle);

    ticker.stop();

    if let Err(e) = status {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let result = puzzle.result(history::now_millis());

    println!("{}", result);

    if puzzle.is_finished() {
        store.save_result(&result);
    }

    let history = store.load_history();

    if !history.is_empty() {
        println!("\n{} games played", history.len());

        for result in history.iter().rev().take(5) {
            println!("  {}", result);
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod test {
    use super::*;
    use kotoba_crossword::grid::{Grid, PlacedWord};

    #[test]
    fn parse_command() {
        assert_eq!("s 3 4".parse::<Command>(), Ok(Command::Select(3, 4)));
        assert_eq!(
            "t ねこ".parse::<Command>(),
            Ok(Command::Type("ねこ".to_string())),
        );
        assert_eq!("d".parse::<Command>(), Ok(Command::Delete));
        assert_eq!("c".parse::<Command>(), Ok(Command::Clues));
        assert_eq!(" q ".parse::<Command>(), Ok(Command::Quit));

        assert!("s 3".parse::<Command>().is_err());
        assert!("s a b".parse::<Command>().is_err());
        assert!("t".parse::<Command>().is_err());
        assert!("d 1".parse::<Command>().is_err());
        assert!("x".parse::<Command>().is_err());
    }

    #[test]
    fn board() {
        let grid = Grid::new(
            3,
            [PlacedWord {
                number: 0,
                solution: "ねこ".to_string(),
                text: "猫".to_string(),
                translation: "cat".to_string(),
                row: 1,
                col: 0,
                direction: Direction::Across,
                is_solved: false,
            }],
        ).unwrap();
        let mut puzzle = Puzzle::new(grid, Mode::Phonetic);

        run_command(&mut puzzle, Command::Select(1, 0));
        run_command(&mut puzzle, Command::Type("ね".to_string()));

        assert_eq!(
            render_board(&puzzle),
            "    0 1 2\n \
             0 ■■■\n \
             1 ね＊■\n \
             2 ■■■\n",
        );
    }
}
