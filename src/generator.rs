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

use super::grid::{
    Direction, Grid, PlacedWord, DEFAULT_GRID_SIZE, MAX_GRID_SIZE,
};
use super::word::{CandidateWord, Mode};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_TARGET_WORD_COUNT: usize = 10;
pub const MIN_WORD_LENGTH: usize = 2;
pub const MAX_WORD_LENGTH: usize = 8;
// Number of candidates in a row that can fail to find a place before
// giving up on filling the grid
pub const MAX_FAILURES: usize = 100;

#[derive(Clone, Debug)]
pub struct Parameters {
    pub target_word_count: usize,
    pub mode: Mode,
    pub grid_size: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub max_failures: usize,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            target_word_count: DEFAULT_TARGET_WORD_COUNT,
            mode: Mode::default(),
            grid_size: DEFAULT_GRID_SIZE,
            min_length: MIN_WORD_LENGTH,
            max_length: MAX_WORD_LENGTH,
            max_failures: MAX_FAILURES,
        }
    }
}

struct Entry<'a> {
    candidate: &'a CandidateWord,
    solution: String,
    letters: Vec<char>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Placement {
    row: usize,
    col: usize,
    direction: Direction,
}

struct Board {
    size: usize,
    letters: Box<[Option<char>]>,
}

fn unit(direction: Direction) -> (isize, isize) {
    match direction {
        Direction::Across => (0, 1),
        Direction::Down => (1, 0),
    }
}

impl Board {
    fn new(size: usize) -> Board {
        Board {
            size,
            letters: vec![None; size * size].into_boxed_slice(),
        }
    }

    fn get(&self, row: isize, col: isize) -> Option<char> {
        let size = self.size as isize;

        if row < 0 || col < 0 || row >= size || col >= size {
            None
        } else {
            self.letters[(row * size + col) as usize]
        }
    }

    fn is_occupied(&self, row: isize, col: isize) -> bool {
        self.get(row, col).is_some()
    }

    fn can_place(
        &self,
        letters: &[char],
        row: isize,
        col: isize,
        direction: Direction,
    ) -> bool {
        let size = self.size as isize;
        let length = letters.len() as isize;
        let (dr, dc) = unit(direction);

        if row < 0 ||
            col < 0 ||
            length == 0 ||
            row + dr * (length - 1) >= size ||
            col + dc * (length - 1) >= size
        {
            return false;
        }

        // The word mustn’t run into another word at either end
        if self.is_occupied(row - dr, col - dc) ||
            self.is_occupied(row + dr * length, col + dc * length)
        {
            return false;
        }

        let mut n_new_letters = 0;

        for (i, &letter) in letters.iter().enumerate() {
            let r = row + dr * i as isize;
            let c = col + dc * i as isize;

            match self.get(r, c) {
                Some(existing) => {
                    if existing != letter {
                        return false;
                    }
                },
                None => {
                    // A new letter can’t touch a letter from a
                    // parallel word on either side
                    if self.is_occupied(r - dc, c - dr) ||
                        self.is_occupied(r + dc, c + dr)
                    {
                        return false;
                    }

                    n_new_letters += 1;
                },
            }
        }

        n_new_letters > 0
    }

    fn place(&mut self, letters: &[char], placement: Placement) {
        for (i, &letter) in letters.iter().enumerate() {
            let (row, col) = match placement.direction {
                Direction::Across => (placement.row, placement.col + i),
                Direction::Down => (placement.row + i, placement.col),
            };

            self.letters[row * self.size + col] = Some(letter);
        }
    }
}

// Every legal way to cross the word with one that is already on the
// board.
fn find_placements(
    board: &Board,
    entries: &[Entry],
    placed: &[(usize, Placement)],
    letters: &[char],
) -> Vec<Placement> {
    let mut options = Vec::new();

    for &(entry_index, placement) in placed.iter() {
        let placed_letters = &entries[entry_index].letters;
        let direction = placement.direction.other();

        for (i, &placed_letter) in placed_letters.iter().enumerate() {
            for (j, &letter) in letters.iter().enumerate() {
                if placed_letter != letter {
                    continue;
                }

                let (row, col) = match placement.direction {
                    Direction::Across => (
                        placement.row as isize - j as isize,
                        (placement.col + i) as isize,
                    ),
                    Direction::Down => (
                        (placement.row + i) as isize,
                        placement.col as isize - j as isize,
                    ),
                };

                if !board.can_place(letters, row, col, direction) {
                    continue;
                }

                let option = Placement {
                    row: row as usize,
                    col: col as usize,
                    direction,
                };

                if !options.contains(&option) {
                    options.push(option);
                }
            }
        }
    }

    options
}

fn usable_entries<'a>(
    candidates: &'a [CandidateWord],
    parameters: &Parameters,
) -> Vec<Entry<'a>> {
    let max_length = parameters.max_length.min(parameters.grid_size);

    candidates.iter()
        .filter_map(|candidate| {
            let solution = candidate.solution(parameters.mode)?;
            let letters = solution.chars().collect::<Vec<_>>();

            (letters.len() >= parameters.min_length &&
             letters.len() <= max_length)
                .then_some(Entry { candidate, solution, letters })
        })
        .collect()
}

/// Lays out as many of the candidates as possible, up to the target
/// word count, so that every word crosses another one. The longest
/// word goes across the middle of the grid first. Running out of
/// candidates just makes a smaller puzzle and an empty grid is
/// returned if none of the candidates are usable.
pub fn generate<R>(
    candidates: &[CandidateWord],
    parameters: &Parameters,
    rng: &mut R,
) -> Grid
    where R: Rng + ?Sized
{
    let size = parameters.grid_size.clamp(1, MAX_GRID_SIZE);

    if size != parameters.grid_size {
        warn!(
            "grid size {} is out of range, using {}",
            parameters.grid_size,
            size,
        );
    }

    let parameters = Parameters {
        grid_size: size,
        ..parameters.clone()
    };
    let mut entries = usable_entries(candidates, &parameters);

    if entries.is_empty() || parameters.target_word_count == 0 {
        info!(
            "no usable words out of {} candidates",
            candidates.len(),
        );
        return Grid::empty(size);
    }

    entries.shuffle(rng);
    // Stable so that words of the same length stay shuffled
    entries.sort_by(|a, b| b.letters.len().cmp(&a.letters.len()));

    let mut board = Board::new(size);
    let mut placed = Vec::<(usize, Placement)>::new();

    let first = Placement {
        row: size / 2,
        col: (size - entries[0].letters.len()) / 2,
        direction: Direction::Across,
    };
    board.place(&entries[0].letters, first);
    placed.push((0, first));

    let mut n_failures = 0;

    for (entry_index, entry) in entries.iter().enumerate().skip(1) {
        if placed.len() >= parameters.target_word_count ||
            n_failures >= parameters.max_failures
        {
            break;
        }

        let options =
            find_placements(&board, &entries, &placed, &entry.letters);

        match options.choose(rng) {
            Some(&placement) => {
                debug!(
                    "placed {} at {},{} {:?}",
                    entry.solution,
                    placement.row,
                    placement.col,
                    placement.direction,
                );
                board.place(&entry.letters, placement);
                placed.push((entry_index, placement));
                n_failures = 0;
            },
            None => {
                debug!("no place for {}", entry.solution);
                n_failures += 1;
            },
        }
    }

    info!(
        "placed {}/{} words from {} usable candidates",
        placed.len(),
        parameters.target_word_count,
        entries.len(),
    );

    let words = placed.into_iter().map(|(entry_index, placement)| {
        let entry = &entries[entry_index];

        PlacedWord {
            number: 0,
            solution: entry.solution.clone(),
            text: entry.candidate.display_text(),
            translation: entry.candidate.translation.clone(),
            row: placement.row,
            col: placement.col,
            direction: placement.direction,
            is_solved: false,
        }
    });

    match Grid::new(size, words) {
        Ok(grid) => grid,
        Err(e) => {
            debug_assert!(false, "generated layout is invalid: {}", e);
            warn!("generated layout is invalid: {}", e);
            Grid::empty(size)
        },
    }
}

/// Same as [`generate`] with a fresh random generator every time
pub fn generate_unseeded(
    candidates: &[CandidateWord],
    parameters: &Parameters,
) -> Grid {
    generate(candidates, parameters, &mut rand::thread_rng())
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    static KANA_WORDS: [&str; 30] = [
        "さくら", "くるま", "まつり", "りんご", "ごはん", "はなび",
        "かさ", "さかな", "なつ", "つくえ", "えんぴつ", "つき",
        "きもの", "のり", "りす", "すし", "しま", "まど",
        "どうぶつ", "つばめ", "めがね", "ねこ", "こども", "ともだち",
        "ちず", "ずかん", "かぞく", "くつ", "つなみ", "みかん",
    ];

    fn kana_candidates() -> Vec<CandidateWord> {
        KANA_WORDS.iter()
            .map(|&kana| CandidateWord::new("", kana, kana))
            .collect()
    }

    fn parameters(target_word_count: usize) -> Parameters {
        Parameters {
            target_word_count,
            ..Parameters::default()
        }
    }

    fn check_layout(grid: &Grid) {
        let size = grid.size() as isize;
        let is_black = |row: isize, col: isize| {
            row < 0 || col < 0 || row >= size || col >= size ||
                grid.at(row as usize, col as usize).unwrap().is_black()
        };

        for word in grid.words() {
            let (dr, dc) = unit(word.direction);
            let length = word.len() as isize;
            let (row, col) = (word.row as isize, word.col as isize);

            assert!(is_black(row - dr, col - dc));
            assert!(is_black(row + dr * length, col + dc * length));

            for ((r, c), letter) in word.positions().zip(word.solution.chars())
            {
                let cell = grid.at(r, c).unwrap();

                assert_eq!(cell.solution(), Some(letter));

                if grid.words_at(r, c).count() == 1 {
                    let (r, c) = (r as isize, c as isize);
                    assert!(is_black(r - dc, c - dr));
                    assert!(is_black(r + dc, c + dr));
                }
            }
        }

        for cell in grid.cells() {
            assert_eq!(
                cell.is_black(),
                grid.words_at(cell.row(), cell.col()).next().is_none(),
            );
        }
    }

    #[test]
    fn empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate(&[], &parameters(5), &mut rng);

        assert_eq!(grid.size(), DEFAULT_GRID_SIZE);
        assert_eq!(grid.cells().len(), DEFAULT_GRID_SIZE * DEFAULT_GRID_SIZE);
        assert!(grid.cells().iter().all(|cell| cell.is_black()));
        assert!(grid.words().is_empty());

        let grid = generate(&kana_candidates(), &parameters(0), &mut rng);
        assert!(grid.words().is_empty());
    }

    #[test]
    fn three_animals() {
        let candidates = vec![
            CandidateWord::new("猫", "ねこ", "cat"),
            CandidateWord::new("犬", "いぬ", "dog"),
            CandidateWord::new("熊", "くま", "bear"),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate(&candidates, &parameters(3), &mut rng);

            assert!((1..=3).contains(&grid.words().len()));
            assert!(grid.words().iter().all(|word| word.len() == 2));

            let first = grid.word_at(8, 7, Direction::Across).unwrap();
            let first = grid.word(first);
            assert_eq!(first.row, 8);
            assert_eq!(first.col, 7);
            assert!(!first.text.is_empty());
            assert!(!first.translation.is_empty());

            check_layout(&grid);
        }
    }

    #[test]
    fn valid_layouts() {
        let candidates = kana_candidates();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate(&candidates, &parameters(12), &mut rng);

            assert!(!grid.words().is_empty());
            assert!(grid.words().len() <= 12);

            check_layout(&grid);

            let numbers = grid.words().iter()
                .map(|word| word.number)
                .collect::<Vec<_>>();
            assert_eq!(
                numbers,
                (1..=grid.words().len() as u32).collect::<Vec<_>>(),
            );
        }
    }

    #[test]
    fn longest_word_first() {
        let candidates = kana_candidates();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate(&candidates, &parameters(6), &mut rng);

        let first = grid.word_at(8, 6, Direction::Across).unwrap();
        assert_eq!(grid.word(first).len(), 4);
        assert_eq!(grid.word(first).col, (16 - 4) / 2);
    }

    #[test]
    fn seeded() {
        let candidates = kana_candidates();

        let a = generate(
            &candidates,
            &parameters(10),
            &mut StdRng::seed_from_u64(42),
        );
        let b = generate(
            &candidates,
            &parameters(10),
            &mut StdRng::seed_from_u64(42),
        );

        assert_eq!(a.words(), b.words());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn length_filter() {
        let candidates = vec![
            CandidateWord::new("", "あ", ""),
            CandidateWord::new("", "あいうえおかきくけ", ""),
        ];
        let mut rng = StdRng::seed_from_u64(3);

        assert!(generate(&candidates, &parameters(2), &mut rng)
                .words()
                .is_empty());

        // Words that don’t fit in the grid are also skipped
        let small = Parameters {
            grid_size: 3,
            ..parameters(2)
        };
        let candidates = vec![CandidateWord::new("", "あいうえ", "")];
        assert!(generate(&candidates, &small, &mut rng).words().is_empty());
    }

    #[test]
    fn character_mode() {
        let candidates = vec![
            CandidateWord::new("日本", "にほん", "Japan"),
            CandidateWord::new("本当", "ほんとう", "truth"),
            CandidateWord::new("食べる", "たべる", "to eat"),
            CandidateWord::new("犬", "いぬ", "dog"),
        ];
        let parameters = Parameters {
            mode: Mode::Character,
            ..parameters(4)
        };

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate(&candidates, &parameters, &mut rng);

            assert_eq!(grid.words().len(), 2);

            let mut solutions = grid.words().iter()
                .map(|word| word.solution.as_str())
                .collect::<Vec<_>>();
            solutions.sort_unstable();
            assert_eq!(solutions, ["日本", "本当"]);

            check_layout(&grid);
        }
    }

    #[test]
    fn no_crossings() {
        let candidates = vec![
            CandidateWord::new("", "あい", ""),
            CandidateWord::new("", "うえ", ""),
            CandidateWord::new("", "おか", ""),
        ];
        let parameters = Parameters {
            max_failures: 1,
            ..parameters(3)
        };
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(generate(&candidates, &parameters, &mut rng).words().len(), 1);
    }

    #[test]
    fn unreasonable_size() {
        let candidates = kana_candidates();
        let mut rng = StdRng::seed_from_u64(11);

        let huge = Parameters {
            grid_size: usize::MAX,
            ..parameters(4)
        };
        let grid = generate(&candidates, &huge, &mut rng);
        assert_eq!(grid.size(), MAX_GRID_SIZE);
        assert!(!grid.words().is_empty());
        check_layout(&grid);

        let zero = Parameters {
            grid_size: 0,
            ..parameters(4)
        };
        let grid = generate(&candidates, &zero, &mut rng);
        assert_eq!(grid.size(), 1);
        assert!(grid.words().is_empty());
    }

    #[test]
    fn board_rules() {
        let mut board = Board::new(6);
        let across = Placement { row: 2, col: 1, direction: Direction::Across };
        board.place(&['ね', 'こ', 'ま'], across);

        // Crossing through “こ”
        assert!(board.can_place(&['い', 'こ'], 1, 2, Direction::Down));
        // Wrong letter at the crossing
        assert!(!board.can_place(&['い', 'ぬ'], 1, 2, Direction::Down));
        // Would run on from the end of “ねこま”
        assert!(!board.can_place(&['あ', 'い'], 2, 4, Direction::Across));
        // Parallel and touching
        assert!(!board.can_place(&['あ', 'い'], 3, 1, Direction::Across));
        // Ending just above the word
        assert!(!board.can_place(&['あ', 'い'], 0, 3, Direction::Down));
        // Entirely on top of existing letters
        assert!(!board.can_place(&['ね', 'こ', 'ま'], 2, 1, Direction::Across));
        // Off the grid
        assert!(!board.can_place(&['あ', 'ま'], 2, -1, Direction::Down));
        assert!(!board.can_place(
            &['ま', 'い', 'う', 'え', 'お'],
            2,
            3,
            Direction::Down,
        ));
    }
}
