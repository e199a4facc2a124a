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
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const N_DISTRACTORS: usize = 5;

static KANA: &str =
    "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほ\
     まみむめもやゆよらりるれろわをん";

static COMMON_KANJI: &str = "日一国会人年大十二本中長出三同時政自前者";

// The other words’ kanji are only used as distractors once there is
// enough variety among them
const MIN_OTHER_KANJI: usize = 10;

// 64-bit FNV-1a
fn content_hash(s: &str) -> u64 {
    s.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    })
}

fn push_unique(chars: &mut Vec<char>, ch: char) {
    if !chars.contains(&ch) {
        chars.push(ch);
    }
}

/// Picks the set of keys to offer while the player fills in a word.
/// The keys are all of the word’s letters mixed with a few random
/// distractors. The random generator is seeded from the solution so
/// the same word always gets the same keyboard.
pub fn keyboard_keys<'a, I>(
    solution: &str,
    mode: Mode,
    other_words: I,
) -> Vec<char>
    where I: IntoIterator<Item = &'a str>
{
    let mut rng = StdRng::seed_from_u64(content_hash(solution));

    let source = match mode {
        Mode::Phonetic => KANA.chars().collect::<Vec<_>>(),
        Mode::Character => {
            let mut other_kanji = Vec::new();

            for ch in other_words.into_iter().flat_map(str::chars) {
                push_unique(&mut other_kanji, ch);
            }

            if other_kanji.len() > MIN_OTHER_KANJI {
                other_kanji
            } else {
                COMMON_KANJI.chars().collect()
            }
        },
    };

    let mut keys = Vec::new();

    for ch in solution.chars() {
        push_unique(&mut keys, ch);
    }

    for _ in 0..N_DISTRACTORS {
        if let Some(&ch) = source.choose(&mut rng) {
            push_unique(&mut keys, ch);
        }
    }

    keys.shuffle(&mut rng);

    keys
}
