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
use std::str::FromStr;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// The solution is the written form, which must be all kanji
    Character,
    /// The solution is the kana reading
    #[default]
    Phonetic,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Character => write!(f, "character"),
            Mode::Phonetic => write!(f, "phonetic"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidMode;

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid mode")
    }
}

impl std::error::Error for InvalidMode {
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Mode, InvalidMode> {
        match s.to_ascii_lowercase().as_str() {
            "character" | "kanji" => Ok(Mode::Character),
            "phonetic" | "kana" => Ok(Mode::Phonetic),
            _ => Err(InvalidMode),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateWord {
    pub text: String,
    pub phonetics: String,
    #[serde(alias = "meaning")]
    pub translation: String,
}

impl CandidateWord {
    pub fn new(
        text: impl Into<String>,
        phonetics: impl Into<String>,
        translation: impl Into<String>,
    ) -> CandidateWord {
        CandidateWord {
            text: text.into(),
            phonetics: phonetics.into(),
            translation: translation.into(),
        }
    }

    /// Returns the string that the player has to type into the grid
    /// for this word, or `None` if the word can’t be used in the
    /// given mode.
    pub fn solution(&self, mode: Mode) -> Option<String> {
        let solution = match mode {
            Mode::Phonetic => clean_phonetics(&self.phonetics),
            Mode::Character => {
                let text = clean_text(&self.text);

                if !text.chars().all(is_cjk_ideograph) {
                    return None;
                }

                text
            },
        };

        (!solution.is_empty()).then_some(solution)
    }

    /// The written form without the okurigana separators
    pub fn display_text(&self) -> String {
        clean_text(&self.text)
    }
}

fn clean_text(text: &str) -> String {
    text.chars().filter(|&ch| ch != '.').collect()
}

// Word lists give alternate readings separated by slashes and mark
// the okurigana boundary with a period, eg “た.べる/く.う”. Only the
// first reading is used.
pub fn clean_phonetics(phonetics: &str) -> String {
    phonetics.split('/')
        .find(|part| !part.trim().is_empty())
        .map(|part| {
            part.chars()
                .filter(|&ch| ch != '.' && !ch.is_whitespace())
                .collect()
        })
        .unwrap_or_default()
}

pub fn is_cjk_ideograph(ch: char) -> bool {
    matches!(
        ch,
        '\u{4e00}'..='\u{9fff}' |
        '\u{3400}'..='\u{4dbf}' |
        '\u{20000}'..='\u{2a6df}' |
        '\u{2a700}'..='\u{2ebef}' |
        '\u{f900}'..='\u{faff}' |
        '々'
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn phonetics() {
        assert_eq!(&clean_phonetics("ねこ"), "ねこ");
        assert_eq!(&clean_phonetics("た.べる/く.う"), "たべる");
        assert_eq!(&clean_phonetics("/ あ お い"), "あおい");
        assert_eq!(&clean_phonetics(" /いぬ"), "いぬ");
        assert_eq!(&clean_phonetics(""), "");
        assert_eq!(&clean_phonetics("//"), "");
    }

    #[test]
    fn cjk() {
        assert!(is_cjk_ideograph('猫'));
        assert!(is_cjk_ideograph('々'));
        assert!(is_cjk_ideograph('\u{20b9f}'));
        assert!(!is_cjk_ideograph('ね'));
        assert!(!is_cjk_ideograph('カ'));
        assert!(!is_cjk_ideograph('a'));
    }

    #[test]
    fn solution() {
        let word = CandidateWord::new("食.べる", "た.べる", "to eat");

        assert_eq!(word.solution(Mode::Phonetic).unwrap(), "たべる");
        assert!(word.solution(Mode::Character).is_none());
        assert_eq!(&word.display_text(), "食べる");

        let word = CandidateWord::new("時々", "ときどき", "sometimes");
        assert_eq!(word.solution(Mode::Character).unwrap(), "時々");

        let word = CandidateWord::new("", "", "nothing");
        assert!(word.solution(Mode::Phonetic).is_none());
        assert!(word.solution(Mode::Character).is_none());
    }

    #[test]
    fn parse_mode() {
        assert_eq!("phonetic".parse::<Mode>().unwrap(), Mode::Phonetic);
        assert_eq!("KANJI".parse::<Mode>().unwrap(), Mode::Character);
        assert_eq!(
            &"romaji".parse::<Mode>().unwrap_err().to_string(),
            "invalid mode",
        );
        assert_eq!(Mode::Character.to_string(), "character");
    }

    #[test]
    fn deserialize() {
        let word = serde_json::from_str::<CandidateWord>(
            r#"{"id":"12","text":"犬","phonetics":"いぬ","meaning":"dog"}"#
        ).unwrap();

        assert_eq!(word, CandidateWord::new("犬", "いぬ", "dog"));
        assert_eq!(
            serde_json::to_string(&Mode::Character).unwrap(),
            "\"CHARACTER\"",
        );
    }
}
