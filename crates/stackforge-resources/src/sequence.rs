//! Character sequences a random string can be drawn from.

use serde::{Deserialize, Serialize};
use stackforge_types::{Result, StackError};
use std::fmt;
use std::str::FromStr;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const LETTERS_DIGITS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const HEX_DIGITS: &str = "0123456789ABCDEF";
const OCT_DIGITS: &str = "01234567";

/// Named character sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sequence {
    /// ASCII letters and digits
    #[default]
    LettersDigits,
    /// ASCII letters
    Letters,
    /// ASCII lowercase letters
    Lowercase,
    /// ASCII uppercase letters
    Uppercase,
    /// Decimal digits
    Digits,
    /// Decimal digits and `A`-`F`
    HexDigits,
    /// Octal digits
    OctDigits,
}

impl Sequence {
    /// Every sequence, in declaration order.
    pub const ALL: [Sequence; 7] = [
        Sequence::LettersDigits,
        Sequence::Letters,
        Sequence::Lowercase,
        Sequence::Uppercase,
        Sequence::Digits,
        Sequence::HexDigits,
        Sequence::OctDigits,
    ];

    /// Property value naming this sequence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::LettersDigits => "lettersdigits",
            Sequence::Letters => "letters",
            Sequence::Lowercase => "lowercase",
            Sequence::Uppercase => "uppercase",
            Sequence::Digits => "digits",
            Sequence::HexDigits => "hexdigits",
            Sequence::OctDigits => "octdigits",
        }
    }

    /// Characters of this sequence, in order.
    pub fn alphabet(&self) -> &'static str {
        match self {
            Sequence::LettersDigits => LETTERS_DIGITS,
            Sequence::Letters => LETTERS,
            Sequence::Lowercase => LOWERCASE,
            Sequence::Uppercase => UPPERCASE,
            Sequence::Digits => DIGITS,
            Sequence::HexDigits => HEX_DIGITS,
            Sequence::OctDigits => OCT_DIGITS,
        }
    }

    /// Property values of every sequence.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|seq| seq.as_str())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sequence {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|seq| seq.as_str() == s)
            .ok_or_else(|| StackError::Validation(format!("Invalid sequence: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabets() {
        assert_eq!(Sequence::Digits.alphabet(), "0123456789");
        assert_eq!(Sequence::HexDigits.alphabet(), "0123456789ABCDEF");
        assert_eq!(Sequence::OctDigits.alphabet(), "01234567");
        assert_eq!(Sequence::Letters.alphabet().len(), 52);
        assert_eq!(Sequence::LettersDigits.alphabet().len(), 62);
        assert_eq!(
            Sequence::LettersDigits.alphabet(),
            format!("{}{}{}", LOWERCASE, UPPERCASE, DIGITS)
        );
    }

    #[test]
    fn test_alphabets_have_no_duplicates() {
        for seq in Sequence::ALL {
            let mut chars: Vec<char> = seq.alphabet().chars().collect();
            let len = chars.len();
            chars.sort_unstable();
            chars.dedup();
            assert_eq!(chars.len(), len, "duplicate characters in {}", seq);
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for seq in Sequence::ALL {
            assert_eq!(seq.as_str().parse::<Sequence>().unwrap(), seq);
        }
        assert!("LettersDigits".parse::<Sequence>().is_err());
        assert!("punctuation".parse::<Sequence>().is_err());
        assert_eq!(Sequence::default(), Sequence::LettersDigits);
    }
}
