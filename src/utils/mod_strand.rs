//! `ModStrand` enum for the strand of a modification call
//! i.e. the `+` or `-` in an MM entry such as `C+m` or `T-a`

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strand a modification was called on.
/// NOTE: this is not the alignment strand, but the strand in the MM tag.
/// `+` means the call is on the basecalled strand and `-` on its complement.
#[derive(
    Debug, Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum ModStrand {
    /// Basecalled strand, `+`
    #[default]
    #[serde(rename = "+")]
    Plus,
    /// Complement of the basecalled strand, `-`
    #[serde(rename = "-")]
    Minus,
}

/// ```
/// use r2rmod_core::ModStrand;
/// use std::str::FromStr;
/// assert_eq!(ModStrand::from_str("+")?, ModStrand::Plus);
/// assert_eq!(ModStrand::from_str("-")?, ModStrand::Minus);
/// # Ok::<(), r2rmod_core::Error>(())
/// ```
impl FromStr for ModStrand {
    type Err = Error;

    fn from_str(val_str: &str) -> Result<Self, Self::Err> {
        match val_str {
            "+" => Ok(ModStrand::Plus),
            "-" => Ok(ModStrand::Minus),
            v => Err(Error::InvalidModStrand(v.to_owned())),
        }
    }
}

impl TryFrom<char> for ModStrand {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '+' => Ok(ModStrand::Plus),
            '-' => Ok(ModStrand::Minus),
            v => Err(Error::InvalidModStrand(v.to_string())),
        }
    }
}

impl From<ModStrand> for char {
    fn from(val: ModStrand) -> char {
        match val {
            ModStrand::Plus => '+',
            ModStrand::Minus => '-',
        }
    }
}

impl fmt::Display for ModStrand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_strand_round_trips_through_char() {
        for s in [ModStrand::Plus, ModStrand::Minus] {
            assert_eq!(ModStrand::try_from(char::from(s)).expect("no error"), s);
            assert_eq!(ModStrand::from_str(&s.to_string()).expect("no error"), s);
        }
    }

    #[test]
    fn mod_strand_errors() {
        assert!(matches!(
            ModStrand::from_str("bc"),
            Err(Error::InvalidModStrand(_))
        ));
        assert!(matches!(
            ModStrand::from_str(""),
            Err(Error::InvalidModStrand(_))
        ));
        assert!(matches!(
            ModStrand::try_from('.'),
            Err(Error::InvalidModStrand(_))
        ));
    }
}
