//! `AllowedAGCTN` enum for DNA bases A, G, C, T, and N
//! Provides type-safe representation of the canonical bases
//! that can carry a modification in the MM tag

use crate::{Error, ModChar};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the allowed canonical bases of a modification: A, G, C, T, or N.
/// N is a wildcard i.e. every position in a sequence is an N.
#[derive(
    Debug, Clone, Default, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AllowedAGCTN {
    /// Adenine
    A,
    /// Guanine
    G,
    /// Cytosine
    C,
    /// Thymine
    T,
    /// Any base (N)
    #[default]
    N,
}

impl AllowedAGCTN {
    /// Whether a (case-insensitive) sequence byte counts as an occurrence
    /// of this base. An N matches every byte.
    ///
    /// ```
    /// use r2rmod_core::AllowedAGCTN;
    /// assert!(AllowedAGCTN::A.matches(b'a'));
    /// assert!(!AllowedAGCTN::A.matches(b'C'));
    /// assert!(AllowedAGCTN::N.matches(b'G'));
    /// ```
    #[must_use]
    pub fn matches(self, seq_base: u8) -> bool {
        match self {
            AllowedAGCTN::N => true,
            v => u8::from(v) == seq_base.to_ascii_uppercase(),
        }
    }

    /// Modification code used when only a base is given on the command line.
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, ModChar};
    /// assert_eq!(AllowedAGCTN::A.default_mod_code(), ModChar::new('a'));
    /// assert_eq!(AllowedAGCTN::C.default_mod_code(), ModChar::new('m'));
    /// ```
    #[must_use]
    pub fn default_mod_code(self) -> ModChar {
        match self {
            AllowedAGCTN::A => ModChar::new('a'),
            AllowedAGCTN::C => ModChar::new('m'),
            AllowedAGCTN::G => ModChar::new('o'),
            AllowedAGCTN::T => ModChar::new('T'),
            AllowedAGCTN::N => ModChar::new('N'),
        }
    }
}

/// Implements conversion from `AllowedAGCTN` to `char`
impl From<AllowedAGCTN> for char {
    fn from(base: AllowedAGCTN) -> Self {
        match base {
            AllowedAGCTN::A => 'A',
            AllowedAGCTN::G => 'G',
            AllowedAGCTN::C => 'C',
            AllowedAGCTN::T => 'T',
            AllowedAGCTN::N => 'N',
        }
    }
}

/// Implements conversion from `AllowedAGCTN` to `u8`
impl From<AllowedAGCTN> for u8 {
    fn from(base: AllowedAGCTN) -> Self {
        match base {
            AllowedAGCTN::A => b'A',
            AllowedAGCTN::G => b'G',
            AllowedAGCTN::C => b'C',
            AllowedAGCTN::T => b'T',
            AllowedAGCTN::N => b'N',
        }
    }
}

/// Implements parsing from string
///
/// ```
/// use r2rmod_core::AllowedAGCTN;
/// use std::str::FromStr;
///
/// assert_eq!(AllowedAGCTN::from_str("A")?, AllowedAGCTN::A);
/// assert_eq!(AllowedAGCTN::from_str("N")?, AllowedAGCTN::N);
/// # Ok::<(), r2rmod_core::Error>(())
/// ```
///
/// ```should_panic
/// # use r2rmod_core::AllowedAGCTN;
/// # use std::str::FromStr;
/// // Invalid base should error
/// let base = AllowedAGCTN::from_str("X")?;
/// # Ok::<(), r2rmod_core::Error>(())
/// ```
impl FromStr for AllowedAGCTN {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => AllowedAGCTN::try_from(c),
            _ => Err(Error::InvalidBase(s.to_owned())),
        }
    }
}

/// Implements conversion from `char`
impl TryFrom<char> for AllowedAGCTN {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'A' => Ok(AllowedAGCTN::A),
            'G' => Ok(AllowedAGCTN::G),
            'C' => Ok(AllowedAGCTN::C),
            'T' => Ok(AllowedAGCTN::T),
            'N' => Ok(AllowedAGCTN::N),
            v => Err(Error::InvalidBase(v.to_string())),
        }
    }
}

/// Implements conversion from `u8`
impl TryFrom<u8> for AllowedAGCTN {
    type Error = Error;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        AllowedAGCTN::try_from(char::from(b))
    }
}

impl fmt::Display for AllowedAGCTN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}
