//! `ModType` struct, the (base, strand, code) triple that heads an MM entry
//! e.g. `A+a`, `C+m`, `T-472232`

use crate::{AllowedAGCTN, Error, ModChar, ModStrand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One kind of modification call. Calls on a read are grouped by this key,
/// and it is written back out as the header of an MM entry.
#[derive(Debug, Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ModType {
    /// canonical base that is modified
    pub base: AllowedAGCTN,
    /// strand the call was made on
    pub strand: ModStrand,
    /// modification code
    pub code: ModChar,
}

impl ModType {
    /// Creates a new modification type
    #[must_use]
    pub fn new(base: AllowedAGCTN, strand: ModStrand, code: ModChar) -> Self {
        ModType { base, strand, code }
    }
}

/// Parses `A+a`-style types. A bare base such as `A` is accepted too and
/// expands to the plus strand and the default code for that base.
///
/// ```
/// use r2rmod_core::{AllowedAGCTN, ModChar, ModStrand, ModType};
/// use std::str::FromStr;
///
/// let m = ModType::from_str("C-m")?;
/// assert_eq!(m, ModType::new(AllowedAGCTN::C, ModStrand::Minus, ModChar::new('m')));
///
/// let m = ModType::from_str("A")?;
/// assert_eq!(m.to_string(), "A+a");
///
/// let m = ModType::from_str("T+472232")?;
/// assert_eq!(m.to_string(), "T+472232");
/// # Ok::<(), r2rmod_core::Error>(())
/// ```
impl FromStr for ModType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let base = AllowedAGCTN::try_from(
            chars
                .next()
                .ok_or_else(|| Error::InvalidModType(s.to_owned()))?,
        )?;
        match chars.next() {
            None => Ok(ModType::new(base, ModStrand::Plus, base.default_mod_code())),
            Some(c) => {
                let strand = ModStrand::try_from(c)?;
                let code = ModChar::from_str(chars.as_str())
                    .map_err(|_| Error::InvalidModType(s.to_owned()))?;
                Ok(ModType::new(base, strand, code))
            }
        }
    }
}

impl fmt::Display for ModType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.base, self.strand, self.code)
    }
}

impl Serialize for ModType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ModType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ModType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_bases_get_default_codes() {
        let expected = [("A", "A+a"), ("C", "C+m"), ("G", "G+o"), ("T", "T+T"), ("N", "N+N")];
        for (input, output) in expected {
            assert_eq!(
                ModType::from_str(input).expect("no error").to_string(),
                output
            );
        }
    }

    #[test]
    fn explicit_types_round_trip() {
        for input in ["A+a", "C-m", "G+o", "T+472232", "N+N"] {
            assert_eq!(
                ModType::from_str(input).expect("no error").to_string(),
                input
            );
        }
    }

    #[test]
    #[should_panic(expected = "InvalidModType")]
    fn multiple_codes_panic() {
        let _: ModType = ModType::from_str("C+hm").unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidModType")]
    fn missing_code_panics() {
        let _: ModType = ModType::from_str("C+").unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidModStrand")]
    fn bad_strand_panics() {
        let _: ModType = ModType::from_str("C*m").unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidBase")]
    fn bad_base_panics() {
        let _: ModType = ModType::from_str("U+b").unwrap();
    }

    #[test]
    fn ordering_groups_by_base_first() {
        let mut types = vec![
            ModType::from_str("C+m").expect("no error"),
            ModType::from_str("A+a").expect("no error"),
            ModType::from_str("C+h").expect("no error"),
        ];
        types.sort();
        let shown: Vec<String> = types.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["A+a", "C+h", "C+m"]);
    }
}
