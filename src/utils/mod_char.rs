//! `ModChar` struct for modification codes in MM tags
//! Handles both letter and numeric (`ChEBI`) modification codes

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single modification code, the part after the strand in an MM entry
/// e.g. `a` in `A+a`, `m` in `C+m`, or `472232` in `T+472232`.
/// Numeric `ChEBI` codes are stored as the `char` with that scalar value,
/// so a code is always one `char` regardless of how it is written.
/// NOTE: this means `A+a` and `A+97` are the same code. The rust `char`
/// also forbids the surrogate range (0xD800 to 0xDFFF); a `ChEBI` code in
/// that range is rejected as invalid.
#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ModChar(char);

impl Default for ModChar {
    fn default() -> Self {
        ModChar::new('N')
    }
}

impl ModChar {
    /// Wraps a character
    #[must_use]
    pub fn new(val: char) -> Self {
        ModChar(val)
    }
    /// Returns the character
    ///
    /// ```
    /// use r2rmod_core::ModChar;
    /// assert_eq!(ModChar::new('a').val(), 'a');
    /// ```
    #[must_use]
    pub fn val(&self) -> char {
        self.0
    }
    /// Parses the code group of an MM entry. Letters may be combined,
    /// each being one code (`hm` is 5hmC and 5mC), whereas digits form
    /// a single numeric code.
    ///
    /// ```
    /// use r2rmod_core::ModChar;
    /// let codes = ModChar::parse_codes("hm")?;
    /// assert_eq!(codes, vec![ModChar::new('h'), ModChar::new('m')]);
    /// let codes = ModChar::parse_codes("472232")?;
    /// assert_eq!(codes.len(), 1);
    /// assert_eq!(codes[0].to_string(), "472232");
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// Empty input, mixed letters and digits, or other characters.
    pub fn parse_codes(codes: &str) -> Result<Vec<ModChar>, Error> {
        if codes.is_empty() {
            Err(Error::EmptyModType(String::new()))
        } else if codes.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(codes.chars().map(ModChar).collect())
        } else if codes.bytes().all(|b| b.is_ascii_digit()) {
            Ok(vec![ModChar::from_str(codes)?])
        } else {
            Err(Error::InvalidModType(codes.to_owned()))
        }
    }
}

impl From<char> for ModChar {
    fn from(value: char) -> Self {
        ModChar::new(value)
    }
}

impl From<u8> for ModChar {
    fn from(value: u8) -> Self {
        ModChar::new(char::from(value))
    }
}

impl FromStr for ModChar {
    type Err = Error;

    /// Parses exactly one code: a single letter or a number.
    ///
    /// ```
    /// use r2rmod_core::ModChar;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(ModChar::from_str("m")?.val(), 'm');
    /// assert_eq!(ModChar::from_str("472232")?.to_string(), "472232");
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// ```should_panic
    /// # use r2rmod_core::ModChar;
    /// # use std::str::FromStr;
    /// // two letters are two codes, not one
    /// let mod_char = ModChar::from_str("hm")?;
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    fn from_str(mod_type: &str) -> Result<Self, Self::Err> {
        let first_char = mod_type
            .chars()
            .next()
            .ok_or(Error::EmptyModType(String::new()))?;
        match first_char {
            'A'..='Z' | 'a'..='z' if mod_type.len() == 1 => Ok(ModChar(first_char)),
            '0'..='9' => {
                let val = char::from_u32(mod_type.parse()?)
                    .ok_or(Error::InvalidModType(mod_type.to_owned()))?;
                Ok(ModChar(val))
            }
            _ => Err(Error::InvalidModType(mod_type.to_owned())),
        }
    }
}

impl fmt::Display for ModChar {
    /// Letters are shown as is, anything else as its number.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.val() {
            w @ ('A'..='Z' | 'a'..='z') => w.to_string(),
            w => (w as u32).to_string(),
        }
        .fmt(f)
    }
}

impl Serialize for ModChar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ModChar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ModChar::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_letters_and_numbers() {
        assert_eq!(format!("{}", ModChar::from_str("a").expect("no failure")), "a");
        assert_eq!(format!("{}", ModChar::from_str("T").expect("no failure")), "T");
        assert_eq!(
            format!("{}", ModChar::from_str("77000").expect("no failure")),
            "77000"
        );
        // 97 is the ascii code of a, so it displays as the letter
        assert_eq!(format!("{}", ModChar::from_str("97").expect("no failure")), "a");
    }

    #[test]
    fn parse_codes_letter_group() {
        let codes = ModChar::parse_codes("hmf").expect("should parse");
        assert_eq!(
            codes,
            vec![ModChar::new('h'), ModChar::new('m'), ModChar::new('f')]
        );
    }

    #[test]
    fn parse_codes_single_numeric() {
        let codes = ModChar::parse_codes("17596").expect("should parse");
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].to_string(), "17596");
    }

    #[test]
    #[should_panic(expected = "InvalidModType")]
    fn parse_codes_mixed_panics() {
        let _ = ModChar::parse_codes("m123").unwrap();
    }

    #[test]
    #[should_panic(expected = "EmptyModType")]
    fn parse_codes_empty_panics() {
        let _ = ModChar::parse_codes("").unwrap();
    }

    #[test]
    #[should_panic(expected = "InvalidModType")]
    fn surrogate_code_panics() {
        // 55296 is 0xD800, the first surrogate
        let _: ModChar = ModChar::from_str("55296").unwrap();
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&ModChar::from_str("472232").expect("no error"))
            .expect("no error");
        assert_eq!(json, "\"472232\"");
        let back: ModChar = serde_json::from_str("\"m\"").expect("no error");
        assert_eq!(back, ModChar::new('m'));
    }
}
