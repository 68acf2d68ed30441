//! `ReadState` enum for representing BAM alignment states
//! Handles conversion from BAM flags and records

use crate::Error;
use rust_htslib::bam::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alignment state of a read; seven possibilities
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadState {
    #[default]
    /// Primary alignment to the reference strand
    #[serde(rename = "primary_forward")]
    PrimaryFwd,
    /// Primary alignment opposite the reference strand
    #[serde(rename = "primary_reverse")]
    PrimaryRev,
    /// Secondary alignment to the reference strand
    #[serde(rename = "secondary_forward")]
    SecondaryFwd,
    /// Secondary alignment opposite the reference strand
    #[serde(rename = "secondary_reverse")]
    SecondaryRev,
    /// Supplementary alignment to the reference strand
    #[serde(rename = "supplementary_forward")]
    SupplementaryFwd,
    /// Supplementary alignment opposite the reference strand
    #[serde(rename = "supplementary_reverse")]
    SupplementaryRev,
    /// Marked as unmapped in the BAM file.
    #[serde(rename = "unmapped")]
    Unmapped,
}

impl ReadState {
    /// Whether this is the primary record of a read i.e. it carries the full
    /// sequence. Unmapped records count as primary.
    #[must_use]
    pub fn is_primary(self) -> bool {
        matches!(
            self,
            ReadState::PrimaryFwd | ReadState::PrimaryRev | ReadState::Unmapped
        )
    }
}

/// Classifies a record using its flags. Only the unmapped, reverse,
/// secondary and supplementary bits are looked at; paired-end bits are ignored.
/// An unmapped record may still carry the reverse bit (its sequence was
/// stored reverse complemented), so that bit does not matter when unmapped.
///
/// # Errors
/// Contradictory flags, e.g. secondary and supplementary at once,
/// or unmapped and secondary.
impl TryFrom<u16> for ReadState {
    type Error = Error;

    fn try_from(flags: u16) -> Result<ReadState, Error> {
        let is_unmapped = flags & 0x4 != 0;
        let is_reverse = flags & 0x10 != 0;
        let is_secondary = flags & 0x100 != 0;
        let is_supplementary = flags & 0x800 != 0;
        match (is_reverse, is_unmapped, is_secondary, is_supplementary) {
            (_, true, false, false) => Ok(ReadState::Unmapped),
            (false, false, false, false) => Ok(ReadState::PrimaryFwd),
            (true, false, false, false) => Ok(ReadState::PrimaryRev),
            (false, false, true, false) => Ok(ReadState::SecondaryFwd),
            (true, false, true, false) => Ok(ReadState::SecondaryRev),
            (false, false, false, true) => Ok(ReadState::SupplementaryFwd),
            (true, false, false, true) => Ok(ReadState::SupplementaryRev),
            _ => Err(Error::InvalidState(format!(
                "unknown alignment state for flags {flags}"
            ))),
        }
    }
}

impl TryFrom<&Record> for ReadState {
    type Error = Error;

    fn try_from(record: &Record) -> Result<ReadState, Error> {
        ReadState::try_from(record.flags())
    }
}

/// Implements printing of read state
impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ReadState::PrimaryFwd => "primary_forward",
            ReadState::SecondaryFwd => "secondary_forward",
            ReadState::SupplementaryFwd => "supplementary_forward",
            ReadState::PrimaryRev => "primary_reverse",
            ReadState::SecondaryRev => "secondary_reverse",
            ReadState::SupplementaryRev => "supplementary_reverse",
            ReadState::Unmapped => "unmapped",
        };
        write!(f, "{printable}")
    }
}
