//! # Delta encoder
//!
//! The MM tag does not store positions along a read. It stores, for each
//! modified base, how many bases of the same kind were skipped since the
//! previous modified base (or since the start of the read for the first one).
//! E.g. on `AACAAT`, modified As at positions 0 and 4 are written `A+a,0,2`:
//! no A skipped before position 0, then the As at 1 and 3 skipped.
//!
//! Both directions go through a running tally of occurrences of the base,
//! so encoding and decoding are lookups into one precomputed vector.

use crate::{AllowedAGCTN, AscendingPositions, Error};
use itertools::join;
use serde::Serialize;
use std::fmt;

/// Deltas of one MM entry, i.e. counts of skipped same-base occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaList(Vec<u32>);

impl DeltaList {
    /// Returns the deltas
    #[must_use]
    pub fn get(&self) -> &[u32] {
        &self.0
    }
    /// Number of deltas
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Whether there are no deltas
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for DeltaList {
    fn from(value: Vec<u32>) -> Self {
        DeltaList(value)
    }
}

/// Comma-joined decimals, no separators at either end
impl fmt::Display for DeltaList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", join(&self.0, ","))
    }
}

/// Converts between positions on a forward sequence and MM deltas for one base.
#[derive(Debug, Clone)]
pub struct DeltaListEncoder {
    base: AllowedAGCTN,
    /// Entry `i` is the number of occurrences of `base` in `seq[..=i]`
    cumulative_counts: Vec<u32>,
}

impl DeltaListEncoder {
    /// Builds the occurrence tally of `base` along `forward_seq`
    #[must_use]
    pub fn new(forward_seq: &[u8], base: AllowedAGCTN) -> Self {
        let cumulative_counts = forward_seq
            .iter()
            .scan(0u32, |count, &nt| {
                if base.matches(nt) {
                    *count = count.saturating_add(1);
                }
                Some(*count)
            })
            .collect::<Vec<u32>>();
        debug_assert_eq!(cumulative_counts.len(), forward_seq.len());
        DeltaListEncoder {
            base,
            cumulative_counts,
        }
    }

    /// The base this encoder counts
    #[must_use]
    pub fn base(&self) -> AllowedAGCTN {
        self.base
    }

    /// Length of the underlying sequence
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.cumulative_counts.len()
    }

    /// Whether position `pos` holds the base (false beyond the sequence end)
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, DeltaListEncoder};
    /// let enc = DeltaListEncoder::new(b"AACAAT", AllowedAGCTN::A);
    /// assert!(enc.holds_base(0));
    /// assert!(!enc.holds_base(2));
    /// assert!(!enc.holds_base(6));
    /// ```
    #[must_use]
    pub fn holds_base(&self, pos: usize) -> bool {
        let prev = match pos.checked_sub(1) {
            Some(p) => self.cumulative_counts.get(p).copied().unwrap_or(0),
            None => 0,
        };
        self.cumulative_counts
            .get(pos)
            .is_some_and(|&curr| curr > prev)
    }

    /// Position of the first occurrence of the base, which anchors the deltas.
    /// `None` if the base never occurs.
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, DeltaListEncoder};
    /// assert_eq!(DeltaListEncoder::new(b"TTTTTATTTA", AllowedAGCTN::A).anchor(), Some(5));
    /// assert_eq!(DeltaListEncoder::new(b"TTTT", AllowedAGCTN::A).anchor(), None);
    /// ```
    #[must_use]
    pub fn anchor(&self) -> Option<usize> {
        self.cumulative_counts.iter().position(|&c| c > 0)
    }

    fn tally_at(&self, pos: usize) -> Result<u32, Error> {
        self.cumulative_counts
            .get(pos)
            .copied()
            .ok_or_else(|| {
                Error::InvalidModCoords(format!(
                    "position {pos} beyond sequence of length {}",
                    self.seq_len()
                ))
            })
    }

    /// Consecutive differences of the tallies at `positions`, minus one.
    /// The first entry of `positions` only serves as the starting point,
    /// so `n` positions give `n - 1` deltas.
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, DeltaListEncoder};
    /// let enc = DeltaListEncoder::new(b"TTTTTATTTA", AllowedAGCTN::A);
    /// assert_eq!(enc.consecutive_deltas(&[5, 9])?.to_string(), "0");
    /// assert_eq!(enc.consecutive_deltas(&[5])?.to_string(), "");
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// A position beyond the sequence, or two positions whose tallies do
    /// not increase i.e. a position that does not hold the base.
    pub fn consecutive_deltas(&self, positions: &[usize]) -> Result<DeltaList, Error> {
        let tallies = positions
            .iter()
            .map(|&p| self.tally_at(p))
            .collect::<Result<Vec<u32>, Error>>()?;
        Self::tally_deltas(&tallies)
    }

    fn tally_deltas(tallies: &[u32]) -> Result<DeltaList, Error> {
        tallies
            .windows(2)
            .map(|w| {
                w[1].checked_sub(w[0])
                    .and_then(|d| d.checked_sub(1))
                    .ok_or(Error::Arithmetic)
            })
            .collect::<Result<Vec<u32>, Error>>()
            .map(DeltaList)
    }

    /// Encodes modified positions into MM deltas.
    ///
    /// The anchor (first occurrence of the base) is put in front of the
    /// positions. It stands for the occurrences strictly before it, which is
    /// always zero, so the first delta counts occurrences skipped from the
    /// start of the sequence. One delta is produced per position, and a
    /// position equal to the anchor gets a delta of zero.
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, AscendingPositions, DeltaListEncoder};
    /// let enc = DeltaListEncoder::new(b"AACAAT", AllowedAGCTN::A);
    /// let deltas = enc.encode(&AscendingPositions::new(vec![0, 4])?)?;
    /// assert_eq!(deltas.to_string(), "0,2");
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// The base never occurs, a position is beyond the sequence,
    /// or a position does not hold the base.
    pub fn encode(&self, positions: &AscendingPositions) -> Result<DeltaList, Error> {
        let anchor = self.anchor().ok_or_else(|| {
            Error::InvalidModCoords(format!("no {} to anchor deltas", self.base))
        })?;
        let anchor_tally = self.tally_at(anchor)?.saturating_sub(1);
        let tallies = std::iter::once(Ok(anchor_tally))
            .chain(positions.get().iter().map(|&p| self.tally_at(p)))
            .collect::<Result<Vec<u32>, Error>>()?;
        let deltas = Self::tally_deltas(&tallies)?;
        debug_assert_eq!(deltas.len(), positions.len());
        Ok(deltas)
    }

    /// Decodes MM deltas back into positions on the forward sequence.
    ///
    /// ```
    /// use r2rmod_core::{AllowedAGCTN, DeltaListEncoder};
    /// let enc = DeltaListEncoder::new(b"AACAAT", AllowedAGCTN::A);
    /// assert_eq!(enc.decode(&[0, 2])?.get(), &[0, 4]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// The deltas skip past the last occurrence of the base.
    pub fn decode(&self, deltas: &[u32]) -> Result<AscendingPositions, Error> {
        let mut tally = 0u32;
        let mut positions = Vec::with_capacity(deltas.len());
        for d in deltas {
            tally = tally
                .checked_add(*d)
                .and_then(|t| t.checked_add(1))
                .ok_or(Error::Arithmetic)?;
            let pos = self.cumulative_counts.partition_point(|&c| c < tally);
            if pos >= self.seq_len() {
                return Err(Error::InvalidModCoords(format!(
                    "MM deltas run past the last {} of a sequence of length {}",
                    self.base,
                    self.seq_len()
                )));
            }
            positions.push(pos);
        }
        AscendingPositions::new(positions)
    }
}
