//! # Transfer
//!
//! Moves modification calls from the reads they were called on onto
//! reference-aligned records of the derived reads. Per output record:
//! find the read-to-read alignment of the derived read, look up the calls
//! of the aligned read, project them through the alignment, re-encode them
//! on the output record's forward sequence, and attach the tags.
//!
//! Problems confined to one record become a [`SkipReason`]; the record is
//! then written without new tags. Everything else ends the run.

use crate::aligned_pairs::AlignmentPairSet;
use crate::delta_encoder::DeltaListEncoder;
use crate::mod_index::ModIndex;
use crate::mod_tag::{MmMlTags, ModTag};
use crate::read_utils::{forward_sequence, is_hard_clipped, read_id};
use crate::{Error, ModType, ReadState};
use rust_htslib::bam::{self, FetchDefinition, Read, record::Record};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a record was written without modification tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// no read-to-read alignment for the read
    MissingReadEntry,
    /// aligned read not indexed, or no calls of the requested types
    MissingModificationType,
    /// no call landed on an aligned base
    EmptyProjection,
    /// the requested base does not occur in the sequence
    MalformedSequence,
    /// alignment pairs or positions out of order
    InvalidCoordinateOrdering,
    /// read-to-read records exist but none is usable
    UnusableSecondary,
    /// output record is hard clipped
    HardClippedPrimary,
    /// derived read length differs between the inputs
    LengthMismatch,
    /// read name is empty or not UTF-8
    InvalidReadId,
}

impl SkipReason {
    /// The skip reason for a per-record error, `None` for errors that
    /// should end the run.
    #[must_use]
    pub fn classify(error: &Error) -> Option<SkipReason> {
        match error {
            Error::MissingReadEntry(_) => Some(SkipReason::MissingReadEntry),
            Error::MissingModificationType { .. } => Some(SkipReason::MissingModificationType),
            Error::EmptyProjection { .. } => Some(SkipReason::EmptyProjection),
            Error::MalformedSequence { .. } => Some(SkipReason::MalformedSequence),
            Error::InvalidCoordinateOrdering(_) => Some(SkipReason::InvalidCoordinateOrdering),
            Error::UnusableSecondary(_) => Some(SkipReason::UnusableSecondary),
            Error::HardClippedPrimary(_) => Some(SkipReason::HardClippedPrimary),
            Error::LengthMismatch { .. } => Some(SkipReason::LengthMismatch),
            Error::InvalidReadID => Some(SkipReason::InvalidReadId),
            _ => None,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            SkipReason::MissingReadEntry => "missing_read_entry",
            SkipReason::MissingModificationType => "missing_modification_type",
            SkipReason::EmptyProjection => "empty_projection",
            SkipReason::MalformedSequence => "malformed_sequence",
            SkipReason::InvalidCoordinateOrdering => "invalid_coordinate_ordering",
            SkipReason::UnusableSecondary => "unusable_secondary",
            SkipReason::HardClippedPrimary => "hard_clipped_primary",
            SkipReason::LengthMismatch => "length_mismatch",
            SkipReason::InvalidReadId => "invalid_read_id",
        };
        write!(f, "{printable}")
    }
}

/// What happened to one output record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// new MM/ML tags were attached
    Tagged {
        /// MM entries written
        entries: usize,
        /// modification calls written, summed over entries
        calls: usize,
    },
    /// written unchanged
    Skipped(SkipReason),
}

/// Run-level counts, written out as JSON on request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// reads in the modification index
    pub indexed_reads: usize,
    /// modification records skipped for bad flags, names or tags
    pub unparseable_mod_records: usize,
    /// output records processed
    pub records: usize,
    /// output records that received tags
    pub tagged: usize,
    /// modification calls written
    pub calls_written: usize,
    /// output records written unchanged, by reason
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl TransferSummary {
    /// Counts one outcome
    pub fn add(&mut self, outcome: TransferOutcome) {
        self.records += 1;
        match outcome {
            TransferOutcome::Tagged { calls, .. } => {
                self.tagged += 1;
                self.calls_written += calls;
            }
            TransferOutcome::Skipped(reason) => {
                *self.skipped.entry(reason).or_insert(0) += 1;
            }
        }
    }
}

/// Picks the read-to-read record to project through. Only primary, mapped,
/// forward records qualify; among them, the first whose read is indexed wins,
/// falling back to the first that qualifies.
///
/// # Errors
/// `MissingReadEntry` if there are no records, `UnusableSecondary` if none
/// qualifies.
pub fn select_secondary<'a>(
    derived_id: &str,
    records: &'a [Record],
    index: &ModIndex,
) -> Result<&'a Record, Error> {
    if records.is_empty() {
        return Err(Error::MissingReadEntry(derived_id.to_owned()));
    }
    let usable: Vec<&Record> = records
        .iter()
        .filter(|r| matches!(ReadState::try_from(*r), Ok(ReadState::PrimaryFwd)))
        .collect();
    if usable.len() < records.len() {
        log::debug!(
            "{derived_id}: {} of {} read-to-read records not primary forward alignments",
            records.len() - usable.len(),
            records.len()
        );
    }
    let chosen = usable
        .iter()
        .find(|r| read_id(r).is_ok_and(|id| index.contains(&id)))
        .or_else(|| usable.first())
        .copied()
        .ok_or_else(|| Error::UnusableSecondary(derived_id.to_owned()))?;
    if usable.len() > 1 {
        log::debug!(
            "{derived_id}: {} usable read-to-read records, using the first indexed one",
            usable.len()
        );
    }
    Ok(chosen)
}

/// Carries calls from the modification index onto output records
#[derive(Debug, Clone)]
pub struct ModTransfer<'a> {
    index: &'a ModIndex,
    mod_types: Vec<ModType>,
}

impl<'a> ModTransfer<'a> {
    /// Transfers the given modification types, in the order given
    #[must_use]
    pub fn new(index: &'a ModIndex, mod_types: Vec<ModType>) -> Self {
        ModTransfer { index, mod_types }
    }

    /// One MM entry: calls of `mod_type` on `source_id`, projected through
    /// `pairs` and encoded on `forward_seq`.
    fn tag_for(
        &self,
        derived_id: &str,
        source_id: &str,
        mod_type: ModType,
        forward_seq: &[u8],
        pairs: &AlignmentPairSet,
    ) -> Result<ModTag, Error> {
        let calls = self.index.calls(source_id, &mod_type)?;
        let encoder = DeltaListEncoder::new(forward_seq, mod_type.base);
        if encoder.anchor().is_none() {
            return Err(Error::MalformedSequence {
                read_id: derived_id.to_owned(),
                base: char::from(mod_type.base),
            });
        }
        let projection = pairs.project(calls);
        let projected = projection.len();
        let projection = projection.retain_targets(|t| encoder.holds_base(t));
        if projection.len() < projected {
            log::debug!(
                "{derived_id}: {} projected {mod_type} calls not on a {} of the sequence, dropped",
                projected - projection.len(),
                mod_type.base
            );
        }
        if projection.is_empty() {
            return Err(Error::EmptyProjection {
                read_id: derived_id.to_owned(),
                mod_type: mod_type.to_string(),
            });
        }
        let (targets, quals) = projection.into_parts()?;
        let deltas = encoder.encode(&targets)?;
        ModTag::assemble(mod_type, deltas, quals)
    }

    /// MM/ML tags for a derived read, from the calls of the source read it
    /// was aligned to. A type that fails on its own is left out; if every
    /// type fails, the error of the first one is returned.
    ///
    /// # Errors
    /// Per-record errors as described above, and any run-ending error
    /// as soon as it occurs.
    pub fn tags_for(
        &self,
        derived_id: &str,
        source_id: &str,
        forward_seq: &[u8],
        pairs: &AlignmentPairSet,
    ) -> Result<MmMlTags, Error> {
        let mut tags = MmMlTags::new();
        let mut first_error: Option<Error> = None;
        for mod_type in &self.mod_types {
            match self.tag_for(derived_id, source_id, *mod_type, forward_seq, pairs) {
                Ok(tag) => tags.push(tag),
                Err(e) if SkipReason::classify(&e).is_some() => {
                    log::trace!("{derived_id}: no {mod_type} entry: {e}");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        match (tags.is_empty(), first_error) {
            (true, Some(e)) => Err(e),
            (true, None) => Err(Error::InvalidState(
                "no modification types to transfer".to_owned(),
            )),
            (false, _) => Ok(tags),
        }
    }

    /// Attempts to tag one output record, using the read-to-read alignments
    /// in `r2r` (indexed, contigs named after the derived reads).
    fn try_transfer(
        &self,
        record: &mut Record,
        r2r: &mut bam::IndexedReader,
    ) -> Result<TransferOutcome, Error> {
        let derived_id = read_id(record)?;
        if is_hard_clipped(record) {
            return Err(Error::HardClippedPrimary(derived_id));
        }
        let tid = r2r
            .header()
            .tid(derived_id.as_bytes())
            .ok_or_else(|| Error::MissingReadEntry(derived_id.clone()))?;
        let contig_len = r2r.header().target_len(tid).unwrap_or(0);
        let seq_len = u64::try_from(record.seq_len())?;
        if contig_len != seq_len {
            return Err(Error::LengthMismatch {
                read_id: derived_id,
                seq_len,
                contig_len,
            });
        }

        r2r.fetch(FetchDefinition::CompleteTid(i32::try_from(tid)?))?;
        let secondaries = r2r
            .records()
            .collect::<Result<Vec<Record>, rust_htslib::errors::Error>>()?;
        let secondary = select_secondary(&derived_id, &secondaries, self.index)?;
        let source_id = read_id(secondary)?;
        let pairs = AlignmentPairSet::try_from_record(secondary)?;

        let tags = self.tags_for(&derived_id, &source_id, &forward_sequence(record), &pairs)?;
        tags.attach(record)?;
        Ok(TransferOutcome::Tagged {
            entries: tags.mm().matches(';').count(),
            calls: tags.ml().len(),
        })
    }

    /// Tags one output record if possible. Per-record problems are logged
    /// and returned as a skip; the record is then left as it was.
    ///
    /// # Errors
    /// Run-ending errors e.g. failure to read the read-to-read BAM.
    pub fn transfer(
        &self,
        record: &mut Record,
        r2r: &mut bam::IndexedReader,
    ) -> Result<TransferOutcome, Error> {
        match self.try_transfer(record, r2r) {
            Ok(v) => Ok(v),
            Err(e) => match SkipReason::classify(&e) {
                Some(reason) => {
                    let id = String::from_utf8_lossy(record.qname());
                    if reason == SkipReason::MalformedSequence {
                        log::warn!("{id}: skipped, {e}");
                    } else {
                        log::debug!("{id}: skipped ({reason}), {e}");
                    }
                    Ok(TransferOutcome::Skipped(reason))
                }
                None => Err(e),
            },
        }
    }
}
