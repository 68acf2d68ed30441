//! # Error
//!
//! Covers all errors in our crate. These arise from reading modification
//! calls off BAM records, projecting them through read-to-read alignments,
//! and re-encoding them on reference-aligned records. Errors from other
//! packages are converted to this type so that error handling is uniform.
//!
//! Some variants describe a problem with a single record only (for example
//! a read with no read-to-read alignment). The transfer loop turns those into
//! a [`SkipReason`](crate::SkipReason) and carries on; everything else stops
//! the run.

use std::io;
use std::num::{ParseIntError, TryFromIntError};
use thiserror::Error;

/// Enum that covers errors in our crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No read-to-read alignment record exists for this read id.
    #[error("no read-to-read alignment found for read `{0}`")]
    MissingReadEntry(String),

    /// The read id is absent from the modification index, or it is present
    /// but carries no calls of the requested modification type.
    #[error("no `{mod_type}` modification calls for read `{read_id}`")]
    MissingModificationType {
        /// read id looked up in the modification index
        read_id: String,
        /// requested modification type e.g. A+a
        mod_type: String,
    },

    /// None of the modification calls fell on an aligned match position.
    #[error("no `{mod_type}` calls of read `{read_id}` could be projected")]
    EmptyProjection {
        /// read id of the record that received no projection
        read_id: String,
        /// requested modification type e.g. A+a
        mod_type: String,
    },

    /// The forward sequence does not contain the requested base at all,
    /// so there is no anchor for the delta encoding.
    #[error("sequence of read `{read_id}` does not contain base `{base}`")]
    MalformedSequence {
        /// read id of the offending record
        read_id: String,
        /// base that could not be found
        base: char,
    },

    /// Alignment pairs or modification positions are not strictly ascending.
    #[error("coordinates not in ascending order: {0}")]
    InvalidCoordinateOrdering(String),

    /// Read-to-read records exist for this read but none of them is a primary,
    /// mapped, forward-strand alignment.
    #[error("no usable read-to-read alignment for read `{0}`")]
    UnusableSecondary(String),

    /// The output record lacks part of its sequence (hard clips), so its
    /// forward sequence does not match the coordinates of the derived read.
    #[error("read `{0}` is hard clipped")]
    HardClippedPrimary(String),

    /// Length of the derived read in the read-to-read header differs
    /// from the sequence length of the output record.
    #[error("read `{read_id}` has length {seq_len} but read-to-read contig has length {contig_len}")]
    LengthMismatch {
        /// read id of the output record
        read_id: String,
        /// sequence length of the output record
        seq_len: u64,
        /// contig length in the read-to-read BAM header
        contig_len: u64,
    },

    /// Modification index already holds the configured maximum number of reads
    #[error("modification index capacity of {0} reads exceeded")]
    IndexCapacityExceeded(usize),

    /// Base is not one of A, C, G, T, N
    #[error("invalid base: `{0}`")]
    InvalidBase(String),

    /// Strand of modification is not + or -
    #[error("invalid modification strand: `{0}`")]
    InvalidModStrand(String),

    /// Modification type is invalid. Mod types are indicated in
    /// mod BAM files like so: ...C+m... where C is the base and
    /// m is the modification type, in this case methylation.
    #[error("invalid mod type: `{0}`")]
    InvalidModType(String),

    /// Modification type is empty
    #[error("empty mod type: `{0}`")]
    EmptyModType(String),

    /// The MM tag could not be parsed
    #[error("invalid MM tag: `{0}`")]
    InvalidMMTag(String),

    /// Modification coordinates are invalid
    #[error("invalid mod coordinates: `{0}`")]
    InvalidModCoords(String),

    /// Lengths of quality and position lists do not match
    #[error("{positions} positions but {qualities} qualities")]
    PositionQualityMismatch {
        /// number of positions
        positions: usize,
        /// number of qualities
        qualities: usize,
    },

    /// Read id of molecule is empty or not UTF-8
    #[error("invalid read id")]
    InvalidReadID,

    /// Some error from the rust htslib library we use to read BAM files
    #[error(
        "rust_htslib error: `{0}` \nIf piping in a samtools view command, please include header with -h in samtools. "
    )]
    RustHtslibError(#[from] rust_htslib::errors::Error),

    /// Error upon conversion from integer
    #[error("integer conversion error: `{0}`")]
    IntConversionError(#[from] TryFromIntError),

    /// Error writing JSON
    #[error("JSON error: `{0}`")]
    JsonError(#[from] serde_json::Error),

    /// Problem parsing integers
    #[error("integer parsing error: `{0}`")]
    IntParseError(#[from] ParseIntError),

    /// Generic Input-Output error
    #[error("input output error: `{0}`")]
    InputOutputError(#[from] io::Error),

    /// Generic error used when program hits an invalid state
    #[error("`{0}`")]
    InvalidState(String),

    /// Arithmetic error
    #[error("unanticipated arithmetic error e.g. overflow")]
    Arithmetic,
}
