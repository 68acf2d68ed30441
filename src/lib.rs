//! # r2rmod
//!
//! Base modification calls (MM/ML tags) are usually made on raw reads.
//! When reads are turned into derived reads (e.g. a consensus, or a
//! corrected read) and those are aligned to a reference, the calls are
//! left behind. This crate carries them across:
//!
//! 1. index the calls of every raw read ([`ModIndexBuilder`]),
//! 2. project them through the raw-read to derived-read alignment
//!    ([`AlignmentPairSet`]),
//! 3. re-encode them as MM deltas on the derived read ([`DeltaListEncoder`]),
//! 4. assemble the MM/ML tags ([`ModTag`], [`MmMlTags`]) and attach them to
//!    the reference-aligned record ([`ModTransfer`]).
//!
//! The command line tool in `main.rs` runs all of this through
//! [`commands::run`].

// Declare the modules.
pub mod aligned_pairs;
pub mod commands;
pub mod delta_encoder;
pub mod error;
pub mod file_utils;
pub mod mm_ml_parser;
pub mod mod_index;
pub mod mod_tag;
pub mod progress;
pub mod read_utils;
pub mod transfer;
pub mod utils;

// Re-exports
pub use aligned_pairs::{AlignmentPairSet, ProjectedMod, Projection};
pub use commands::{Cli, CliBuilder};
pub use delta_encoder::{DeltaList, DeltaListEncoder};
pub use error::Error;
pub use mm_ml_parser::{parse_mm_ml, parse_mm_ml_str};
pub use mod_index::{IndexStats, ModCall, ModCalls, ModIndex, ModIndexBuilder, ReadMods};
pub use mod_tag::{MmMlTags, ModTag};
pub use transfer::{ModTransfer, SkipReason, TransferOutcome, TransferSummary, select_secondary};
pub use utils::*;
