//! # MM/ML parser
//!
//! Reads base modification calls off the MM and ML tags of a record.
//! MM holds one entry per base, strand and code group, e.g.
//! `C+hm?,1,0;A+a,3;`. ML holds one probability byte per call, in the
//! order the calls appear in MM. For a group of several codes such as
//! `C+hm`, the ML values alternate between the codes position by position.

use crate::delta_encoder::DeltaListEncoder;
use crate::mod_index::{ModCalls, ReadMods};
use crate::read_utils::forward_sequence;
use crate::{AllowedAGCTN, Error, ModChar, ModStrand, ModType};
use lazy_static::lazy_static;
use regex::Regex;
use rust_htslib::bam::record::{Aux, Record};
use std::str::FromStr;

lazy_static! {
    // one entry of MM:Z:([ACGTN][-+]([A-Za-z]+|[0-9]+)[.?]?(,[0-9]+)*;)*
    static ref MM_ENTRY_RE: Regex =
        Regex::new(r"^([ACGTN])([-+])([A-Za-z]+|[0-9]+)([.?]?)((?:,[0-9]+)*)$")
            .expect("valid regex");
}

/// Text of the MM tag, falling back to the legacy `Mm` spelling
fn mm_text(record: &Record) -> Option<&str> {
    [b"MM", b"Mm"].into_iter().find_map(|tag| match record.aux(tag) {
        Ok(Aux::String(s)) => Some(s),
        _ => None,
    })
}

/// Bytes of the ML tag, falling back to the legacy `Ml` spelling
fn ml_values(record: &Record) -> Vec<u8> {
    [b"ML", b"Ml"]
        .into_iter()
        .find_map(|tag| match record.aux(tag) {
            Ok(Aux::ArrayU8(arr)) => Some(arr.iter().collect()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parses the MM/ML tags of a record into calls grouped by modification type.
/// Positions are on the forward sequence of the read.
/// A record with no MM tag gives no calls.
///
/// # Errors
/// See [`parse_mm_ml_str`].
pub fn parse_mm_ml(record: &Record) -> Result<ReadMods, Error> {
    match mm_text(record) {
        Some(mm) => parse_mm_ml_str(mm, &ml_values(record), &forward_sequence(record)),
        None => {
            log::trace!("No MM tag found");
            Ok(ReadMods::new())
        }
    }
}

/// Parses MM text and ML bytes against the forward sequence they describe.
///
/// ```
/// use r2rmod_core::mm_ml_parser::parse_mm_ml_str;
/// use r2rmod_core::ModType;
/// use std::str::FromStr;
///
/// let mods = parse_mm_ml_str("A+a,0,2;", &[10, 200], b"AACAAT")?;
/// let calls = &mods[&ModType::from_str("A+a")?];
/// assert_eq!(calls.positions(), vec![0, 4]);
/// assert_eq!(calls.quals(), vec![10, 200]);
/// # Ok::<(), r2rmod_core::Error>(())
/// ```
///
/// If ML is shorter than the number of calls in MM, the missing
/// probabilities are taken to be zero and a warning is logged.
///
/// # Errors
/// `InvalidMMTag` for entries that do not parse or repeat a modification type,
/// `InvalidModCoords` for deltas that run past the end of the sequence.
pub fn parse_mm_ml_str(mm: &str, ml: &[u8], forward_seq: &[u8]) -> Result<ReadMods, Error> {
    let mut mods = ReadMods::new();
    let mut num_mods_seen: usize = 0;

    for entry in mm.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let cap = MM_ENTRY_RE
            .captures(entry)
            .ok_or_else(|| Error::InvalidMMTag(entry.to_owned()))?;
        let base = AllowedAGCTN::from_str(&cap[1])?;
        let strand = ModStrand::from_str(&cap[2])?;
        let codes = ModChar::parse_codes(&cap[3])?;
        let deltas = cap[5]
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::parse::<u32>)
            .collect::<Result<Vec<u32>, _>>()?;
        log::trace!("base: {base}, strand: {strand}, codes: {}, deltas: {deltas:?}", &cap[3]);

        let positions = DeltaListEncoder::new(forward_seq, base).decode(&deltas)?;

        let num_mods_cur_end = num_mods_seen
            .checked_add(positions.len().checked_mul(codes.len()).ok_or(Error::Arithmetic)?)
            .ok_or(Error::Arithmetic)?;
        let probabilities = if num_mods_cur_end > ml.len() {
            log::warn!(
                "ML tag is too short for the number of modifications found in the MM tag. \
                 Assuming an ML value of 0 after the first {} modifications.",
                ml.len()
            );
            let mut has = ml.get(num_mods_seen..).unwrap_or_default().to_vec();
            has.resize(num_mods_cur_end - num_mods_seen, 0);
            has
        } else {
            ml[num_mods_seen..num_mods_cur_end].to_vec()
        };
        num_mods_seen = num_mods_cur_end;

        for (code_idx, code) in codes.iter().enumerate() {
            let quals: Vec<u8> = probabilities
                .iter()
                .skip(code_idx)
                .step_by(codes.len())
                .copied()
                .collect();
            let mod_type = ModType::new(base, strand, *code);
            let calls = ModCalls::from_positions(positions.clone(), quals)?;
            if mods.insert(mod_type, calls).is_some() {
                return Err(Error::InvalidMMTag(format!("{mod_type} appears more than once")));
            }
        }
    }

    if ml.len() > num_mods_seen {
        log::warn!(
            "ML tag ({}) different number than MM tag ({}).",
            ml.len(),
            num_mods_seen
        );
    }
    Ok(mods)
}
