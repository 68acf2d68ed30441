//! # Modification index
//!
//! Holds the modification calls of every read in the modification source,
//! keyed by read id and then by modification type. Positions are on the
//! forward sequence of the read and are strictly ascending per type.
//!
//! The index is built once, up front, and then only read from.

use crate::mm_ml_parser::parse_mm_ml;
use crate::read_utils::read_id;
use crate::{AscendingPositions, Error, ModType, ReadState, check_strictly_ascending};
use rust_htslib::bam::{self, Read};
use std::collections::{BTreeMap, HashMap};

/// A single modification call: position on the forward read sequence,
/// and the ML probability byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModCall {
    /// 0-based position on the forward sequence
    pub position: usize,
    /// probability that the base is modified, scaled to 0-255
    pub qual: u8,
}

/// Calls of one modification type on one read, ascending by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModCalls(Vec<ModCall>);

impl ModCalls {
    /// Builds calls from calls already sorted by position.
    ///
    /// # Errors
    /// `InvalidCoordinateOrdering` if positions repeat or go backwards.
    pub fn new(calls: Vec<ModCall>) -> Result<Self, Error> {
        check_strictly_ascending(calls.iter().map(|c| c.position), "modification positions")?;
        Ok(ModCalls(calls))
    }

    /// Pairs ascending positions with their qualities.
    ///
    /// ```
    /// use r2rmod_core::{AscendingPositions, ModCalls};
    /// let calls = ModCalls::from_positions(AscendingPositions::new(vec![0, 4])?, vec![10, 200])?;
    /// assert_eq!(calls.positions(), vec![0, 4]);
    /// assert_eq!(calls.quals(), vec![10, 200]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// `PositionQualityMismatch` if the two lists differ in length.
    pub fn from_positions(positions: AscendingPositions, quals: Vec<u8>) -> Result<Self, Error> {
        if positions.len() != quals.len() {
            return Err(Error::PositionQualityMismatch {
                positions: positions.len(),
                qualities: quals.len(),
            });
        }
        Ok(ModCalls(
            Vec::<usize>::from(positions)
                .into_iter()
                .zip(quals)
                .map(|(position, qual)| ModCall { position, qual })
                .collect(),
        ))
    }

    /// Calls in ascending order of position
    pub fn iter(&self) -> impl Iterator<Item = &ModCall> {
        self.0.iter()
    }

    /// Positions of the calls
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        self.0.iter().map(|c| c.position).collect()
    }

    /// Qualities of the calls
    #[must_use]
    pub fn quals(&self) -> Vec<u8> {
        self.0.iter().map(|c| c.qual).collect()
    }

    /// Number of calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no calls
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All modification calls of one read, by type
pub type ReadMods = BTreeMap<ModType, ModCalls>;

/// Read id to modification calls
#[derive(Debug, Clone, Default)]
pub struct ModIndex(HashMap<String, ReadMods>);

impl ModIndex {
    /// Calls of all types for this read, if the read is indexed
    #[must_use]
    pub fn get(&self, read_id: &str) -> Option<&ReadMods> {
        self.0.get(read_id)
    }

    /// Whether the read id is in the index
    #[must_use]
    pub fn contains(&self, read_id: &str) -> bool {
        self.0.contains_key(read_id)
    }

    /// Calls of one type for one read.
    ///
    /// # Errors
    /// `MissingModificationType` if the read is not indexed or has no calls
    /// of this type.
    pub fn calls(&self, read_id: &str, mod_type: &ModType) -> Result<&ModCalls, Error> {
        self.0
            .get(read_id)
            .and_then(|mods| mods.get(mod_type))
            .ok_or_else(|| Error::MissingModificationType {
                read_id: read_id.to_owned(),
                mod_type: mod_type.to_string(),
            })
    }

    /// Number of reads in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index holds no reads
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ReadMods)> for ModIndex {
    fn from_iter<T: IntoIterator<Item = (String, ReadMods)>>(iter: T) -> Self {
        ModIndex(iter.into_iter().collect())
    }
}

/// Counts gathered while indexing a BAM file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// records seen in the input
    pub records: usize,
    /// secondary or supplementary records passed over
    pub non_primary: usize,
    /// records with contradictory flags, an invalid read id,
    /// or MM/ML tags that could not be parsed
    pub failed: usize,
}

/// Builds a [`ModIndex`], optionally bounded in the number of reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModIndexBuilder {
    max_reads: Option<usize>,
}

impl ModIndexBuilder {
    /// Unbounded builder
    #[must_use]
    pub fn new() -> Self {
        ModIndexBuilder::default()
    }

    /// Fails the build once more than `max_reads` distinct reads are seen
    #[must_use]
    pub fn max_reads(mut self, max_reads: usize) -> Self {
        self.max_reads = Some(max_reads);
        self
    }

    /// Builds the index from `(read id, calls)` entries.
    /// A read id seen twice keeps the later entry.
    ///
    /// ```
    /// use r2rmod_core::{ModIndexBuilder, ReadMods};
    /// let index = ModIndexBuilder::new().build([
    ///     Ok(("read1".to_string(), ReadMods::new())),
    ///     Ok(("read2".to_string(), ReadMods::new())),
    /// ])?;
    /// assert_eq!(index.len(), 2);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// The first error from the entries, or `IndexCapacityExceeded`.
    pub fn build<I>(&self, entries: I) -> Result<ModIndex, Error>
    where
        I: IntoIterator<Item = Result<(String, ReadMods), Error>>,
    {
        let mut map: HashMap<String, ReadMods> = HashMap::new();
        for entry in entries {
            let (read_id, mods) = entry?;
            if let Some(max) = self.max_reads
                && map.len() >= max
                && !map.contains_key(&read_id)
            {
                return Err(Error::IndexCapacityExceeded(max));
            }
            if map.insert(read_id.clone(), mods).is_some() {
                log::debug!("read {read_id} seen again in modification source; keeping later entry");
            }
        }
        Ok(ModIndex(map))
    }

    /// Builds the index from the primary records of a BAM file.
    /// Secondary and supplementary records are passed over, as are records
    /// with contradictory flags, invalid read ids or MM/ML tags that do not
    /// parse; all are counted and logged.
    /// Records without any MM tag are indexed with no calls.
    ///
    /// # Errors
    /// Problems reading the BAM file, or `IndexCapacityExceeded`.
    pub fn build_from_reader<R: Read>(&self, reader: &mut R) -> Result<(ModIndex, IndexStats), Error> {
        let mut stats = IndexStats::default();
        let entries = reader.records().filter_map(|r| {
            let record: bam::Record = match r {
                Ok(v) => v,
                Err(e) => return Some(Err(Error::from(e))),
            };
            stats.records += 1;
            match ReadState::try_from(&record) {
                Ok(state) if !state.is_primary() => {
                    stats.non_primary += 1;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!(
                        "skipping modification calls of read {}: {e}",
                        String::from_utf8_lossy(record.qname())
                    );
                    stats.failed += 1;
                    return None;
                }
            }
            let id = match read_id(&record) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("skipping modification calls of a record: {e}");
                    stats.failed += 1;
                    return None;
                }
            };
            match parse_mm_ml(&record) {
                Ok(mods) => Some(Ok((id, mods))),
                Err(e) => {
                    log::warn!("skipping modification calls of read {id}: {e}");
                    stats.failed += 1;
                    None
                }
            }
        });
        let index = self.build(entries)?;
        log::info!(
            "indexed {} reads from {} records ({} non-primary, {} failed)",
            index.len(),
            stats.records,
            stats.non_primary,
            stats.failed
        );
        Ok((index, stats))
    }
}
