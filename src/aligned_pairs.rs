//! # Alignment pairs
//!
//! The read-to-read alignment gives, for every matched base, a position on
//! the read carrying the modification calls (the source) and a position on
//! the derived read (the target). Calls are moved across by looking their
//! positions up among the sources; calls on inserted, deleted or clipped
//! bases have no partner and are dropped.

use crate::mod_index::ModCalls;
use crate::read_utils::leading_hard_clips;
use crate::{AscendingPositions, Error, check_strictly_ascending};
use rust_htslib::bam::ext::BamRecordExtensions;
use rust_htslib::bam::record::Record;

/// A call moved onto the target coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedMod {
    /// position on the target sequence
    pub target: usize,
    /// probability byte, carried over unchanged
    pub qual: u8,
}

/// Calls moved onto the target coordinate system,
/// in ascending order of source and hence of target position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection(Vec<ProjectedMod>);

impl Projection {
    /// Projected calls
    #[must_use]
    pub fn get(&self) -> &[ProjectedMod] {
        &self.0
    }
    /// Number of projected calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Whether nothing was projected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Keeps only calls whose target satisfies the predicate
    #[must_use]
    pub fn retain_targets<F: Fn(usize) -> bool>(mut self, keep: F) -> Self {
        self.0.retain(|m| keep(m.target));
        self
    }
    /// Splits into target positions and qualities.
    ///
    /// # Errors
    /// Not expected, as targets are ascending by construction.
    pub fn into_parts(self) -> Result<(AscendingPositions, Vec<u8>), Error> {
        let (targets, quals): (Vec<usize>, Vec<u8>) =
            self.0.into_iter().map(|m| (m.target, m.qual)).unzip();
        Ok((AscendingPositions::new(targets)?, quals))
    }
}

/// Match-only (source, target) pairs of one alignment, strictly ascending
/// in both columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentPairSet {
    pairs: Vec<(usize, usize)>,
}

impl AlignmentPairSet {
    /// Builds a pair set.
    ///
    /// ```
    /// use r2rmod_core::AlignmentPairSet;
    /// assert!(AlignmentPairSet::new(vec![(0, 3), (1, 4), (5, 6)]).is_ok());
    /// assert!(AlignmentPairSet::new(vec![(0, 3), (1, 2)]).is_err());
    /// ```
    ///
    /// # Errors
    /// `InvalidCoordinateOrdering` if either column is not strictly ascending.
    pub fn new(pairs: Vec<(usize, usize)>) -> Result<Self, Error> {
        check_strictly_ascending(pairs.iter().map(|p| p.0), "alignment pair sources")?;
        check_strictly_ascending(pairs.iter().map(|p| p.1), "alignment pair targets")?;
        Ok(AlignmentPairSet { pairs })
    }

    /// Pairs of a read-to-read record: query position (counting leading hard
    /// clips, so that it indexes the full read) and reference position.
    ///
    /// # Errors
    /// `InvalidCoordinateOrdering` on a malformed alignment, or a negative
    /// coordinate.
    pub fn try_from_record(record: &Record) -> Result<Self, Error> {
        let offset = leading_hard_clips(record);
        let pairs = record
            .aligned_pairs()
            .map(|[qpos, rpos]| -> Result<(usize, usize), Error> {
                let source = usize::try_from(qpos)?
                    .checked_add(offset)
                    .ok_or(Error::Arithmetic)?;
                Ok((source, usize::try_from(rpos)?))
            })
            .collect::<Result<Vec<(usize, usize)>, Error>>()?;
        AlignmentPairSet::new(pairs)
    }

    /// The pairs
    #[must_use]
    pub fn get(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Moves calls onto target coordinates in one merge pass over the pairs
    /// and the calls, both sorted by source position. Each call whose position
    /// is a pair's source contributes that pair's target with its own quality.
    #[must_use]
    pub fn project(&self, calls: &ModCalls) -> Projection {
        let mut pairs = self.pairs.iter().peekable();
        let mut projected = Vec::new();
        for call in calls.iter() {
            while let Some(&&(source, _)) = pairs.peek()
                && source < call.position
            {
                pairs.next();
            }
            match pairs.peek() {
                Some(&&(source, target)) if source == call.position => {
                    projected.push(ProjectedMod {
                        target,
                        qual: call.qual,
                    });
                }
                Some(_) => {}
                None => break,
            }
        }
        Projection(projected)
    }

    /// Same as [`AlignmentPairSet::project`] but on separate position and
    /// quality lists, returning separate target and quality lists.
    ///
    /// ```
    /// use r2rmod_core::{AlignmentPairSet, AscendingPositions};
    /// let pairs = AlignmentPairSet::new(vec![(2, 0), (3, 1), (5, 2), (6, 3)])?;
    /// let (targets, quals) =
    ///     pairs.project_positions(AscendingPositions::new(vec![1, 3, 6])?, vec![7, 8, 9])?;
    /// assert_eq!(targets, vec![1, 3]);
    /// assert_eq!(quals, vec![8, 9]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// `PositionQualityMismatch` if positions and qualities differ in length.
    pub fn project_positions(
        &self,
        positions: AscendingPositions,
        quals: Vec<u8>,
    ) -> Result<(Vec<usize>, Vec<u8>), Error> {
        let calls = ModCalls::from_positions(positions, quals)?;
        let (targets, quals) = self.project(&calls).into_parts()?;
        Ok((targets.into(), quals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::{Cigar, CigarString};

    fn calls(positions: Vec<usize>, quals: Vec<u8>) -> ModCalls {
        ModCalls::from_positions(AscendingPositions::new(positions).expect("no error"), quals)
            .expect("no error")
    }

    #[test]
    fn identity_pairs_keep_everything() {
        let pairs = AlignmentPairSet::new((0..6).map(|i| (i, i)).collect()).expect("no error");
        let projection = pairs.project(&calls(vec![0, 4], vec![10, 200]));
        assert_eq!(
            projection.get(),
            &[
                ProjectedMod { target: 0, qual: 10 },
                ProjectedMod { target: 4, qual: 200 }
            ]
        );
    }

    #[test]
    fn unmatched_calls_are_dropped() {
        // source 2 is an insertion, source 5 lies past the alignment
        let pairs = AlignmentPairSet::new(vec![(0, 10), (1, 11), (3, 12), (4, 14)])
            .expect("no error");
        let projection = pairs.project(&calls(vec![1, 2, 4, 5], vec![1, 2, 3, 4]));
        let (targets, quals) = projection.into_parts().expect("no error");
        assert_eq!(targets.get(), &[11, 14]);
        assert_eq!(quals, vec![1, 3]);
    }

    #[test]
    fn disjoint_and_empty_inputs_project_nothing() {
        let pairs = AlignmentPairSet::new(vec![(10, 0), (11, 1)]).expect("no error");
        assert!(pairs.project(&calls(vec![0, 5, 12], vec![1, 1, 1])).is_empty());
        assert!(pairs.project(&calls(vec![], vec![])).is_empty());
        let empty = AlignmentPairSet::new(vec![]).expect("no error");
        assert!(empty.project(&calls(vec![3], vec![1])).is_empty());
    }

    #[test]
    fn projection_is_subset_of_pair_targets() {
        let pair_list: Vec<(usize, usize)> = (0..50).map(|i| (2 * i, 3 * i + 1)).collect();
        let pairs = AlignmentPairSet::new(pair_list.clone()).expect("no error");
        let positions: Vec<usize> = (0..100).step_by(3).collect();
        let quals: Vec<u8> = positions.iter().map(|&p| u8::try_from(p).expect("small")).collect();
        let projection = pairs.project(&calls(positions, quals));
        for m in projection.get() {
            let (source, _) = pair_list
                .iter()
                .find(|(_, t)| *t == m.target)
                .expect("target comes from a pair");
            // quality travels with its own source position
            assert_eq!(usize::from(m.qual), *source);
        }
        // sources divisible by 6 are both multiples of 2 and 3
        assert_eq!(projection.len(), (0..100).step_by(6).count());
    }

    #[test]
    #[should_panic(expected = "InvalidCoordinateOrdering")]
    fn unsorted_sources_panic() {
        let _ = AlignmentPairSet::new(vec![(3, 0), (2, 1)]).unwrap();
    }

    #[test]
    #[should_panic(expected = "PositionQualityMismatch")]
    fn mismatched_lists_panic() {
        let pairs = AlignmentPairSet::new(vec![(0, 0)]).expect("no error");
        let _ = pairs
            .project_positions(AscendingPositions::new(vec![0]).expect("no error"), vec![])
            .unwrap();
    }

    #[test]
    fn pairs_from_record_skip_soft_clips_and_indels() {
        let mut record = Record::new();
        let cigar = CigarString(vec![
            Cigar::SoftClip(2),
            Cigar::Match(2),
            Cigar::Ins(1),
            Cigar::Match(1),
            Cigar::Del(1),
            Cigar::Match(1),
        ]);
        record.set(b"raw1", Some(&cigar), b"TTAACAA", &[30; 7]);
        record.set_pos(0);
        let pairs = AlignmentPairSet::try_from_record(&record).expect("no error");
        assert_eq!(pairs.get(), &[(2, 0), (3, 1), (5, 2), (6, 4)]);
    }

    #[test]
    fn pairs_from_record_offset_by_hard_clips() {
        let mut record = Record::new();
        let cigar = CigarString(vec![Cigar::HardClip(3), Cigar::Match(3)]);
        record.set(b"raw1", Some(&cigar), b"ACG", &[30; 3]);
        record.set_pos(10);
        let pairs = AlignmentPairSet::try_from_record(&record).expect("no error");
        assert_eq!(pairs.get(), &[(3, 10), (4, 11), (5, 12)]);
    }
}
