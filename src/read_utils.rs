//! # ReadUtils
//!
//! Helpers that pull what we need out of a rust htslib BAM record:
//! its read id, its forward sequence, and whether it is clipped.

use bio::alphabets::dna::revcomp;
use rust_htslib::bam::record::Record;

use crate::Error;

/// Converts a sequence to uppercase, leaving other characters alone.
///
/// ```
/// use r2rmod_core::read_utils::convert_seq_uppercase;
/// assert_eq!(convert_seq_uppercase(b"acgTn".to_vec()), b"ACGTN".to_vec());
/// ```
#[must_use]
pub fn convert_seq_uppercase(mut seq: Vec<u8>) -> Vec<u8> {
    seq.make_ascii_uppercase();
    seq
}

/// Read id (query name) of the record.
///
/// # Errors
/// `InvalidReadID` if the name is not valid UTF-8 or is empty.
pub fn read_id(record: &Record) -> Result<String, Error> {
    match str::from_utf8(record.qname()) {
        Ok("") | Err(_) => Err(Error::InvalidReadID),
        Ok(v) => Ok(v.to_string()),
    }
}

/// The sequence in the orientation it was sequenced in, uppercased.
/// Reverse-strand records store the reverse complement, so we undo that.
/// MM tag coordinates are always relative to this sequence.
///
/// ```
/// use r2rmod_core::read_utils::forward_sequence;
/// use rust_htslib::bam::record::Record;
///
/// let mut record = Record::new();
/// record.set(b"read1", None, b"AACG", &[30; 4]);
/// assert_eq!(forward_sequence(&record), b"AACG".to_vec());
/// record.set_reverse();
/// assert_eq!(forward_sequence(&record), b"CGTT".to_vec());
/// ```
#[must_use]
pub fn forward_sequence(record: &Record) -> Vec<u8> {
    let seq = convert_seq_uppercase(record.seq().as_bytes());
    if record.is_reverse() {
        revcomp(seq)
    } else {
        seq
    }
}

/// Number of hard clipped bases before the first stored base,
/// in the orientation of the record as stored.
#[must_use]
pub fn leading_hard_clips(record: &Record) -> usize {
    usize::try_from(record.cigar().leading_hardclips()).unwrap_or(0)
}

/// Whether the record lacks some of its sequence due to hard clips
#[must_use]
pub fn is_hard_clipped(record: &Record) -> bool {
    let cigar = record.cigar();
    cigar.leading_hardclips() > 0 || cigar.trailing_hardclips() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::{Cigar, CigarString};

    #[test]
    fn read_id_works() {
        let mut record = Record::new();
        record.set(b"some_read", None, b"A", &[30]);
        assert_eq!(read_id(&record).expect("no error"), "some_read");
    }

    #[test]
    #[should_panic(expected = "InvalidReadID")]
    fn read_id_invalid_utf8_panics() {
        let mut record = Record::new();
        record.set(&[0xff, 0xfe], None, b"A", &[30]);
        let _ = read_id(&record).unwrap();
    }

    #[test]
    fn forward_sequence_lowercase_reverse() {
        let mut record = Record::new();
        record.set(b"r", None, b"acgtt", &[30; 5]);
        record.set_reverse();
        assert_eq!(forward_sequence(&record), b"AACGT".to_vec());
    }

    #[test]
    fn hard_clips_detected() {
        let mut record = Record::new();
        let cigar = CigarString(vec![Cigar::HardClip(3), Cigar::Match(4), Cigar::SoftClip(1)]);
        record.set(b"r", Some(&cigar), b"ACGTA", &[30; 5]);
        assert!(is_hard_clipped(&record));
        assert_eq!(leading_hard_clips(&record), 3);

        let cigar = CigarString(vec![Cigar::SoftClip(2), Cigar::Match(3)]);
        record.set(b"r", Some(&cigar), b"ACGTA", &[30; 5]);
        assert!(!is_hard_clipped(&record));
        assert_eq!(leading_hard_clips(&record), 0);
    }
}
