//! # MM/ML tag assembly
//!
//! Turns encoded deltas and qualities into MM and ML tag values, and puts
//! them on a record.

use crate::delta_encoder::DeltaList;
use crate::{Error, ModType};
use rust_htslib::bam::record::{Aux, AuxArray, Record};
use std::fmt;

/// One MM entry with its ML values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModTag {
    mod_type: ModType,
    deltas: DeltaList,
    quals: Vec<u8>,
}

impl ModTag {
    /// Combines a modification type, its deltas and their qualities.
    ///
    /// ```
    /// use r2rmod_core::{DeltaList, ModTag, ModType};
    /// use std::str::FromStr;
    ///
    /// let tag = ModTag::assemble(ModType::from_str("A+a")?, DeltaList::from(vec![12, 0, 5]), vec![1, 2, 3])?;
    /// assert_eq!(tag.header_value(), "A+a,12,0,5");
    /// assert_eq!(tag.quals(), &[1, 2, 3]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// `PositionQualityMismatch` if there is not one quality per delta.
    pub fn assemble(mod_type: ModType, deltas: DeltaList, quals: Vec<u8>) -> Result<Self, Error> {
        if deltas.len() != quals.len() {
            return Err(Error::PositionQualityMismatch {
                positions: deltas.len(),
                qualities: quals.len(),
            });
        }
        Ok(ModTag {
            mod_type,
            deltas,
            quals,
        })
    }

    /// Modification type heading the entry
    #[must_use]
    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }

    /// The MM entry without its terminator e.g. `A+a,12,0,5`
    #[must_use]
    pub fn header_value(&self) -> String {
        self.to_string()
    }

    /// ML values of the entry
    #[must_use]
    pub fn quals(&self) -> &[u8] {
        &self.quals
    }
}

impl fmt::Display for ModTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mod_type)?;
        if !self.deltas.is_empty() {
            write!(f, ",{}", self.deltas)?;
        }
        Ok(())
    }
}

/// MM and ML values of a record, built up one entry at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MmMlTags {
    mm: String,
    ml: Vec<u8>,
}

impl MmMlTags {
    /// Empty tags
    #[must_use]
    pub fn new() -> Self {
        MmMlTags::default()
    }

    /// Appends an entry: its header and a `;` to MM, its qualities to ML.
    ///
    /// ```
    /// use r2rmod_core::{DeltaList, ModTag, ModType, MmMlTags};
    /// use std::str::FromStr;
    ///
    /// let mut tags = MmMlTags::new();
    /// tags.push(ModTag::assemble(ModType::from_str("A+a")?, DeltaList::from(vec![0, 2]), vec![10, 200])?);
    /// tags.push(ModTag::assemble(ModType::from_str("C+m")?, DeltaList::from(vec![1]), vec![30])?);
    /// assert_eq!(tags.mm(), "A+a,0,2;C+m,1;");
    /// assert_eq!(tags.ml(), &[10, 200, 30]);
    /// # Ok::<(), r2rmod_core::Error>(())
    /// ```
    pub fn push(&mut self, tag: ModTag) {
        self.mm.push_str(&tag.header_value());
        self.mm.push(';');
        self.ml.extend_from_slice(tag.quals());
    }

    /// MM value
    #[must_use]
    pub fn mm(&self) -> &str {
        &self.mm
    }

    /// ML value
    #[must_use]
    pub fn ml(&self) -> &[u8] {
        &self.ml
    }

    /// Whether no entry has been pushed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mm.is_empty()
    }

    /// Writes MM and ML onto the record, replacing any MM/ML tags
    /// (or legacy Mm/Ml tags) already there.
    ///
    /// # Errors
    /// If htslib cannot add the tags.
    pub fn attach(&self, record: &mut Record) -> Result<(), Error> {
        for tag in [b"MM", b"ML", b"Mm", b"Ml"] {
            if record.aux(tag).is_ok() {
                record.remove_aux(tag)?;
            }
        }
        record.push_aux(b"MM", Aux::String(&self.mm))?;
        record.push_aux(b"ML", Aux::ArrayU8(AuxArray::from(&self.ml)))?;
        Ok(())
    }
}

impl FromIterator<ModTag> for MmMlTags {
    fn from_iter<T: IntoIterator<Item = ModTag>>(iter: T) -> Self {
        let mut tags = MmMlTags::new();
        for tag in iter {
            tags.push(tag);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn tag(mod_type: &str, deltas: Vec<u32>, quals: Vec<u8>) -> ModTag {
        ModTag::assemble(
            ModType::from_str(mod_type).expect("no error"),
            DeltaList::from(deltas),
            quals,
        )
        .expect("no error")
    }

    #[test]
    fn header_threads_through_type() {
        assert_eq!(tag("T-472232", vec![3], vec![1]).header_value(), "T-472232,3");
        assert_eq!(tag("C+m", vec![], vec![]).header_value(), "C+m");
    }

    #[test]
    #[should_panic(expected = "PositionQualityMismatch")]
    fn mismatched_lengths_panic() {
        let _ = ModTag::assemble(
            ModType::from_str("A+a").expect("no error"),
            DeltaList::from(vec![0, 2]),
            vec![10],
        )
        .unwrap();
    }

    #[test]
    fn attach_replaces_existing_tags() {
        let mut record = Record::new();
        record.set(b"read1", None, b"AACAAT", &[30; 6]);
        record.push_aux(b"MM", Aux::String("C+m,0;")).expect("no error");
        let old_ml = vec![1u8];
        record
            .push_aux(b"ML", Aux::ArrayU8(AuxArray::from(&old_ml)))
            .expect("no error");
        record.push_aux(b"Mm", Aux::String("C+m,0;")).expect("no error");

        let tags: MmMlTags = [tag("A+a", vec![0, 2], vec![10, 200])].into_iter().collect();
        tags.attach(&mut record).expect("no error");

        match record.aux(b"MM").expect("present") {
            Aux::String(mm) => assert_eq!(mm, "A+a,0,2;"),
            _ => panic!("MM is not a string"),
        }
        match record.aux(b"ML").expect("present") {
            Aux::ArrayU8(arr) => assert_eq!(arr.iter().collect::<Vec<u8>>(), vec![10, 200]),
            _ => panic!("ML is not a u8 array"),
        }
        assert!(record.aux(b"Mm").is_err());
    }
}
