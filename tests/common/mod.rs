//! Helpers that build small alignment files for the integration tests

use r2rmod_core::Error;
use rust_htslib::bam::{
    self,
    record::{Aux, AuxArray, Cigar, CigarString, Record},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fresh directory under the system temp dir
pub fn temp_dir() -> PathBuf {
    let path = env::temp_dir().join(format!("r2rmod_test_{}", Uuid::new_v4()));
    fs::create_dir_all(&path).expect("failed to create temp dir");
    path
}

/// Record aligned to contig `tid` at `pos`
pub fn mapped_record(
    qname: &str,
    cigar: Vec<Cigar>,
    seq: &[u8],
    tid: i32,
    pos: i64,
    flags: u16,
) -> Record {
    let mut record = Record::new();
    record.set(
        qname.as_bytes(),
        Some(&CigarString(cigar)),
        seq,
        &vec![30; seq.len()],
    );
    record.set_tid(tid);
    record.set_pos(pos);
    record.set_mtid(-1);
    record.set_mpos(-1);
    record.set_mapq(60);
    record.set_flags(flags);
    record
}

/// Unaligned record, as found in a basecaller's mod BAM
pub fn unmapped_record(qname: &str, seq: &[u8]) -> Record {
    let mut record = Record::new();
    record.set(qname.as_bytes(), None, seq, &vec![30; seq.len()]);
    record.set_tid(-1);
    record.set_pos(-1);
    record.set_mtid(-1);
    record.set_mpos(-1);
    record.set_flags(4);
    record
}

/// Adds MM and ML tags
pub fn with_mods(mut record: Record, mm: &str, ml: &[u8]) -> Record {
    record
        .push_aux(b"MM", Aux::String(mm))
        .expect("failed to add MM");
    let ml = ml.to_vec();
    record
        .push_aux(b"ML", Aux::ArrayU8(AuxArray::from(&ml)))
        .expect("failed to add ML");
    record
}

/// Writes records (already sorted) under a header with the given contigs,
/// indexing the file if asked to.
pub fn write_bam<M: AsRef<Path> + ?Sized>(
    output_path: &M,
    contigs: &[(&str, usize)],
    records: &[Record],
    index: bool,
) -> Result<(), Error> {
    let mut header = bam::Header::new();
    for (name, len) in contigs {
        let _: &mut _ = header.push_record(
            bam::header::HeaderRecord::new(b"SQ")
                .push_tag(b"SN", name)
                .push_tag(b"LN", len),
        );
    }
    let mut writer = bam::Writer::from_path(output_path, &header, bam::Format::Bam)?;
    for record in records {
        writer.write(record)?;
    }
    drop(writer); // Close BAM file before creating index

    if index {
        bam::index::build(output_path, None, bam::index::Type::Bai, 1)?;
    }
    Ok(())
}

/// MM text of a record, if any
pub fn mm_of(record: &Record) -> Option<String> {
    match record.aux(b"MM") {
        Ok(Aux::String(s)) => Some(s.to_owned()),
        _ => None,
    }
}

/// ML bytes of a record, if any
pub fn ml_of(record: &Record) -> Option<Vec<u8>> {
    match record.aux(b"ML") {
        Ok(Aux::ArrayU8(arr)) => Some(arr.iter().collect()),
        _ => None,
    }
}
