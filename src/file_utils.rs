//! Utility functions for file I/O: opening and writing alignment files
//! and writing the run summary.

use crate::Error;
use rust_htslib::bam;
use rust_htslib::bam::Read as _;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

/// Opens a BAM/SAM/CRAM file for streaming, or standard input if the path is `-`.
/// `threads` extra threads are used for decompression.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header read.
///
/// ```
/// use r2rmod_core::file_utils::r2rmod_bam_reader;
/// assert!(r2rmod_bam_reader("no_such_file.bam", 1).is_err());
/// ```
pub fn r2rmod_bam_reader(bam_path: &str, threads: usize) -> Result<bam::Reader, Error> {
    let mut reader = if bam_path == "-" {
        bam::Reader::from_stdin()?
    } else {
        bam::Reader::from_path(bam_path)?
    };
    if threads > 1 {
        reader.set_threads(threads)?;
    }
    Ok(reader)
}

/// Opens an indexed BAM file for random access by contig.
/// Nothing is fetched yet.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or its index is
/// missing or invalid.
pub fn r2rmod_indexed_bam_reader(
    bam_path: &str,
    threads: usize,
) -> Result<bam::IndexedReader, Error> {
    let mut reader = bam::IndexedReader::from_path(bam_path)?;
    if threads > 1 {
        reader.set_threads(threads)?;
    }
    Ok(reader)
}

/// Output format from the file extension: `.sam` and `.cram` are recognised,
/// anything else is BAM.
///
/// ```
/// use r2rmod_core::file_utils::output_format;
/// use rust_htslib::bam::Format;
/// assert_eq!(output_format("out.sam"), Format::Sam);
/// assert_eq!(output_format("out.CRAM"), Format::Cram);
/// assert_eq!(output_format("out.bam"), Format::Bam);
/// assert_eq!(output_format("out"), Format::Bam);
/// ```
#[must_use]
pub fn output_format<J: AsRef<Path> + ?Sized>(path: &J) -> bam::Format {
    match path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("sam") => bam::Format::Sam,
        Some("cram") => bam::Format::Cram,
        _ => bam::Format::Bam,
    }
}

/// Creates the output alignment file with the given header.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn r2rmod_bam_writer<J: AsRef<Path> + ?Sized>(
    output_path: &J,
    header: &bam::Header,
    threads: usize,
) -> Result<bam::Writer, Error> {
    let mut writer = bam::Writer::from_path(output_path, header, output_format(output_path))?;
    if threads > 1 {
        writer.set_threads(threads)?;
    }
    Ok(writer)
}

/// Writes any serialisable value as pretty JSON, e.g. the run summary.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
///
/// ```
/// use r2rmod_core::{Error, TransferSummary, file_utils::write_json};
/// use std::fs;
/// use uuid::Uuid;
///
/// let temp_path = std::env::temp_dir().join(format!("{}.json", Uuid::new_v4()));
/// write_json(&TransferSummary::default(), &temp_path)?;
/// let content = fs::read_to_string(&temp_path)?;
/// assert!(content.contains("\"tagged\": 0"));
/// fs::remove_file(&temp_path)?;
/// # Ok::<(), Error>(())
/// ```
pub fn write_json<T, J>(value: &T, output_path: &J) -> Result<(), Error>
where
    T: Serialize,
    J: AsRef<Path> + ?Sized,
{
    let mut file = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut file, value)?;
    writeln!(file)?;
    file.flush()?;
    Ok(())
}
