//! # Command run in `main.rs`
//!
//! We set up the command line options and the code that runs on them here.
use crate::file_utils::{
    r2rmod_bam_reader, r2rmod_bam_writer, r2rmod_indexed_bam_reader, write_json,
};
use crate::progress::ProgressTracker;
use crate::{Error, ModIndexBuilder, ModTransfer, ModType, TransferSummary};
use clap::{ArgAction, Parser};
use derive_builder::Builder;
use itertools::join;
use rust_htslib::bam::{self, Read as _, header::HeaderRecord};
use std::env;

/// Main command line parsing struct
#[derive(Builder, Parser, Debug, Clone)]
#[command(author, version,
    about = "Transfers base modification calls (MM/ML tags) from reads onto the \
             reference-aligned records of the reads derived from them",
    long_about = None)]
#[non_exhaustive]
pub struct Cli {
    /// BAM/SAM file with MM/ML tags on the reads the modifications were called on
    #[clap(short, long)]
    pub mods: String,
    /// Indexed BAM of those reads aligned to the derived reads,
    /// i.e. with one contig per derived read
    #[clap(short, long)]
    pub r2r: String,
    /// Derived reads aligned to a reference; '-' for stdin
    #[clap(short, long, default_value = "-")]
    #[builder(default = "String::from(\"-\")")]
    pub alignment: String,
    /// Output file; SAM or CRAM if the extension says so, BAM otherwise.
    /// If pre-existing, the file will be overwritten.
    #[clap(short, long, default_value = "aligned_reads.r2r_mods.bam")]
    #[builder(default = "String::from(\"aligned_reads.r2r_mods.bam\")")]
    pub output: String,
    /// Modification types to transfer, comma separated e.g. `A+a,C+m`.
    /// A base on its own uses its default code (A+a, C+m, G+o, T+T, N+N)
    #[clap(short, long, value_delimiter = ',', num_args = 1.., required = true)]
    pub bases: Vec<ModType>,
    /// Threads for compressing and decompressing alignment files
    #[clap(short, long, default_value_t = 1)]
    #[builder(default = "1")]
    pub threads: usize,
    /// Fail if the modification file holds more reads than this
    #[clap(long)]
    #[builder(default)]
    pub max_indexed_reads: Option<usize>,
    /// Write a JSON summary of the run to this path
    #[clap(long)]
    #[builder(default)]
    pub summary: Option<String>,
    /// More logging; repeat for even more
    #[clap(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    #[builder(default)]
    pub verbose: u8,
    /// Log warnings and errors only
    #[clap(short, long)]
    #[builder(default)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter implied by `-v` and `-q`
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Requested modification types with repeats removed, in order
    fn mod_types(&self) -> Vec<ModType> {
        let mut mod_types: Vec<ModType> = Vec::with_capacity(self.bases.len());
        for m in &self.bases {
            if mod_types.contains(m) {
                log::warn!("modification type {m} requested more than once");
            } else {
                mod_types.push(*m);
            }
        }
        mod_types
    }
}

/// Program record added to the output header
fn program_record<'a>(command_line: &str) -> HeaderRecord<'a> {
    let mut record = HeaderRecord::new(b"PG");
    let _ = record
        .push_tag(b"ID", "r2rmod")
        .push_tag(b"PN", "r2rmod")
        .push_tag(b"VN", env!("CARGO_PKG_VERSION"))
        .push_tag(b"CL", command_line);
    record
}

/// Runs the transfer: indexes the modification calls, then streams the
/// reference-aligned records through, tagging those it can, writing all.
///
/// # Errors
/// Problems opening, reading or writing files, an index over capacity,
/// or invalid records.
pub fn run(cli: Cli) -> Result<TransferSummary, Error> {
    let mod_types = cli.mod_types();
    log::info!(
        "transferring {} from {} via {} onto {}",
        join(&mod_types, ","),
        cli.mods,
        cli.r2r,
        cli.alignment
    );

    let index_builder = match cli.max_indexed_reads {
        Some(v) => ModIndexBuilder::new().max_reads(v),
        None => ModIndexBuilder::new(),
    };
    let (index, index_stats) =
        index_builder.build_from_reader(&mut r2rmod_bam_reader(&cli.mods, cli.threads)?)?;

    let mut r2r = r2rmod_indexed_bam_reader(&cli.r2r, cli.threads)?;
    let mut reader = r2rmod_bam_reader(&cli.alignment, cli.threads)?;

    let mut header = bam::Header::from_template(reader.header());
    let command_line = join(env::args_os().map(|a| a.to_string_lossy().into_owned()), " ");
    let _ = header.push_record(&program_record(&command_line));
    let mut writer = r2rmod_bam_writer(&cli.output, &header, cli.threads)?;

    let transfer = ModTransfer::new(&index, mod_types);
    let mut summary = TransferSummary {
        indexed_reads: index.len(),
        unparseable_mod_records: index_stats.failed,
        ..TransferSummary::default()
    };
    let mut progress = ProgressTracker::new("Processed records");

    for r in reader.records() {
        let mut record = r?;
        summary.add(transfer.transfer(&mut record, &mut r2r)?);
        writer.write(&record)?;
        let _ = progress.record();
    }
    progress.log_final();

    log::info!(
        "tagged {} of {} records with {} modification calls",
        summary.tagged,
        summary.records,
        summary.calls_written
    );
    for (reason, count) in &summary.skipped {
        log::info!("skipped {count} records: {reason}");
    }
    if let Some(path) = &cli.summary {
        write_json(&summary, path)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_bases_and_defaults() {
        let cli = Cli::parse_from(["r2rmod", "-m", "mods.bam", "-r", "r2r.bam", "-b", "A,C+h"]);
        assert_eq!(cli.alignment, "-");
        assert_eq!(cli.output, "aligned_reads.r2r_mods.bam");
        assert_eq!(cli.threads, 1);
        assert_eq!(
            cli.bases,
            vec![
                ModType::from_str("A+a").expect("no error"),
                ModType::from_str("C+h").expect("no error")
            ]
        );
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn repeated_bases_flag_and_verbosity() {
        let cli = Cli::parse_from([
            "r2rmod", "-m", "m.bam", "-r", "r.bam", "-b", "A", "-b", "T-472232", "-vv",
        ]);
        assert_eq!(cli.bases.len(), 2);
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn invalid_mod_type_is_rejected() {
        assert!(Cli::try_parse_from(["r2rmod", "-m", "m", "-r", "r", "-b", "U+a"]).is_err());
        assert!(Cli::try_parse_from(["r2rmod", "-m", "m", "-r", "r"]).is_err());
        assert!(
            Cli::try_parse_from(["r2rmod", "-m", "m", "-r", "r", "-b", "A", "-q", "-v"]).is_err()
        );
    }

    #[test]
    fn builder_defaults_match_parser() {
        let cli = CliBuilder::default()
            .mods("m.bam".to_owned())
            .r2r("r.bam".to_owned())
            .bases(vec![ModType::from_str("A").expect("no error")])
            .quiet(true)
            .build()
            .expect("no error");
        assert_eq!(cli.alignment, "-");
        assert_eq!(cli.threads, 1);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn mod_types_drop_repeats() {
        let cli = Cli::parse_from(["r2rmod", "-m", "m", "-r", "r", "-b", "A,A+a,C"]);
        let shown: Vec<String> = cli.mod_types().iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["A+a", "C+m"]);
    }

    #[test]
    fn program_record_fields() {
        let mut header = bam::Header::new();
        let _ = header.push_record(&program_record("r2rmod -m x"));
        let text = String::from_utf8(header.to_bytes()).expect("no error");
        assert!(text.starts_with("@PG\tID:r2rmod"));
        assert!(text.contains("CL:r2rmod -m x"));
    }
}
