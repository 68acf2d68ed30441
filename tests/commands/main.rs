//! Integration tests for [`commands::run`] on bad inputs

/// Integration tests for [`commands::run`]
#[cfg(test)]
mod tests {

    use clap::Parser as _;
    use r2rmod_core::{Error, commands};

    #[test]
    fn run_fails_on_missing_mods_file() {
        let cli = commands::Cli::parse_from([
            "",
            "--mods",
            "./no_such_dir/mods.bam",
            "--r2r",
            "./no_such_dir/r2r.bam",
            "--bases",
            "A",
        ]);
        let err = commands::run(cli).unwrap_err();
        assert!(matches!(err, Error::RustHtslibError(_)));
    }

    #[test]
    fn cli_parses_full_option_set() {
        let cli = commands::Cli::parse_from([
            "",
            "-m",
            "mods.bam",
            "-r",
            "r2r.bam",
            "-a",
            "aligned.bam",
            "-o",
            "out.sam",
            "-b",
            "C+m,A",
            "-t",
            "4",
            "--max-indexed-reads",
            "1000",
            "--summary",
            "summary.json",
            "-v",
        ]);
        assert_eq!(cli.alignment, "aligned.bam");
        assert_eq!(cli.output, "out.sam");
        assert_eq!(cli.threads, 4);
        assert_eq!(cli.max_indexed_reads, Some(1000));
        assert_eq!(cli.summary.as_deref(), Some("summary.json"));
        assert_eq!(cli.log_level(), "debug");
        let shown: Vec<String> = cli.bases.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["C+m", "A+a"]);
    }
}
