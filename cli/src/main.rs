use std::{io::Write, path::PathBuf};

use anyhow::Error;

use clap::{ArgAction, Parser};

mod runner;
use runner::Runner;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scan a VCF for linkage disequilibrium between nearby loci.
///
/// For every pair of biallelic loci within the window span of each other, and every pair of
/// their alleles, the allele frequencies, haplotype frequency, D, D' and r² are written to
/// stdout as a tab-separated row.
#[derive(Debug, Parser)]
#[command(name = NAME, version = VERSION, about)]
pub struct Cli {
    /// Input VCF file.
    ///
    /// If no file is provided, stdin will be used. Gzipped input is detected and decompressed
    /// transparently.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Window span in bases.
    ///
    /// Loci are compared only while they lie within this many bases of the first locus in the
    /// sliding window.
    #[arg(short = 'w', long, default_value_t = ldscan_core::window::DEFAULT_SPAN, value_name = "INT")]
    window_size: u64,

    /// Minimum r² to report.
    ///
    /// Allele pairs with r² below this cutoff are computed but not printed.
    #[arg(short = 'r', long, default_value_t = 0.0, value_name = "FLOAT")]
    min_r2: f64,

    /// Output precision.
    #[arg(long, default_value_t = 6, value_name = "INT")]
    precision: usize,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiple times to increase verbosity, or left unset for quiet mode.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[arg(long, hide = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[{NAME} {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        let mut runner = Runner::try_from(&self)?;
        runner.run()
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    fn try_parse_args(cmd: &str) -> Result<Cli, clap::Error> {
        Parser::try_parse_from(cmd.split_whitespace())
    }

    fn parse_args(cmd: &str) -> Cli {
        try_parse_args(cmd).expect("failed to parse command")
    }

    #[test]
    fn test_defaults() {
        let args = parse_args("ldscan input.vcf");

        assert_eq!(args.input, Some(PathBuf::from("input.vcf")));
        assert_eq!(args.window_size, 10_000);
        assert_eq!(args.min_r2, 0.0);
        assert_eq!(args.precision, 6);
    }

    #[test]
    fn test_parse_window_size_and_cutoff() {
        let args = parse_args("ldscan -w 500 -r 0.8 input.vcf");

        assert_eq!(args.window_size, 500);
        assert_eq!(args.min_r2, 0.8);
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        let result = try_parse_args("ldscan -q -v input.vcf");

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::ArgumentConflict);
    }
}
