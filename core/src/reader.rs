//! VCF record reader.

use std::{
    fmt,
    io::{self, BufRead},
};

pub mod builder;
pub use builder::Builder;

use crate::{locus::ParseLocusError, Locus};

const META_PREFIX: &str = "##";
const HEADER_PREFIX: char = '#';

// Fixed columns preceding the per-sample genotype columns: CHROM, POS, ID, REF, ALT, QUAL,
// FILTER, INFO, FORMAT.
const N_FIXED_COLUMNS: usize = 9;

/// A status when trying to read an element from a reader.
#[derive(Debug)]
pub enum ReadStatus<T> {
    /// Element was successfully read.
    Read(T),
    /// An error was encountered.
    Error(io::Error),
    /// The reader has finished.
    Done,
}

/// A reader yielding one parsed [`Locus`] per VCF data line.
///
/// On construction, the meta-information lines (`##`-prefixed) are skipped without
/// interpretation, and the column-header line (`#`-prefixed) is consumed to collect the sample
/// names. Data lines are then read forward-only, one per call to [`read_locus`](Self::read_locus).
pub struct Reader<R> {
    inner: R,
    samples: Vec<String>,
    buf: String,
    line_no: usize,
    pending: bool,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    /// Creates a new reader, consuming the header block of the stream.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut reader = Self {
            inner,
            samples: Vec::new(),
            buf: String::new(),
            line_no: 0,
            pending: false,
        };

        reader.read_header()?;

        Ok(reader)
    }

    /// Returns the sample names from the column-header line, in column order.
    pub fn sample_names(&self) -> &[String] {
        &self.samples
    }

    fn read_line(&mut self) -> io::Result<usize> {
        self.buf.clear();
        let bytes_read = self.inner.read_line(&mut self.buf)?;
        if bytes_read > 0 {
            self.line_no += 1;
        }
        Ok(bytes_read)
    }

    fn read_header(&mut self) -> io::Result<()> {
        loop {
            if self.read_line()? == 0 {
                // Empty input; the first read_locus will report Done.
                return Ok(());
            }

            let line = self.buf.trim_end();

            if line.is_empty() || line.starts_with(META_PREFIX) {
                continue;
            }

            if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
                self.samples = header
                    .split_ascii_whitespace()
                    .skip(N_FIXED_COLUMNS)
                    .map(String::from)
                    .collect();
            } else {
                // No column-header line; what we just read is the first data line.
                self.pending = true;
            }

            return Ok(());
        }
    }

    /// Reads the next data line and parses it into a locus.
    ///
    /// End-of-input is reported as [`ReadStatus::Done`] and is benign; a line that fails to parse
    /// is reported as an [`io::Error`] of kind [`InvalidData`](io::ErrorKind::InvalidData)
    /// carrying a [`RecordError`].
    pub fn read_locus(&mut self) -> ReadStatus<Locus> {
        loop {
            if !self.pending {
                match self.read_line() {
                    Ok(0) => return ReadStatus::Done,
                    Ok(_) => (),
                    Err(e) => return ReadStatus::Error(e),
                }
            }
            self.pending = false;

            let line = self.buf.trim_end();
            if line.is_empty() {
                continue;
            }

            return match line.parse() {
                Ok(locus) => ReadStatus::Read(locus),
                Err(source) => ReadStatus::Error(io::Error::new(
                    io::ErrorKind::InvalidData,
                    RecordError {
                        line: self.line_no,
                        source,
                    },
                )),
            };
        }
    }
}

/// An error associated with a data line that failed to parse, with its 1-based line number in the
/// input.
#[derive(Debug)]
pub struct RecordError {
    line: usize,
    source: ParseLocusError,
}

impl RecordError {
    /// Returns the 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record at line {}: {}", self.line, self.source)
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCF: &str = "\
##fileformat=VCFv4.2
##source=test
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS0\tS1
1\t100\trs1\tA\tT\t50\tPASS\tNS=2;AN=4;AC=2;AF=0.5\tGT\t0|1\t1|0
1\t600\trs2\tC\tG\t50\tPASS\tNS=2;AN=4;AC=2;AF=0.5\tGT\t0|0\t1|1
";

    fn read_all<R: BufRead>(reader: &mut Reader<R>) -> io::Result<Vec<Locus>> {
        let mut loci = Vec::new();
        loop {
            match reader.read_locus() {
                ReadStatus::Read(locus) => loci.push(locus),
                ReadStatus::Error(e) => return Err(e),
                ReadStatus::Done => return Ok(loci),
            }
        }
    }

    #[test]
    fn test_read_skips_header() -> io::Result<()> {
        let mut reader = Reader::new(VCF.as_bytes())?;

        let loci = read_all(&mut reader)?;
        assert_eq!(loci.len(), 2);
        assert_eq!(loci[0].pos(), 100);
        assert_eq!(loci[1].pos(), 600);

        Ok(())
    }

    #[test]
    fn test_sample_names() -> io::Result<()> {
        let reader = Reader::new(VCF.as_bytes())?;

        assert_eq!(reader.sample_names(), ["S0", "S1"]);

        Ok(())
    }

    #[test]
    fn test_read_without_column_header() -> io::Result<()> {
        let vcf = "1\t100\trs1\tA\tT\t50\tPASS\tNS=1;AN=2\tGT\t0|1\n";
        let mut reader = Reader::new(vcf.as_bytes())?;

        let loci = read_all(&mut reader)?;
        assert_eq!(loci.len(), 1);
        assert!(reader.sample_names().is_empty());

        Ok(())
    }

    #[test]
    fn test_read_empty_input_is_done() -> io::Result<()> {
        let mut reader = Reader::new(&b""[..])?;

        assert!(matches!(reader.read_locus(), ReadStatus::Done));

        Ok(())
    }

    #[test]
    fn test_read_malformed_line_has_line_number() -> io::Result<()> {
        let vcf = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS0
1\t100\trs1\tA\tT\t50\tPASS\tNS=1;AN=2\tGT\t0|1
1\t200\trs2\tC\tG\t50\tPASS
";
        let mut reader = Reader::new(vcf.as_bytes())?;

        assert!(matches!(reader.read_locus(), ReadStatus::Read(_)));

        let ReadStatus::Error(e) = reader.read_locus() else {
            panic!("expected error");
        };
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);

        let record_error = e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<RecordError>())
            .expect("expected record error");
        assert_eq!(record_error.line(), 4);

        Ok(())
    }
}
