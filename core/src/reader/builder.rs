//! Record reader builder.

use std::io::{self, BufRead, BufReader};

use flate2::bufread::MultiGzDecoder;

use crate::Input;

/// A record reader over a boxed input source.
pub type DynReader = super::Reader<Box<dyn BufRead>>;

/// A builder for a record reader, with transparent gzip decompression.
#[derive(Debug, Default)]
pub struct Builder {
    input: Option<Input>,
    compression_method: Option<Option<CompressionMethod>>,
}

impl Builder {
    /// Builds a record reader from the configured input source.
    pub fn build(self) -> io::Result<DynReader> {
        let reader = self.input.as_ref().unwrap_or(&Input::Stdin).open()?;
        self.build_from_reader(reader)
    }

    /// Builds a record reader from an arbitrary buffered reader.
    pub fn build_from_reader<R>(self, mut reader: R) -> io::Result<DynReader>
    where
        R: 'static + BufRead,
    {
        let compression_method = match self.compression_method {
            Some(compression_method) => compression_method,
            None => CompressionMethod::detect(&mut reader)?,
        };

        let inner: Box<dyn BufRead> = match compression_method {
            Some(CompressionMethod::Gzip) => {
                Box::new(BufReader::new(MultiGzDecoder::new(reader)))
            }
            None => Box::new(reader),
        };

        super::Reader::new(inner)
    }

    /// Sets the compression method.
    ///
    /// By default, the compression method is detected from the stream.
    pub fn set_compression_method(mut self, compression_method: Option<CompressionMethod>) -> Self {
        self.compression_method = Some(compression_method);
        self
    }

    /// Sets the input source.
    ///
    /// By default, stdin is used.
    pub fn set_input(mut self, input: Input) -> Self {
        self.input = Some(input);
        self
    }
}

/// A compression method for the input stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMethod {
    /// Gzip (including bgzip) compression.
    Gzip,
}

impl CompressionMethod {
    fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if let Some(buf) = src.get(..GZIP_MAGIC_NUMBER.len()) {
            if buf == GZIP_MAGIC_NUMBER {
                return Ok(Some(CompressionMethod::Gzip));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use crate::ReadStatus;

    const VCF: &str = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS0
1\t100\trs1\tA\tT\t50\tPASS\tNS=1;AN=2\tGT\t0|1
";

    #[test]
    fn test_build_plain() -> io::Result<()> {
        let mut reader = Builder::default().build_from_reader(VCF.as_bytes())?;

        assert!(matches!(reader.read_locus(), ReadStatus::Read(_)));
        assert!(matches!(reader.read_locus(), ReadStatus::Done));

        Ok(())
    }

    #[test]
    fn test_build_detects_gzip() -> io::Result<()> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(VCF.as_bytes())?;
        let compressed = encoder.finish()?;

        let mut reader = Builder::default().build_from_reader(io::Cursor::new(compressed))?;

        assert_eq!(reader.sample_names(), ["S0"]);
        let ReadStatus::Read(locus) = reader.read_locus() else {
            panic!("expected locus");
        };
        assert_eq!(locus.pos(), 100);

        Ok(())
    }
}
