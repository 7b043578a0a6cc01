//! Diploid sample genotypes.

use std::{fmt, str::FromStr};

/// A diploid genotype for one sample: a maternal and a paternal allele number, plus whether the
/// genotype is phased.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sample {
    pub(crate) maternal: usize,
    pub(crate) paternal: usize,
    pub(crate) phased: bool,
}

impl Sample {
    /// Returns the maternal allele number.
    pub fn maternal(&self) -> usize {
        self.maternal
    }

    /// Returns the paternal allele number.
    pub fn paternal(&self) -> usize {
        self.paternal
    }

    /// Returns `true` if the genotype is phased, i.e. was separated by `|` rather than `/`.
    pub fn phased(&self) -> bool {
        self.phased
    }
}

impl FromStr for Sample {
    type Err = ParseSampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (phased, (maternal, paternal)) = if let Some(pair) = s.split_once('|') {
            (true, pair)
        } else if let Some(pair) = s.split_once('/') {
            (false, pair)
        } else {
            return Err(ParseSampleError(String::from(s)));
        };

        let parse = |allele: &str| {
            usize::from_str(allele).map_err(|_| ParseSampleError(String::from(s)))
        };

        Ok(Self {
            maternal: parse(maternal)?,
            paternal: parse(paternal)?,
            phased,
        })
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.phased { '|' } else { '/' };
        write!(f, "{}{}{}", self.maternal, sep, self.paternal)
    }
}

/// An error associated with parsing a genotype token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSampleError(pub(crate) String);

impl fmt::Display for ParseSampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse '{}' as genotype", self.0)
    }
}

impl std::error::Error for ParseSampleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phased() {
        assert_eq!(
            "0|1".parse(),
            Ok(Sample {
                maternal: 0,
                paternal: 1,
                phased: true
            })
        );
    }

    #[test]
    fn test_parse_unphased() {
        assert_eq!(
            "2/0".parse(),
            Ok(Sample {
                maternal: 2,
                paternal: 0,
                phased: false
            })
        );
    }

    #[test]
    fn test_parse_missing_is_error() {
        assert_eq!(
            "./.".parse::<Sample>(),
            Err(ParseSampleError(String::from("./.")))
        );
    }

    #[test]
    fn test_parse_haploid_is_error() {
        assert_eq!(
            "1".parse::<Sample>(),
            Err(ParseSampleError(String::from("1")))
        );
    }

    #[test]
    fn test_display_roundtrip() {
        assert_eq!("0|1".parse::<Sample>().unwrap().to_string(), "0|1");
        assert_eq!("1/1".parse::<Sample>().unwrap().to_string(), "1/1");
    }
}
