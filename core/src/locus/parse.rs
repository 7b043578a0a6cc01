//! Parsing a VCF data line into a [`Locus`].

use std::{fmt, str::FromStr};

use super::{
    allele::{Allele, REF_KIND},
    sample::ParseSampleError,
    Locus,
};

// Rounding slack when checking that alternate allele frequencies sum to at most one.
const AF_EPSILON: f64 = 1e-6;

/// A cursor over the whitespace-separated columns of a data line, yielding each fixed column by
/// name so that a missing column is reported as such.
struct Columns<'a> {
    iter: std::str::SplitAsciiWhitespace<'a>,
}

impl<'a> Columns<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            iter: line.split_ascii_whitespace(),
        }
    }

    fn try_next(&mut self) -> Option<&'a str> {
        self.iter.next()
    }

    fn next(&mut self, column: &'static str) -> Result<&'a str, ParseLocusError> {
        self.try_next()
            .ok_or(ParseLocusError::MissingColumn(column))
    }

    fn parse<T: FromStr>(&mut self, column: &'static str) -> Result<T, ParseLocusError> {
        let value = self.next(column)?;

        T::from_str(value).map_err(|_| ParseLocusError::InvalidColumn {
            column,
            value: String::from(value),
        })
    }
}

impl FromStr for Locus {
    type Err = ParseLocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut columns = Columns::new(s);

        let chrom = columns.parse("CHROM")?;
        let pos = columns.parse("POS")?;
        let id = String::from(columns.next("ID")?);
        let ref_seq = columns.next("REF")?;
        let alt = columns.next("ALT")?;
        let qual = match columns.next("QUAL")? {
            "." => None,
            value => Some(value.parse().map_err(|_| ParseLocusError::InvalidColumn {
                column: "QUAL",
                value: String::from(value),
            })?),
        };
        let pass = columns.next("FILTER")? == "PASS";
        let info = columns.next("INFO")?;

        // The reference allele comes first; alternates follow in ALT column order, numbered
        // upwards from one. Counts and frequencies start out unset.
        let mut alleles = vec![Allele::new(String::from(ref_seq), 0)];
        alleles.extend(
            alt.split(',')
                .enumerate()
                .map(|(i, seq)| Allele::new(String::from(seq), i + 1)),
        );

        let (ns, an) = parse_info(info, &mut alleles)?;
        let ns = ns.ok_or(ParseLocusError::MissingInfo("NS"))?;

        backfill_reference(&mut alleles, an)?;

        // The FORMAT column is not interpreted.
        columns.next("FORMAT")?;

        let mut samples = Vec::with_capacity(ns);
        for found in 0..ns {
            let token = columns
                .try_next()
                .ok_or(ParseLocusError::MissingGenotypes { expected: ns, found })?;
            samples.push(token.parse().map_err(ParseLocusError::InvalidGenotype)?);
        }

        // Any remaining columns are ignored.

        Ok(Self {
            chrom,
            pos,
            id,
            qual,
            pass,
            ns,
            an,
            alleles,
            samples,
        })
    }
}

/// Dispatches each `;`-separated INFO entry on its key, returning the `NS` and `AN` values.
///
/// The `AC`, `AF` and `VT` keys carry one comma-separated value per alternate allele, listed in
/// ascending allele-number order. Each value is therefore assigned positionally: it fills the
/// first alternate allele whose corresponding field is still unset. Unknown keys are ignored.
fn parse_info(
    info: &str,
    alleles: &mut [Allele],
) -> Result<(Option<usize>, Option<u32>), ParseLocusError> {
    let mut ns = None;
    let mut an = None;

    for entry in info.split(';') {
        let Some((key, values)) = entry.split_once('=') else {
            // Flag entries carry no value.
            continue;
        };

        match key {
            "NS" => ns = Some(parse_info_value("NS", values)?),
            "AN" => an = Some(parse_info_value("AN", values)?),
            "AC" => {
                for value in values.split(',') {
                    let ac = parse_info_value("AC", value)?;
                    first_unset(alleles, "AC", |allele| allele.ac.is_none())?.ac = Some(ac);
                }
            }
            "AF" => {
                for value in values.split(',') {
                    let af = parse_info_value("AF", value)?;
                    first_unset(alleles, "AF", |allele| allele.af.is_none())?.af = Some(af);
                }
            }
            "VT" => {
                for value in values.split(',') {
                    let allele = first_unset(alleles, "VT", |allele| allele.kind.is_empty())?;
                    allele.kind = String::from(value);
                }
            }
            _ => (),
        }
    }

    Ok((ns, an))
}

fn parse_info_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ParseLocusError> {
    T::from_str(value).map_err(|_| ParseLocusError::InvalidInfo {
        key,
        value: String::from(value),
    })
}

/// Returns the first alternate allele for which `is_unset` holds.
fn first_unset<'a>(
    alleles: &'a mut [Allele],
    key: &'static str,
    is_unset: impl Fn(&Allele) -> bool,
) -> Result<&'a mut Allele, ParseLocusError> {
    alleles
        .iter_mut()
        .skip(1)
        .find(|allele| is_unset(allele))
        .ok_or(ParseLocusError::ExtraInfoValues { key })
}

/// Fills in the reference allele by subtraction: its count is `AN` minus the alternate counts,
/// and its frequency is one minus the alternate frequencies.
fn backfill_reference(alleles: &mut [Allele], an: Option<u32>) -> Result<(), ParseLocusError> {
    let alt_ac: u32 = alleles.iter().skip(1).filter_map(|allele| allele.ac).sum();
    let alt_af: f64 = alleles.iter().skip(1).filter_map(|allele| allele.af).sum();

    if let Some(an) = an {
        let ref_ac = an.checked_sub(alt_ac).ok_or_else(|| {
            ParseLocusError::InconsistentInfo(format!(
                "alternate allele counts sum to {alt_ac}, above AN={an}"
            ))
        })?;
        alleles[0].ac = Some(ref_ac);
    }

    let ref_af = 1.0 - alt_af;
    if ref_af < -AF_EPSILON {
        return Err(ParseLocusError::InconsistentInfo(format!(
            "alternate allele frequencies sum to {alt_af}, above one"
        )));
    }
    alleles[0].af = Some(ref_af.max(0.0));
    alleles[0].kind = String::from(REF_KIND);

    Ok(())
}

/// An error associated with parsing a VCF data line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseLocusError {
    /// A fixed column was missing from the line.
    MissingColumn(&'static str),
    /// A fixed column failed to parse.
    InvalidColumn {
        /// The name of the offending column.
        column: &'static str,
        /// The value that failed to parse.
        value: String,
    },
    /// A required INFO key was absent.
    MissingInfo(&'static str),
    /// An INFO value failed to parse.
    InvalidInfo {
        /// The INFO key.
        key: &'static str,
        /// The value that failed to parse.
        value: String,
    },
    /// An INFO key carried more values than there are alternate alleles.
    ExtraInfoValues {
        /// The INFO key.
        key: &'static str,
    },
    /// The INFO summary values contradict each other.
    InconsistentInfo(String),
    /// A genotype token failed to parse.
    InvalidGenotype(ParseSampleError),
    /// The line carried fewer genotype columns than the `NS` info key promises.
    MissingGenotypes {
        /// The expected number of genotype columns.
        expected: usize,
        /// The number actually found.
        found: usize,
    },
}

impl fmt::Display for ParseLocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseLocusError::MissingColumn(column) => write!(f, "missing {column} column"),
            ParseLocusError::InvalidColumn { column, value } => {
                write!(f, "failed to parse '{value}' as {column} column")
            }
            ParseLocusError::MissingInfo(key) => write!(f, "missing {key} in INFO column"),
            ParseLocusError::InvalidInfo { key, value } => {
                write!(f, "failed to parse '{value}' as INFO {key} value")
            }
            ParseLocusError::ExtraInfoValues { key } => {
                write!(f, "more INFO {key} values than alternate alleles")
            }
            ParseLocusError::InconsistentInfo(reason) => {
                write!(f, "inconsistent INFO column: {reason}")
            }
            ParseLocusError::InvalidGenotype(e) => write!(f, "{e}"),
            ParseLocusError::MissingGenotypes { expected, found } => {
                write!(f, "expected {expected} genotype columns, found {found}")
            }
        }
    }
}

impl std::error::Error for ParseLocusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseLocusError::InvalidGenotype(e) => Some(e),
            _ => None,
        }
    }
}
