//! A single VCF record.

pub mod allele;
pub use allele::Allele;

mod parse;
pub use parse::ParseLocusError;

pub mod sample;
pub use sample::Sample;

/// One genomic position parsed from a VCF data line, with its alleles, diploid sample genotypes,
/// and summary info.
///
/// A locus is created by parsing a data line (see [`FromStr`](std::str::FromStr)) and is read-only
/// thereafter. Alleles are ordered with the reference allele first, and samples are in VCF column
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Locus {
    pub(crate) chrom: u32,
    pub(crate) pos: u64,
    pub(crate) id: String,
    pub(crate) qual: Option<i32>,
    pub(crate) pass: bool,
    pub(crate) ns: usize,
    pub(crate) an: Option<u32>,
    pub(crate) alleles: Vec<Allele>,
    pub(crate) samples: Vec<Sample>,
}

impl Locus {
    /// Returns the chromosome identifier.
    pub fn chrom(&self) -> u32 {
        self.chrom
    }

    /// Returns the 1-based position within the chromosome.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Returns the free-text identifier from the ID column.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the quality score, if one was given.
    pub fn qual(&self) -> Option<i32> {
        self.qual
    }

    /// Returns `true` if the FILTER column was literally `PASS`.
    pub fn pass(&self) -> bool {
        self.pass
    }

    /// Returns the number of samples with data, as given by the `NS` info key.
    pub fn ns(&self) -> usize {
        self.ns
    }

    /// Returns the total number of called alleles, as given by the `AN` info key.
    pub fn an(&self) -> Option<u32> {
        self.an
    }

    /// Returns the number of distinct alleles at this locus, i.e. one reference allele plus the
    /// number of alternate alleles.
    pub fn n_alleles(&self) -> usize {
        self.alleles.len()
    }

    /// Returns `true` if the locus has exactly one reference and one alternate allele.
    pub fn is_biallelic(&self) -> bool {
        self.alleles.len() == 2
    }

    /// Returns the alleles at this locus, reference first.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// Returns the sample genotypes at this locus, in VCF column order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
