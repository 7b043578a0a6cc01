//! A single allele of a locus.

/// The variant-type tag given to reference alleles.
pub const REF_KIND: &str = "REF";

/// One observed sequence variant at a locus.
///
/// Alleles are numbered from zero, with zero reserved for the reference allele. The count and
/// frequency are taken from the `AC` and `AF` info keys of the record and start out unset; zero
/// is a legal count, so absence is represented as `None` rather than a zero default.
#[derive(Clone, Debug, PartialEq)]
pub struct Allele {
    pub(crate) sequence: String,
    pub(crate) number: usize,
    pub(crate) ac: Option<u32>,
    pub(crate) af: Option<f64>,
    pub(crate) kind: String,
}

impl Allele {
    pub(crate) fn new(sequence: String, number: usize) -> Self {
        Self {
            sequence,
            number,
            ac: None,
            af: None,
            kind: String::new(),
        }
    }

    /// Returns the allele sequence (REF or ALT bases).
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Returns the allele number, with zero denoting the reference allele.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the number of occurrences of this allele in called genotypes, if known.
    pub fn count(&self) -> Option<u32> {
        self.ac
    }

    /// Returns the frequency of this allele in called genotypes, if known.
    pub fn frequency(&self) -> Option<f64> {
        self.af
    }

    /// Returns the variant-type tag, e.g. `SNP` or `INDEL`, or [`REF_KIND`] for the reference
    /// allele. Empty if the record carried no `VT` info key.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}
