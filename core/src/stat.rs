//! Linkage disequilibrium statistics.
//!
//! The functions here are pure: they compute over whatever loci and allele numbers they are
//! given. The scan that drives them is only meaningful for biallelic loci, but enforcing that
//! restriction is left to the caller.

use std::fmt;

use crate::Locus;

/// Returns the stored frequency of allele `alnum` at the locus, with zero denoting the reference
/// allele.
///
/// `None` when `alnum` exceeds the allele count, or when the record carried no frequency for the
/// allele.
pub fn allele_frequency(alnum: usize, locus: &Locus) -> Option<f64> {
    locus.alleles().get(alnum).and_then(|allele| allele.frequency())
}

/// Returns the frequency of the haplotype carrying allele `alnum1` at `locus1` together with
/// allele `alnum2` at `locus2`.
///
/// Samples are paired by column position, so the two loci's sample columns are assumed to be in
/// the same order; only the leading columns present at both loci are considered. The maternal and
/// paternal positions of a pair are checked independently: a maternal match at one locus must
/// pair with a maternal match at the other.
pub fn linked_allele_frequency(
    alnum1: usize,
    locus1: &Locus,
    alnum2: usize,
    locus2: &Locus,
) -> f64 {
    let mut pairs = 0;
    let mut count = 0;

    for (sample1, sample2) in locus1.samples().iter().zip(locus2.samples()) {
        pairs += 1;
        if sample1.maternal() == alnum1 && sample2.maternal() == alnum2 {
            count += 1;
        }
        if sample1.paternal() == alnum1 && sample2.paternal() == alnum2 {
            count += 1;
        }
    }

    if pairs == 0 {
        return 0.0;
    }

    count as f64 / (2 * pairs) as f64
}

/// The coefficient of linkage disequilibrium between two alleles at different loci.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct D(pub f64);

impl D {
    /// Returns D from the marginal allele frequencies and the haplotype frequency.
    pub fn from_frequencies(p_a: f64, p_b: f64, p_ab: f64) -> Self {
        Self(p_ab - p_a * p_b)
    }
}

/// Lewontin's D′: D normalised by its theoretical maximum magnitude given the marginal
/// frequencies.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct DPrime(pub f64);

impl DPrime {
    /// Returns D′ from the marginal allele frequencies and the haplotype frequency.
    pub fn from_frequencies(p_a: f64, p_b: f64, p_ab: f64) -> Result<Self, MonomorphicError> {
        check_polymorphic(p_a, p_b)?;

        let d = D::from_frequencies(p_a, p_b, p_ab).0;

        let d_max = if d < 0.0 {
            (p_a * p_b).min((1.0 - p_a) * (1.0 - p_b))
        } else {
            (p_a * (1.0 - p_b)).min((1.0 - p_a) * p_b)
        };

        Ok(Self(d / d_max))
    }
}

/// The squared correlation r² between two alleles at different loci.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RSquared(pub f64);

impl RSquared {
    /// Returns r² from the marginal allele frequencies and the haplotype frequency.
    pub fn from_frequencies(p_a: f64, p_b: f64, p_ab: f64) -> Result<Self, MonomorphicError> {
        check_polymorphic(p_a, p_b)?;

        let d = D::from_frequencies(p_a, p_b, p_ab).0;

        Ok(Self(d * d / (p_a * (1.0 - p_a) * p_b * (1.0 - p_b))))
    }
}

fn check_polymorphic(p_a: f64, p_b: f64) -> Result<(), MonomorphicError> {
    if p_a > 0.0 && p_a < 1.0 && p_b > 0.0 && p_b < 1.0 {
        Ok(())
    } else {
        Err(MonomorphicError { p_a, p_b })
    }
}

/// An error associated with computing a normalised linkage disequilibrium coefficient from a
/// marginal frequency outside the open unit interval, where the divisor degenerates to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonomorphicError {
    p_a: f64,
    p_b: f64,
}

impl fmt::Display for MonomorphicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let &MonomorphicError { p_a, p_b } = self;
        write!(
            f,
            "linkage disequilibrium undefined for monomorphic marginal frequencies \
            (p_A = {p_a}, p_B = {p_b})"
        )
    }
}

impl std::error::Error for MonomorphicError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn locus(pos: u64, genotypes: &str) -> Locus {
        let ns = genotypes.split_ascii_whitespace().count();
        let line = format!("1\t{pos}\t.\tA\tT\t50\tPASS\tNS={ns};AN=4;AC=2;AF=0.5\tGT\t{genotypes}");
        line.parse().expect("failed to parse test locus")
    }

    #[test]
    fn test_allele_frequency() {
        let locus = locus(100, "0|1\t1|0");

        assert_approx_eq!(allele_frequency(0, &locus).unwrap(), 0.5);
        assert_approx_eq!(allele_frequency(1, &locus).unwrap(), 0.5);
    }

    #[test]
    fn test_allele_frequency_out_of_range() {
        let locus = locus(100, "0|1\t1|0");

        assert_eq!(allele_frequency(2, &locus), None);
    }

    #[test]
    fn test_linked_allele_frequency_perfect_linkage() {
        let a = locus(100, "0|0\t0|1\t1|0\t1|1");
        let b = locus(600, "0|0\t0|1\t1|0\t1|1");

        assert_approx_eq!(linked_allele_frequency(0, &a, 0, &b), 0.5);
        assert_approx_eq!(linked_allele_frequency(0, &a, 1, &b), 0.0);
        assert_approx_eq!(linked_allele_frequency(1, &a, 1, &b), 0.5);
    }

    #[test]
    fn test_linked_allele_frequency_checks_parental_origin() {
        // The maternal haplotypes match allele-for-allele, the paternal ones are opposed; pairs
        // must not be counted across parental origin.
        let a = locus(100, "0|0\t1|1");
        let b = locus(600, "0|1\t1|0");

        assert_approx_eq!(linked_allele_frequency(0, &a, 0, &b), 0.25);
        assert_approx_eq!(linked_allele_frequency(0, &a, 1, &b), 0.25);
    }

    #[test]
    fn test_linked_allele_frequency_pairs_leading_columns() {
        let a = locus(100, "0|0\t1|1\t0|1");
        let b = locus(600, "0|0\t1|1");

        // Only the two columns present at both loci are paired.
        assert_approx_eq!(linked_allele_frequency(0, &a, 0, &b), 0.5);
    }

    #[test]
    fn test_d() {
        assert_approx_eq!(D::from_frequencies(0.5, 0.5, 0.5).0, 0.25);
        assert_approx_eq!(D::from_frequencies(0.5, 0.5, 0.0).0, -0.25);
        assert_approx_eq!(D::from_frequencies(0.2, 0.4, 0.15).0, 0.07);
    }

    #[test]
    fn test_d_prime() -> Result<(), MonomorphicError> {
        assert_approx_eq!(DPrime::from_frequencies(0.5, 0.5, 0.5)?.0, 1.0);
        assert_approx_eq!(DPrime::from_frequencies(0.5, 0.5, 0.0)?.0, -1.0);

        // D = 0.07, D_max = min(0.2 * 0.6, 0.8 * 0.4) = 0.12.
        assert_approx_eq!(DPrime::from_frequencies(0.2, 0.4, 0.15)?.0, 0.07 / 0.12);

        Ok(())
    }

    #[test]
    fn test_d_prime_within_unit_interval() -> Result<(), MonomorphicError> {
        for (p_a, p_b) in [(0.1_f64, 0.9_f64), (0.25, 0.5), (0.5, 0.5), (0.7, 0.3)] {
            let lo: f64 = (p_a + p_b - 1.0).max(0.0);
            let hi = p_a.min(p_b);

            for i in 0..=10 {
                let p_ab = lo + (hi - lo) * f64::from(i) / 10.0;
                let d_prime = DPrime::from_frequencies(p_a, p_b, p_ab)?.0;

                assert!(
                    (-1.0 - 1e-9..=1.0 + 1e-9).contains(&d_prime),
                    "D' = {d_prime} out of range for p_A = {p_a}, p_B = {p_b}, p_AB = {p_ab}"
                );
            }
        }

        Ok(())
    }

    #[test]
    fn test_r_squared() -> Result<(), MonomorphicError> {
        assert_approx_eq!(RSquared::from_frequencies(0.5, 0.5, 0.5)?.0, 1.0);
        assert_approx_eq!(RSquared::from_frequencies(0.5, 0.5, 0.0)?.0, 1.0);

        // D = 0.07, denominator = 0.16 * 0.24.
        assert_approx_eq!(
            RSquared::from_frequencies(0.2, 0.4, 0.15)?.0,
            0.07 * 0.07 / (0.16 * 0.24)
        );

        Ok(())
    }

    #[test]
    fn test_r_squared_symmetric_in_loci() -> Result<(), MonomorphicError> {
        let lhs = RSquared::from_frequencies(0.2, 0.4, 0.15)?;
        let rhs = RSquared::from_frequencies(0.4, 0.2, 0.15)?;

        assert_approx_eq!(lhs.0, rhs.0);

        Ok(())
    }

    #[test]
    fn test_monomorphic_marginal_is_an_error() {
        assert!(DPrime::from_frequencies(1.0, 0.5, 0.5).is_err());
        assert!(DPrime::from_frequencies(0.5, 0.0, 0.0).is_err());
        assert!(RSquared::from_frequencies(0.0, 0.5, 0.0).is_err());
        assert!(RSquared::from_frequencies(0.5, 1.0, 0.5).is_err());
    }
}
