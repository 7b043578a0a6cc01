use std::io::{self, BufRead, Write};

use anyhow::{Context, Error};

use ldscan_core::{
    reader,
    stat::{self, DPrime, RSquared, D},
    Input, Locus, Window,
};

use super::Cli;

pub struct Runner {
    window: Window<Box<dyn BufRead>>,
    min_r2: f64,
    precision: usize,
    warnings: Warnings,
}

impl Runner {
    pub fn run(&mut self) -> Result<(), Error> {
        let stdout = io::stdout().lock();
        let mut writer = io::BufWriter::new(stdout);

        self.fill()?;
        while self.window.len() >= 2 {
            self.scan_head(&mut writer)?;
            self.window.slide()?;
            self.fill()?;
        }

        writer.flush()?;
        self.warnings.summarize();

        Ok(())
    }

    /// Slides until the window holds at least two loci, or no further locus can be admitted.
    /// Fewer than two loci is a valid, empty result.
    fn fill(&mut self) -> Result<(), Error> {
        while self.window.len() < 2 && !self.window.is_exhausted() {
            self.window.slide()?;
        }

        Ok(())
    }

    /// Writes the linkage disequilibrium between every allele of the window head and every
    /// allele of every other locus in the window.
    fn scan_head<W>(&mut self, writer: &mut W) -> Result<(), Error>
    where
        W: Write,
    {
        let Self {
            window,
            warnings,
            min_r2,
            precision,
        } = self;
        let precision = *precision;

        let mut iter = window.iter();
        let Some(head) = iter.next() else {
            return Ok(());
        };

        if !head.is_biallelic() {
            warnings.warn_once(head, Skip::Multiallelic);
            return Ok(());
        }

        for other in iter {
            if !other.is_biallelic() {
                warnings.warn_once(other, Skip::Multiallelic);
                continue;
            }

            for i in 0..head.n_alleles() {
                for j in 0..other.n_alleles() {
                    let (Some(p_a), Some(p_b)) = (
                        stat::allele_frequency(i, head),
                        stat::allele_frequency(j, other),
                    ) else {
                        warnings.warn_once(head, Skip::MissingFrequency);
                        continue;
                    };

                    let p_ab = stat::linked_allele_frequency(i, head, j, other);
                    let d = D::from_frequencies(p_a, p_b, p_ab);

                    let (Ok(d_prime), Ok(r_squared)) = (
                        DPrime::from_frequencies(p_a, p_b, p_ab),
                        RSquared::from_frequencies(p_a, p_b, p_ab),
                    ) else {
                        warnings.warn_once(head, Skip::Monomorphic);
                        continue;
                    };

                    if r_squared.0 >= *min_r2 {
                        writeln!(
                            writer,
                            "{i}\t{pos_a}\t{j}\t{pos_b}\t{p_a:.precision$}\t{p_b:.precision$}\t\
                            {p_ab:.precision$}\tD={d:.precision$}\tD'={d_prime:.precision$}\t\
                            r^2={r_squared:.precision$}",
                            pos_a = head.pos(),
                            pos_b = other.pos(),
                            d = d.0,
                            d_prime = d_prime.0,
                            r_squared = r_squared.0,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl TryFrom<&Cli> for Runner {
    type Error = Error;

    fn try_from(args: &Cli) -> Result<Self, Self::Error> {
        let input = Input::new(args.input.clone())?;

        let reader = reader::Builder::default()
            .set_input(input)
            .build()
            .context("failed to read VCF header")?;

        log::info!("input has {} sample columns", reader.sample_names().len());

        let window = Window::new(reader, args.window_size)?;

        Ok(Self {
            window,
            min_r2: args.min_r2,
            precision: args.precision,
            warnings: Warnings::default(),
        })
    }
}

/// A reason for skipping a comparison.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
enum Skip {
    Multiallelic = 0,
    MissingFrequency = 1,
    Monomorphic = 2,
}

impl Skip {
    const N: usize = 3;

    const VARIANTS: [Skip; Self::N] = [
        Skip::Multiallelic,
        Skip::MissingFrequency,
        Skip::Monomorphic,
    ];

    fn reason(&self) -> &'static str {
        match self {
            Skip::Multiallelic => "a multiallelic locus",
            Skip::MissingFrequency => "an unset allele frequency",
            Skip::Monomorphic => "a monomorphic locus",
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Warnings {
    counts: [usize; Skip::N],
}

impl Warnings {
    fn count(&self, skip: Skip) -> usize {
        self.counts[skip as u8 as usize]
    }

    fn count_mut(&mut self, skip: Skip) -> &mut usize {
        &mut self.counts[skip as u8 as usize]
    }

    fn warn_once(&mut self, locus: &Locus, skip: Skip) {
        if self.count(skip) == 0 {
            let chrom = locus.chrom();
            let pos = locus.pos();
            let reason = skip.reason();

            log::warn!(
                "Skipping comparison at position '{chrom}:{pos}' due to {reason}. \
                This warning will be shown only once, with a summary at the end."
            );
        }

        *self.count_mut(skip) += 1;
    }

    fn summarize(&self) {
        for skip in Skip::VARIANTS {
            let count = self.count(skip);

            if count > 0 {
                let reason = skip.reason();

                log::warn!("Skipped {count} comparisons due to {reason}.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_count_per_reason() {
        let locus: Locus = "1\t100\t.\tA\tT\t50\tPASS\tNS=1;AN=2\tGT\t0|1"
            .parse()
            .unwrap();

        let mut warnings = Warnings::default();
        warnings.warn_once(&locus, Skip::Multiallelic);
        warnings.warn_once(&locus, Skip::Multiallelic);
        warnings.warn_once(&locus, Skip::Monomorphic);

        assert_eq!(warnings.count(Skip::Multiallelic), 2);
        assert_eq!(warnings.count(Skip::MissingFrequency), 0);
        assert_eq!(warnings.count(Skip::Monomorphic), 1);
    }
}
