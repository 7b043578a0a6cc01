#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Streaming linkage disequilibrium from VCF.
//!
//! This serves as the core library implementation for the `ldscan` CLI, but can also be used as a
//! free-standing library for sliding-window scans over VCF data.
//!
//! # Overview
//!
//! A [`Reader`] turns a line-oriented VCF stream into parsed [`Locus`] records, one per data
//! line. A [`Window`] pulls loci from the reader and retains only those within a configured
//! base-pair span of the oldest retained locus, using a one-record lookahead buffer so that no
//! record is lost between windows. The [`stat`] module computes allele and haplotype frequencies
//! and the linkage disequilibrium coefficients D, D′ and r² over loci in the window.
//!
//! # Example
//!
//! ```
//! use ldscan_core::{Reader, Window};
//!
//! let vcf = b"##fileformat=VCFv4.2\n\
//! #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS0\tS1\n\
//! 1\t100\trs1\tA\tT\t50\tPASS\tNS=2;AN=4;AC=2;AF=0.5\tGT\t0|1\t1|0\n\
//! 1\t600\trs2\tC\tG\t50\tPASS\tNS=2;AN=4;AC=2;AF=0.5\tGT\t0|1\t1|0\n";
//!
//! let reader = Reader::new(&vcf[..])?;
//! let window = Window::new(reader, 10_000)?;
//!
//! assert_eq!(window.len(), 2);
//! # Ok::<(), std::io::Error>(())
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod input;
pub use input::Input;

pub mod locus;
pub use locus::Locus;

pub mod reader;
pub use reader::{ReadStatus, Reader};

pub mod stat;

pub mod window;
pub use window::Window;
