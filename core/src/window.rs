//! Sliding window over VCF loci.

use std::{
    collections::VecDeque,
    fmt,
    io::{self, BufRead},
};

use crate::{Locus, ReadStatus, Reader};

/// The default window span, in bases.
pub const DEFAULT_SPAN: u64 = 10_000;

/// A FIFO of loci within a configured base-pair span of the oldest retained locus.
///
/// The window owns its record reader and a one-record lookahead buffer: a locus is always parsed
/// before deciding whether it belongs to the current window, and a locus that falls outside the
/// span stays buffered until a later [`slide`](Self::slide) admits it. Loci are owned exclusively
/// by the window and are dropped on eviction.
pub struct Window<R> {
    reader: Reader<R>,
    span: u64,
    loci: VecDeque<Locus>,
    lookahead: Option<Locus>,
    ended: bool,
    is_valid: Box<dyn Fn(&Locus) -> bool>,
}

impl<R> Window<R>
where
    R: BufRead,
{
    /// Creates a window over the reader with the given span and the default admission predicate,
    /// admitting loci until the buffered locus falls outside the span of the first.
    ///
    /// An input without any data line is an error of kind
    /// [`InvalidData`](io::ErrorKind::InvalidData), not an empty window.
    pub fn new(reader: Reader<R>, span: u64) -> io::Result<Self> {
        Builder::default().set_span(span).build(reader)
    }

    /// Returns a builder for a window.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the configured span, in bases.
    pub fn span(&self) -> u64 {
        self.span
    }

    /// Returns the number of loci currently in the window.
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    /// Returns `true` if the window currently contains no loci.
    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Returns the oldest locus in the window, if any.
    pub fn head(&self) -> Option<&Locus> {
        self.loci.front()
    }

    /// Returns an iterator over the loci in the window, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Locus> {
        self.loci.iter()
    }

    /// Returns `true` if the input is exhausted and the lookahead buffer is drained, so that no
    /// further locus can ever be admitted.
    pub fn is_exhausted(&self) -> bool {
        self.ended && self.lookahead.is_none()
    }

    /// Returns the sample names from the column-header line of the input.
    pub fn sample_names(&self) -> &[String] {
        self.reader.sample_names()
    }

    /// Moves the window forward one locus: the oldest locus is evicted and dropped, and buffered
    /// and subsequent loci are admitted while they fall within the span of the new head.
    pub fn slide(&mut self) -> io::Result<()> {
        self.loci.pop_front();
        self.admit()
    }

    /// Reads the next locus into the lookahead buffer, unless one is already buffered or the
    /// input has ended.
    fn prime(&mut self) -> io::Result<()> {
        if self.lookahead.is_some() || self.ended {
            return Ok(());
        }

        match self.reader.read_locus() {
            ReadStatus::Read(locus) => self.lookahead = Some(locus),
            ReadStatus::Done => self.ended = true,
            ReadStatus::Error(e) => return Err(e),
        }

        Ok(())
    }

    /// Admits buffered loci while they fall within the span of the head, re-priming the buffer
    /// after each admission. Loci rejected by the admission predicate are skipped: the buffer
    /// still advances past them.
    fn admit(&mut self) -> io::Result<()> {
        loop {
            match self.lookahead.take() {
                Some(locus) if self.in_span(&locus) => {
                    if (self.is_valid)(&locus) {
                        self.loci.push_back(locus);
                    }
                    self.prime()?;
                }
                lookahead => {
                    self.lookahead = lookahead;
                    return Ok(());
                }
            }
        }
    }

    /// The window-membership test: vacuously true when the window is empty, since the first
    /// admitted locus seeds the window.
    fn in_span(&self, locus: &Locus) -> bool {
        match self.loci.front() {
            // Positions are non-decreasing by input contract.
            Some(head) => locus.pos().saturating_sub(head.pos()) <= self.span,
            None => true,
        }
    }
}

impl<R> fmt::Debug for Window<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("span", &self.span)
            .field("loci", &self.loci)
            .field("lookahead", &self.lookahead)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

/// A builder for a [`Window`].
pub struct Builder {
    span: u64,
    is_valid: Box<dyn Fn(&Locus) -> bool>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            span: DEFAULT_SPAN,
            is_valid: Box::new(|_| true),
        }
    }
}

impl Builder {
    /// Sets the window span, in bases.
    pub fn set_span(mut self, span: u64) -> Self {
        self.span = span;
        self
    }

    /// Sets the admission predicate.
    ///
    /// Loci rejected by the predicate are skipped: they never enter the window, but the stream
    /// still advances past them. The default predicate admits every locus.
    pub fn set_validity<F>(mut self, is_valid: F) -> Self
    where
        F: Fn(&Locus) -> bool + 'static,
    {
        self.is_valid = Box::new(is_valid);
        self
    }

    /// Builds the window, priming the lookahead buffer and admitting the initial loci.
    pub fn build<R>(self, reader: Reader<R>) -> io::Result<Window<R>>
    where
        R: BufRead,
    {
        let mut window = Window {
            reader,
            span: self.span,
            loci: VecDeque::new(),
            lookahead: None,
            ended: false,
            is_valid: self.is_valid,
        };

        window.prime()?;

        if window.is_exhausted() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "no data records in input",
            ));
        }

        window.admit()?;

        Ok(window)
    }
}
