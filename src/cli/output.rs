//! Object output for the CLI

use super::commands::OutputFormat;
use crate::error::{Result, ResultExt};
use serde::Serialize;
use std::io::Write;

/// Writes domain objects to an output stream as they are produced
pub struct Emitter<'w, W: Write> {
    out: &'w mut W,
    format: OutputFormat,
    count: usize,
}

impl<'w, W: Write> Emitter<'w, W> {
    /// Create an emitter over a writer
    pub fn new(out: &'w mut W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            count: 0,
        }
    }

    /// Write one object and flush
    pub fn emit<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => serde_json::to_writer(&mut *self.out, value),
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *self.out, value),
        }
        .context("Failed to write output")?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.count += 1;
        Ok(())
    }

    /// Objects written so far
    pub fn count(&self) -> usize {
        self.count
    }
}
