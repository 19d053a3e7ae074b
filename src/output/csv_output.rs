//! CSV output for product records
//!
//! A sink writes the header as soon as it is created, then one row per
//! product, flushing after every row so a crash or a later failure never
//! leaves a half-written record behind.

use crate::model::{Product, CSV_COLUMNS};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Row-at-a-time product writer
pub struct CsvSink<W: Write = File> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    /// Creates (or truncates) the file at `path` and writes the header
    pub fn create(path: &Path) -> Result<Self, csv::Error> {
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer and writes the header
    pub fn from_writer(inner: W) -> Result<Self, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one product row and flushes it
    pub fn write(&mut self, product: &Product) -> Result<(), csv::Error> {
        self.writer.serialize(product)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and closes the sink, returning the row count
    pub fn finish(mut self) -> Result<usize, csv::Error> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}

/// Reads a category CSV back into products
pub fn read_products(path: &Path) -> Result<Vec<Product>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}
