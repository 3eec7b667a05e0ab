use crate::shape_rows::OutputRow;
use std::io::{Result, Write};

/// Tab-separated row writer.
pub struct TsvWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(writer: W) -> Self {
        TsvWriter {
            writer,
            rows_written: 0,
        }
    }

    pub fn write_header(&mut self, headers: &[String]) -> Result<()> {
        writeln!(self.writer, "{}", headers.join("\t"))
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        let mut first = true;
        for value in row.values() {
            if !first {
                self.writer.write_all(b"\t")?;
            }
            self.writer.write_all(value.as_bytes())?;
            first = false;
        }
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
