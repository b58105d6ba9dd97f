
use log::trace;
use serde::Serialize;
use std::io::Write;

use crate::catalog::{AlterationSink, CollaboratorResult};
use crate::data_types::alteration_row::GeneticAlterationRow;

#[derive(Serialize)]
struct AlterationRecord<'a> {
    genetic_profile_id: u32,
    entrez_gene_id: i64,
    values: &'a str
}

/// Writes alteration rows as TSV; in bulk mode rows are held in memory until `flush()`.
pub struct BulkAlterationSink<W: Write> {
    writer: csv::Writer<W>,
    bulk_load: bool,
    pending: Vec<GeneticAlterationRow>,
    rows_written: usize
}

impl<W: Write> BulkAlterationSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_writer(writer),
            bulk_load: false,
            pending: vec![],
            rows_written: 0
        }
    }

    fn write_row(&mut self, row: &GeneticAlterationRow) -> CollaboratorResult<()> {
        let values = row.joined_values();
        self.writer.serialize(AlterationRecord {
            genetic_profile_id: row.genetic_profile_id(),
            entrez_gene_id: row.entrez_gene_id(),
            values: &values
        })?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    /// # Errors
    /// * if the pending rows cannot be written
    pub fn into_inner(mut self) -> Result<W, Box<dyn std::error::Error>> {
        self.flush()?;
        match self.writer.into_inner() {
            Ok(w) => Ok(w),
            Err(e) => Err(Box::new(e.into_error()))
        }
    }

    // getters
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn pending_rows(&self) -> usize {
        self.pending.len()
    }
}

impl<W: Write> AlterationSink for BulkAlterationSink<W> {
    fn add_row(&mut self, row: GeneticAlterationRow) -> CollaboratorResult<()> {
        if self.bulk_load {
            self.pending.push(row);
            Ok(())
        } else {
            self.write_row(&row)
        }
    }

    fn set_bulk_load(&mut self, enabled: bool) {
        self.bulk_load = enabled;
    }

    fn is_bulk_load(&self) -> bool {
        self.bulk_load
    }

    fn flush(&mut self) -> CollaboratorResult<()> {
        let pending = std::mem::take(&mut self.pending);
        trace!("Flushing {} pending alteration rows", pending.len());
        let mut rows = pending.into_iter();
        while let Some(row) = rows.next() {
            if let Err(e) = self.write_row(&row) {
                // the failed row and everything after it stay pending
                self.pending = std::iter::once(row).chain(rows).collect();
                return Err(e);
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
