
use rustc_hash::FxHashSet as HashSet;

use crate::catalog::{AlterationSink, CollaboratorResult};
use crate::data_types::alteration_row::GeneticAlterationRow;
use crate::data_types::canonical_gene::CanonicalGene;
use crate::importer::errors::RowWarning;

/// Hands rows to the sink, keeping only the first row of every gene
#[derive(Debug)]
pub struct AlterationWriter {
    genetic_profile_id: u32,
    imported_genes: HashSet<i64>,
    rows_written: usize
}

impl AlterationWriter {
    pub fn new(genetic_profile_id: u32) -> Self {
        Self {
            genetic_profile_id,
            imported_genes: Default::default(),
            rows_written: 0
        }
    }

    /// True if a row for this gene was already accepted
    pub fn is_imported(&self, entrez_gene_id: i64) -> bool {
        self.imported_genes.contains(&entrez_gene_id)
    }

    /// Stores the values for a gene unless the gene was already stored in this run.
    /// Returns true if the row was accepted.
    /// # Arguments
    /// * `gene` - the resolved gene
    /// * `values` - the live-sample values
    /// * `original` - the identifier as the file gives it, for the duplicate warning
    /// * `sink` - the row destination
    /// * `warnings` - receives the duplicate warning
    /// # Errors
    /// * if the sink fails to accept the row
    pub fn store(
        &mut self, gene: &CanonicalGene, values: Vec<String>, original: Option<&str>,
        sink: &mut dyn AlterationSink, warnings: &mut Vec<RowWarning>
    ) -> CollaboratorResult<bool> {
        let entrez_gene_id = gene.entrez_gene_id();
        if self.is_imported(entrez_gene_id) {
            warnings.push(RowWarning::DuplicateGene {
                symbol: gene.hugo_gene_symbol_all_caps(),
                entrez_gene_id,
                original: original.map(|o| o.to_string())
            });
            return Ok(false);
        }

        sink.add_row(GeneticAlterationRow::new(self.genetic_profile_id, entrez_gene_id, values))?;
        self.imported_genes.insert(entrez_gene_id);
        self.rows_written += 1;
        Ok(true)
    }

    // getters
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
