
use log::debug;

use crate::data_types::genetic_profile::ProfileKind;
use crate::data_types::import_const::{COMPOSITE_ELEMENT_REF, ENTREZ_GENE_ID, HUGO_SYMBOL, NON_SAMPLE_COLUMNS};
use crate::importer::errors::ImportError;

/// Column layout of a matrix, derived once from the header line
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderLayout {
    /// Index of the gene symbol column
    hugo_symbol_index: Option<usize>,
    /// Index of the numeric gene id column
    entrez_gene_id_index: Option<usize>,
    /// Index of the antibody reference column
    composite_element_ref_index: Option<usize>,
    /// First sample column, strictly after every identifier column
    sample_start_index: usize,
    /// Number of fields in the header
    column_count: usize,
    /// Header text of every sample column, in order
    sample_headers: Vec<String>
}

fn find_column(header_fields: &[&str], name: &str) -> Option<usize> {
    header_fields.iter().position(|h| h.eq_ignore_ascii_case(name))
}

impl HeaderLayout {
    /// Classifies the header columns and finds where the samples begin.
    /// # Arguments
    /// * `header_fields` - the tab-split header line
    /// * `profile_kind` - the processing branch, antibody arrays require the composite column
    /// # Errors
    /// * if an antibody array header has no `Composite.Element.Ref` column
    /// * if any other header has neither a `Hugo_Symbol` nor an `Entrez_Gene_Id` column
    /// * if no sample column follows the identifier columns
    pub fn analyze(header_fields: &[&str], profile_kind: ProfileKind) -> Result<Self, ImportError> {
        let trimmed: Vec<&str> = header_fields.iter().map(|h| h.trim()).collect();

        let hugo_symbol_index = find_column(&trimmed, HUGO_SYMBOL);
        let entrez_gene_id_index = find_column(&trimmed, ENTREZ_GENE_ID);
        let composite_element_ref_index = find_column(&trimmed, COMPOSITE_ELEMENT_REF);

        if profile_kind == ProfileKind::AntibodyArray {
            if composite_element_ref_index.is_none() {
                return Err(ImportError::MissingCompositeColumn);
            }
        } else if hugo_symbol_index.is_none() && entrez_gene_id_index.is_none() {
            return Err(ImportError::MissingGeneColumn);
        }

        // samples start after the last identifier column, skipping any other known annotation column
        let first_candidate = [hugo_symbol_index, entrez_gene_id_index, composite_element_ref_index].iter()
            .flatten()
            .max()
            .map(|&i| i + 1)
            .unwrap_or(0);
        let sample_start_index = (first_candidate..trimmed.len())
            .find(|&i| !NON_SAMPLE_COLUMNS.iter().any(|name| trimmed[i].eq_ignore_ascii_case(name)))
            .ok_or(ImportError::NoSampleColumns)?;

        let sample_headers: Vec<String> = trimmed[sample_start_index..].iter()
            .map(|h| h.to_string())
            .collect();
        debug!("Header layout: symbol={hugo_symbol_index:?}, id={entrez_gene_id_index:?}, composite={composite_element_ref_index:?}, samples start at {sample_start_index}");

        Ok(Self {
            hugo_symbol_index,
            entrez_gene_id_index,
            composite_element_ref_index,
            sample_start_index,
            column_count: trimmed.len(),
            sample_headers
        })
    }

    // getters
    pub fn hugo_symbol_index(&self) -> Option<usize> {
        self.hugo_symbol_index
    }

    pub fn entrez_gene_id_index(&self) -> Option<usize> {
        self.entrez_gene_id_index
    }

    pub fn composite_element_ref_index(&self) -> Option<usize> {
        self.composite_element_ref_index
    }

    pub fn sample_start_index(&self) -> usize {
        self.sample_start_index
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn sample_headers(&self) -> &[String] {
        &self.sample_headers
    }
}
