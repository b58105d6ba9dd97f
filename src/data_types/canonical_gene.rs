
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data_types::import_const::{PHOSPHOPROTEIN_ALIAS, RPPA_PHOSPHO_ALIAS};

/// Molecular type of a catalog gene
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, strum_macros::Display)]
pub enum GeneType {
    #[default]
    #[serde(alias = "protein-coding")]
    #[strum(to_string = "protein-coding")]
    ProteinCoding,
    #[serde(alias = "miRNA")]
    #[strum(to_string = "miRNA")]
    MicroRna,
    #[serde(alias = "phosphoprotein")]
    #[strum(to_string = "phosphoprotein")]
    Phosphoprotein
}

/// A gene as known to the catalog, identified by the Entrez id
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CanonicalGene {
    /// Stable numeric identity; synthesized genes are negative
    entrez_gene_id: i64,
    /// Display symbol
    hugo_gene_symbol: String,
    /// Alternate symbols
    aliases: BTreeSet<String>,
    /// Cytoband, e.g. "17p13.1"
    cytoband: Option<String>,
    /// Molecular type
    gene_type: GeneType
}

impl CanonicalGene {
    /// Constructor
    /// # Arguments
    /// * `entrez_gene_id` - the numeric identity
    /// * `symbol` - the display symbol
    /// * `aliases` - any alternate symbols
    pub fn new(entrez_gene_id: i64, symbol: &str, aliases: &[&str]) -> Self {
        Self {
            entrez_gene_id,
            hugo_gene_symbol: symbol.trim().to_string(),
            aliases: aliases.iter().map(|a| a.trim().to_string()).collect(),
            cytoband: None,
            gene_type: GeneType::ProteinCoding
        }
    }

    /// Builds the derived phospho-protein pseudo-gene for this gene, without an identity yet.
    /// # Arguments
    /// * `residue` - the phosphorylation residue, e.g. "pS473"
    pub fn phospho_variant(&self, residue: &str) -> Self {
        let parent_alias = format!("phospho{}", self.hugo_gene_symbol);
        let mut phospho = Self::new(
            0,
            &phospho_symbol(&self.hugo_gene_symbol, residue),
            &[RPPA_PHOSPHO_ALIAS, PHOSPHOPROTEIN_ALIAS, &parent_alias]
        );
        phospho.gene_type = GeneType::Phosphoprotein;
        phospho.cytoband = self.cytoband.clone();
        phospho
    }

    pub fn with_type(mut self, gene_type: GeneType) -> Self {
        self.gene_type = gene_type;
        self
    }

    pub fn with_cytoband(mut self, cytoband: &str) -> Self {
        self.cytoband = Some(cytoband.to_string());
        self
    }

    pub fn set_entrez_gene_id(&mut self, entrez_gene_id: i64) {
        self.entrez_gene_id = entrez_gene_id;
    }

    pub fn is_micro_rna(&self) -> bool {
        self.gene_type == GeneType::MicroRna
    }

    // getters
    pub fn entrez_gene_id(&self) -> i64 {
        self.entrez_gene_id
    }

    pub fn hugo_gene_symbol(&self) -> &str {
        &self.hugo_gene_symbol
    }

    pub fn hugo_gene_symbol_all_caps(&self) -> String {
        self.hugo_gene_symbol.to_uppercase()
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn cytoband(&self) -> Option<&str> {
        self.cytoband.as_deref()
    }

    pub fn gene_type(&self) -> GeneType {
        self.gene_type
    }
}

/// The derived key for a phospho-protein, e.g. "AKT1_pS473"
pub fn phospho_symbol(symbol: &str, residue: &str) -> String {
    format!("{symbol}_{residue}")
}
