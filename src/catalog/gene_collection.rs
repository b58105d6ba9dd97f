
use log::{debug, warn};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use simple_error::bail;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::{Read, Write};
use std::path::Path;

use crate::catalog::{CollaboratorResult, GeneCatalog};
use crate::data_types::canonical_gene::{CanonicalGene, GeneType};
use crate::util::file_io::{create_text_writer, open_text_reader};

/// Separator for the alias column of the gene TSV
const ALIAS_SEPARATOR: char = '|';

/// One line of the gene catalog TSV
#[derive(Debug, Deserialize, Serialize)]
struct GeneRecord {
    entrez_gene_id: i64,
    hugo_gene_symbol: String,
    #[serde(default)]
    gene_type: GeneType,
    #[serde(default)]
    cytoband: Option<String>,
    #[serde(default)]
    aliases: String
}

/// In-memory gene catalog, symbol lookups are case-insensitive
#[derive(Clone, Debug, Default)]
pub struct GeneCollection {
    /// All genes keyed by their numeric id
    genes: BTreeMap<i64, CanonicalGene>,
    /// Upper-case primary symbol to gene id
    symbol_index: HashMap<String, i64>,
    /// Upper-case alias to every gene id carrying it
    alias_index: HashMap<String, Vec<i64>>,
    /// Next identity handed to a synthesized gene, always negative
    next_synthetic_id: i64
}

impl GeneCollection {
    /// Creates a catalog from a list of genes
    /// # Errors
    /// * if two genes share a numeric id
    pub fn new(genes: Vec<CanonicalGene>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut collection = Self {
            next_synthetic_id: -1,
            ..Default::default()
        };
        for gene in genes.into_iter() {
            collection.insert(gene)?;
        }
        Ok(collection)
    }

    /// Loads the catalog from a TSV file (optionally gzipped), mostly a wrapper for `from_reader(...)`.
    /// # Arguments
    /// * `filename` - TSV with `entrez_gene_id`, `hugo_gene_symbol`, `gene_type`, `cytoband`, and `aliases` columns
    /// # Errors
    /// * if the file cannot be opened
    /// * if any record fails to parse or a numeric id is duplicated
    pub fn load_tsv(filename: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let reader = open_text_reader(filename)?;
        Self::from_reader(reader)
    }

    /// Loads the catalog from any reader providing the TSV content.
    /// # Errors
    /// * if any record fails to parse or a numeric id is duplicated
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Box<dyn std::error::Error>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let mut genes = vec![];
        for result in csv_reader.deserialize() {
            let record: GeneRecord = result?;
            let aliases: Vec<&str> = record.aliases.split(ALIAS_SEPARATOR)
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .collect();
            let mut gene = CanonicalGene::new(record.entrez_gene_id, &record.hugo_gene_symbol, &aliases)
                .with_type(record.gene_type);
            if let Some(cytoband) = record.cytoband.as_deref() {
                if !cytoband.is_empty() {
                    gene = gene.with_cytoband(cytoband);
                }
            }
            genes.push(gene);
        }
        debug!("Loaded {} gene records", genes.len());
        Self::new(genes)
    }

    /// Saves the catalog, synthesized genes included, to a TSV file.
    /// # Errors
    /// * if the file cannot be created or written to
    pub fn save_tsv(&self, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let writer = create_text_writer(filename)?;
        self.to_writer(writer)
    }

    /// Writes the catalog as TSV to any writer.
    /// # Errors
    /// * if serialization or writing fails
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), Box<dyn std::error::Error>> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        for gene in self.genes.values() {
            let aliases: Vec<&str> = gene.aliases().iter().map(|a| a.as_str()).collect();
            csv_writer.serialize(GeneRecord {
                entrez_gene_id: gene.entrez_gene_id(),
                hugo_gene_symbol: gene.hugo_gene_symbol().to_string(),
                gene_type: gene.gene_type(),
                cytoband: gene.cytoband().map(|c| c.to_string()),
                aliases: aliases.join(&ALIAS_SEPARATOR.to_string())
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Adds a gene to every index.
    /// # Errors
    /// * if the numeric id is already taken
    fn insert(&mut self, gene: CanonicalGene) -> Result<(), Box<dyn std::error::Error>> {
        let entrez_gene_id = gene.entrez_gene_id();
        let symbol = gene.hugo_gene_symbol_all_caps();
        let aliases: Vec<String> = gene.aliases().iter().map(|a| a.to_uppercase()).collect();
        match self.genes.entry(entrez_gene_id) {
            Entry::Vacant(e) => {
                e.insert(gene);
            },
            Entry::Occupied(e) => {
                bail!("Found duplicate gene id: {}", e.key());
            }
        };

        match self.symbol_index.get(&symbol) {
            Some(existing) => {
                warn!("Gene symbol {symbol} is used by both {existing} and {entrez_gene_id}, keeping {existing} for symbol lookups");
            },
            None => {
                self.symbol_index.insert(symbol, entrez_gene_id);
            }
        };
        for alias in aliases.into_iter() {
            self.alias_index.entry(alias).or_default().push(entrez_gene_id);
        }
        if entrez_gene_id <= self.next_synthetic_id {
            self.next_synthetic_id = entrez_gene_id - 1;
        }
        Ok(())
    }

    /// Counts the genes of each molecular type
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = Default::default();
        for gene in self.genes.values() {
            *counts.entry(gene.gene_type().to_string()).or_insert(0) += 1;
        }
        counts
    }

    // getters
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &BTreeMap<i64, CanonicalGene> {
        &self.genes
    }
}

impl GeneCatalog for GeneCollection {
    fn gene_by_entrez_id(&self, entrez_gene_id: i64) -> Option<CanonicalGene> {
        self.genes.get(&entrez_gene_id).cloned()
    }

    fn genes_by_symbol(&self, symbol: &str) -> Vec<CanonicalGene> {
        // a primary symbol always wins over aliases
        if let Some(gene) = self.gene_by_exact_symbol(symbol) {
            return vec![gene];
        }
        match self.alias_index.get(&symbol.trim().to_uppercase()) {
            Some(ids) => ids.iter()
                .filter_map(|id| self.genes.get(id).cloned())
                .collect(),
            None => vec![]
        }
    }

    fn non_ambiguous_gene(&self, symbol: &str) -> Option<CanonicalGene> {
        if let Ok(entrez_gene_id) = symbol.trim().parse::<i64>() {
            return self.gene_by_entrez_id(entrez_gene_id);
        }
        let mut candidates = self.genes_by_symbol(symbol);
        match candidates.len() {
            1 => candidates.pop(),
            0 => None,
            n => {
                debug!("Alias {symbol} is ambiguous across {n} genes");
                None
            }
        }
    }

    fn gene_by_exact_symbol(&self, symbol: &str) -> Option<CanonicalGene> {
        self.symbol_index.get(&symbol.trim().to_uppercase())
            .and_then(|id| self.genes.get(id))
            .cloned()
    }

    fn add_gene(&mut self, mut gene: CanonicalGene) -> CollaboratorResult<CanonicalGene> {
        if self.gene_by_exact_symbol(gene.hugo_gene_symbol()).is_some() {
            bail!("Gene symbol {} is already in the catalog", gene.hugo_gene_symbol());
        }
        if gene.entrez_gene_id() == 0 {
            gene.set_entrez_gene_id(self.next_synthetic_id.min(-1));
        }
        debug!("Adding gene {} ({})", gene.hugo_gene_symbol(), gene.entrez_gene_id());
        self.insert(gene.clone())?;
        Ok(gene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_TSV: &str = "entrez_gene_id\thugo_gene_symbol\tgene_type\tcytoband\taliases
207\tAKT1\tProteinCoding\t14q32.33\tPKB|RAC
208\tAKT2\tProteinCoding\t19q13.2\tPKBB|RAC
7157\tTP53\tProteinCoding\t17p13.1\tP53
406991\tMIR21\tmiRNA\t17q23.1\thsa-mir-21
";

    pub fn load_test_catalog() -> GeneCollection {
        GeneCollection::from_reader(CATALOG_TSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_catalog() {
        let catalog = load_test_catalog();
        assert_eq!(catalog.len(), 4);
        let akt1 = catalog.gene_by_entrez_id(207).unwrap();
        assert_eq!(akt1.hugo_gene_symbol(), "AKT1");
        assert_eq!(akt1.cytoband(), Some("14q32.33"));
        assert_eq!(akt1.aliases().len(), 2);
        assert!(catalog.gene_by_entrez_id(406991).unwrap().is_micro_rna());
        assert_eq!(catalog.type_counts().get("miRNA"), Some(&1));
    }

    #[test]
    fn test_duplicate_id() {
        let genes = vec![
            CanonicalGene::new(1, "A", &[]),
            CanonicalGene::new(1, "B", &[])
        ];
        assert!(GeneCollection::new(genes).is_err());
    }

    #[test]
    fn test_symbol_lookups() {
        let catalog = load_test_catalog();

        // case-insensitive primary symbol
        let genes = catalog.genes_by_symbol("tp53");
        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].entrez_gene_id(), 7157);

        // unique alias resolves, shared alias is ambiguous
        assert_eq!(catalog.genes_by_symbol("PKB").len(), 1);
        assert_eq!(catalog.genes_by_symbol("RAC").len(), 2);
        assert!(catalog.non_ambiguous_gene("RAC").is_none());
        assert_eq!(catalog.non_ambiguous_gene("PKBB").unwrap().entrez_gene_id(), 208);
        assert_eq!(catalog.non_ambiguous_gene("7157").unwrap().hugo_gene_symbol(), "TP53");
        assert!(catalog.genes_by_symbol("NOPE").is_empty());

        // exact lookups ignore aliases
        assert!(catalog.gene_by_exact_symbol("PKB").is_none());
        assert!(catalog.gene_by_exact_symbol("akt2").is_some());
    }

    #[test]
    fn test_add_gene() {
        let mut catalog = load_test_catalog();
        let akt1 = catalog.gene_by_entrez_id(207).unwrap();

        let first = catalog.add_gene(akt1.phospho_variant("pS473")).unwrap();
        assert_eq!(first.entrez_gene_id(), -1);
        let second = catalog.add_gene(akt1.phospho_variant("pT308")).unwrap();
        assert_eq!(second.entrez_gene_id(), -2);
        assert_eq!(catalog.gene_by_exact_symbol("AKT1_pS473").unwrap(), first);

        // the same derived symbol cannot be added twice
        assert!(catalog.add_gene(akt1.phospho_variant("pS473")).is_err());
    }

    #[test]
    fn test_save_reload() {
        let mut catalog = load_test_catalog();
        let akt1 = catalog.gene_by_entrez_id(207).unwrap();
        catalog.add_gene(akt1.phospho_variant("pS473")).unwrap();

        let mut buffer: Vec<u8> = vec![];
        catalog.to_writer(&mut buffer).unwrap();
        let reloaded = GeneCollection::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(reloaded.len(), 5);
        let phospho = reloaded.gene_by_exact_symbol("AKT1_pS473").unwrap();
        assert_eq!(phospho.gene_type(), GeneType::Phosphoprotein);
        assert_eq!(phospho.entrez_gene_id(), -1);

        // new synthetic ids continue below the reloaded ones
        let mut reloaded = reloaded;
        let next = reloaded.add_gene(akt1.phospho_variant("pT308")).unwrap();
        assert_eq!(next.entrez_gene_id(), -2);
    }

    #[test]
    fn test_save_tsv_file() {
        let catalog = load_test_catalog();
        let tmp_dir = tempfile::tempdir().unwrap();
        let filename = tmp_dir.path().join("genes.tsv.gz");
        catalog.save_tsv(&filename).unwrap();
        let reloaded = GeneCollection::load_tsv(&filename).unwrap();
        assert_eq!(reloaded.genes(), catalog.genes());
    }
}
