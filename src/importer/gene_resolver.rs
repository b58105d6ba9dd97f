
use log::{debug, trace};

use crate::catalog::{CollaboratorResult, GeneCatalog};
use crate::data_types::canonical_gene::{phospho_symbol, CanonicalGene};
use crate::data_types::genetic_profile::ProfileKind;
use crate::data_types::import_const::{
    ENTREZ_ID_REGEX, MICRO_RNA_MARKER, MULTI_GENE_SEPARATOR, PHOSPHO_RESIDUE_REGEX, UNKNOWN_GENE_MARKER
};
use crate::importer::errors::RowWarning;
use crate::importer::header::HeaderLayout;

/// Separates alternative symbols, and the gene list from the antibody id in composite references
const ALTERNATIVE_SEPARATOR: char = '|';

/// The identifier cells of one data row, empty cells are treated as absent
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RowIdentifiers<'a> {
    pub hugo_symbol: Option<&'a str>,
    pub entrez_gene_id: Option<&'a str>,
    pub composite_element_ref: Option<&'a str>
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl<'a> RowIdentifiers<'a> {
    /// Pulls the identifier cells out of a split row.
    /// # Arguments
    /// * `layout` - where the identifier columns are
    /// * `fields` - the tab-split row
    pub fn from_fields(layout: &HeaderLayout, fields: &[&'a str]) -> Self {
        let cell = |index: Option<usize>| non_empty(index.and_then(|i| fields.get(i).copied()));
        Self {
            hugo_symbol: cell(layout.hugo_symbol_index()),
            entrez_gene_id: cell(layout.entrez_gene_id_index()),
            composite_element_ref: cell(layout.composite_element_ref_index())
        }
    }

    /// The identifier as the file gives it, used for markers and messages.
    /// Antibody arrays use the composite reference, everything else the symbol.
    pub fn gene_symbol(&self, profile_kind: ProfileKind) -> Option<&'a str> {
        if profile_kind == ProfileKind::AntibodyArray {
            self.composite_element_ref
        } else {
            self.hugo_symbol
        }
    }
}

/// Keeps the first of several `|`-separated symbols; a leading separator is left alone
pub fn first_alternative(symbol: &str) -> &str {
    match symbol.find(ALTERNATIVE_SEPARATOR) {
        Some(ix) if ix > 0 => &symbol[..ix],
        _ => symbol
    }
}

/// Result of resolving one row to catalog genes
#[derive(Clone, Debug, PartialEq)]
pub enum GeneResolution {
    /// Exactly one gene
    ResolvedOne(CanonicalGene),
    /// Several genes, e.g. an ambiguous alias or a multi-gene antibody
    ResolvedMany(Vec<CanonicalGene>),
    /// A well-formed identifier with no matching gene
    Unresolved(String),
    /// The row cannot be resolved at all
    Rejected(RowWarning)
}

impl GeneResolution {
    fn from_genes(mut genes: Vec<CanonicalGene>, identifier: &str) -> Self {
        match genes.len() {
            0 => GeneResolution::Unresolved(identifier.to_string()),
            1 => GeneResolution::ResolvedOne(genes.remove(0)),
            _ => GeneResolution::ResolvedMany(genes)
        }
    }
}

/// The warning for an identifier with no matching gene; micro-RNA ids are reported separately
pub fn unresolved_warning(identifier: &str) -> RowWarning {
    if identifier.to_lowercase().contains(MICRO_RNA_MARKER) {
        RowWarning::UnknownMicroRna(identifier.to_string())
    } else {
        RowWarning::UnknownGene(identifier.to_string())
    }
}

/// Resolves row identifiers to canonical genes, synthesizing phospho-proteins for antibody arrays
#[derive(Debug)]
pub struct GeneResolver {
    profile_kind: ProfileKind,
    phospho_genes_created: usize
}

impl GeneResolver {
    pub fn new(profile_kind: ProfileKind) -> Self {
        Self {
            profile_kind,
            phospho_genes_created: 0
        }
    }

    /// Resolves one row.
    /// # Arguments
    /// * `ids` - the identifier cells of the row
    /// * `catalog` - gene lookups, and the destination of synthesized phospho-proteins
    /// * `warnings` - receives warnings that do not reject the row, e.g. an unknown gene inside an antibody reference
    /// # Errors
    /// * if the catalog fails to add a synthesized gene
    pub fn resolve(&mut self, ids: &RowIdentifiers, catalog: &mut dyn GeneCatalog, warnings: &mut Vec<RowWarning>) -> CollaboratorResult<GeneResolution> {
        // a malformed numeric id rejects the row even if a symbol is present
        if let Some(entrez) = ids.entrez_gene_id {
            if !ENTREZ_ID_REGEX.is_match(entrez) {
                return Ok(GeneResolution::Rejected(RowWarning::InvalidEntrezId(entrez.to_string())));
            }
        }

        let gene_symbol = ids.gene_symbol(self.profile_kind);
        if gene_symbol.is_none() && (ids.entrez_gene_id.is_none() || self.profile_kind == ProfileKind::AntibodyArray) {
            return Ok(GeneResolution::Rejected(RowWarning::MissingIdentifier {
                antibody_array: self.profile_kind == ProfileKind::AntibodyArray
            }));
        }

        if let Some(symbol) = gene_symbol {
            if symbol.contains(MULTI_GENE_SEPARATOR) || symbol.contains(UNKNOWN_GENE_MARKER) {
                return Ok(GeneResolution::Rejected(RowWarning::MultiGeneOrUnknownMarker(symbol.to_string())));
            }
        }

        if self.profile_kind == ProfileKind::AntibodyArray {
            // checked above, the composite reference is present
            let composite = gene_symbol.unwrap_or_default();
            return self.resolve_antibody(composite, catalog, warnings);
        }

        if let Some(entrez) = ids.entrez_gene_id {
            let entrez_gene_id: i64 = match entrez.parse() {
                Ok(id) => id,
                // out of range for the numeric id
                Err(_) => return Ok(GeneResolution::Rejected(RowWarning::InvalidEntrezId(entrez.to_string())))
            };
            return Ok(match catalog.gene_by_entrez_id(entrez_gene_id) {
                Some(gene) => GeneResolution::ResolvedOne(gene),
                None => GeneResolution::Rejected(RowWarning::UnknownEntrezId(entrez_gene_id))
            });
        }

        let symbol = first_alternative(gene_symbol.unwrap_or_default());
        let genes = catalog.genes_by_symbol(symbol);
        trace!("Symbol {symbol} matched {} genes", genes.len());
        Ok(GeneResolution::from_genes(genes, symbol))
    }

    /// Resolves a composite reference of the form `<symbols space-separated>|<antibody id>`
    fn resolve_antibody(&mut self, composite: &str, catalog: &mut dyn GeneCatalog, warnings: &mut Vec<RowWarning>) -> CollaboratorResult<GeneResolution> {
        let (symbols, array_id) = match composite.split_once(ALTERNATIVE_SEPARATOR) {
            Some(parts) => parts,
            None => return Ok(GeneResolution::Rejected(RowWarning::MalformedCompositeRef(composite.to_string())))
        };

        let mut genes = vec![];
        for symbol in symbols.split(' ').filter(|s| !s.is_empty()) {
            match catalog.non_ambiguous_gene(symbol) {
                Some(gene) => genes.push(gene),
                None => warnings.push(RowWarning::UnknownRppaGene(symbol.to_string()))
            };
        }

        if let Some(captures) = PHOSPHO_RESIDUE_REGEX.captures(array_id) {
            let residue = &captures["residue"];
            let mut phospho_genes = Vec::with_capacity(genes.len());
            for gene in genes.iter() {
                phospho_genes.push(self.get_or_create_phospho(gene, residue, catalog)?);
            }
            genes = phospho_genes;
        }

        Ok(GeneResolution::from_genes(genes, composite))
    }

    /// Returns the phospho-protein for a gene and residue, adding it to the catalog if it is new
    fn get_or_create_phospho(&mut self, gene: &CanonicalGene, residue: &str, catalog: &mut dyn GeneCatalog) -> CollaboratorResult<CanonicalGene> {
        let symbol = phospho_symbol(gene.hugo_gene_symbol(), residue);
        if let Some(existing) = catalog.gene_by_exact_symbol(&symbol) {
            return Ok(existing);
        }
        let added = catalog.add_gene(gene.phospho_variant(residue))?;
        debug!("Created phospho-protein {} ({})", added.hugo_gene_symbol(), added.entrez_gene_id());
        self.phospho_genes_created += 1;
        Ok(added)
    }

    // getters
    pub fn profile_kind(&self) -> ProfileKind {
        self.profile_kind
    }

    pub fn phospho_genes_created(&self) -> usize {
        self.phospho_genes_created
    }
}
