
use lazy_static::lazy_static;
use regex::Regex;

// header names to prevent dev typos, these are matched case-insensitively
pub const HUGO_SYMBOL: &str = "Hugo_Symbol";
pub const ENTREZ_GENE_ID: &str = "Entrez_Gene_Id";
pub const COMPOSITE_ELEMENT_REF: &str = "Composite.Element.Ref";
pub const LEGACY_GENE_SYMBOL: &str = "Gene Symbol";
pub const LEGACY_LOCUS_ID: &str = "Locus ID";
pub const LEGACY_CYTOBAND: &str = "Cytoband";

/// Every header name that can never be the start of the sample region
pub const NON_SAMPLE_COLUMNS: [&str; 6] = [
    LEGACY_GENE_SYMBOL, HUGO_SYMBOL, ENTREZ_GENE_ID, LEGACY_LOCUS_ID, LEGACY_CYTOBAND, COMPOSITE_ELEMENT_REF
];

// discretized CNA codes as they are written in the data files
pub const AMPLIFICATION: &str = "2";
pub const GAIN: &str = "1";
pub const ZERO: &str = "0";
pub const HEMIZYGOUS_DELETION: &str = "-1";
pub const HOMOZYGOUS_DELETION: &str = "-2";
/// Legacy code that is folded into homozygous deletion
pub const PARTIAL_DELETION: &str = "-1.5";

/// Identifier describing several genes at once
pub const MULTI_GENE_SEPARATOR: &str = "///";
/// Identifier describing an unknown gene
pub const UNKNOWN_GENE_MARKER: &str = "---";
/// Lower-case marker for micro-RNA identifiers
pub const MICRO_RNA_MARKER: &str = "-mir-";

// aliases attached to every synthesized phospho-protein
pub const RPPA_PHOSPHO_ALIAS: &str = "rppa-phospho";
pub const PHOSPHOPROTEIN_ALIAS: &str = "phosphoprotein";

lazy_static! {
    /// Integer pattern for the numeric gene id column
    pub static ref ENTREZ_ID_REGEX: Regex = Regex::new(r"^-?[0-9]+$").unwrap();

    /// Phosphorylation residue inside an antibody array id, e.g. "pS473" from "Akt_pS473"
    pub static ref PHOSPHO_RESIDUE_REGEX: Regex = Regex::new(r"(?<residue>p[STY][0-9]+)").unwrap();
}
