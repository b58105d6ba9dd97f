
/// Errors that stop an import, these result in a failure state
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("input contains no header line")]
    MissingHeader,
    #[error("could not find the Composite.Element.Ref column, which is required for antibody array profiles")]
    MissingCompositeColumn,
    #[error("could not find a Hugo_Symbol or Entrez_Gene_Id column in the header")]
    MissingGeneColumn,
    #[error("could not find any sample columns after the gene identifier columns")]
    NoSampleColumns,
    #[error("no rows were stored ({lines_read} lines read, {rows_skipped} rows skipped)")]
    NothingImported { lines_read: usize, rows_skipped: usize },
    #[error("failed to read line {line_number}: {source}")]
    Io {
        line_number: usize,
        #[source]
        source: std::io::Error
    },
    #[error("collaborator failure at line {line_number}: {cause}")]
    Collaborator {
        line_number: usize,
        cause: Box<dyn std::error::Error>
    }
}

/// Per-row problems; the row (or part of it) is dropped and the import continues
#[derive(thiserror::Error, Clone, Debug, PartialEq, strum_macros::EnumDiscriminants)]
#[strum_discriminants(name(RowWarningKind))]
#[strum_discriminants(derive(Hash, Ord, PartialOrd, strum_macros::Display))]
pub enum RowWarning {
    #[error("ignoring gene id \"{0}\", it is not an integer")]
    InvalidEntrezId(String),
    #[error("could not find gene with id {0}, skipping row")]
    UnknownEntrezId(i64),
    #[error("could not find gene \"{0}\", skipping row")]
    UnknownGene(String),
    #[error("could not find microRNA \"{0}\", skipping row")]
    UnknownMicroRna(String),
    #[error("ignoring gene \"{0}\", it describes several genes or an unknown gene")]
    MultiGeneOrUnknownMarker(String),
    #[error("gene symbol \"{0}\" matches several genes, skipping row")]
    AmbiguousSymbol(String),
    #[error("{}", duplicate_gene_message(.symbol, .entrez_gene_id, .original))]
    DuplicateGene {
        symbol: String,
        entrez_gene_id: i64,
        original: Option<String>
    },
    #[error("antibody reference \"{0}\" is not of the form \"<genes>|<antibody>\", skipping row")]
    MalformedCompositeRef(String),
    #[error("row has no gene identifier, skipping row")]
    MissingIdentifier { antibody_array: bool },
    #[error("row has {found} fields but the header has {expected}, skipping row")]
    ShortRow { found: usize, expected: usize },
    #[error("row has {found} fields but the header has {expected}, extra fields ignored")]
    LongRow { found: usize, expected: usize },
    #[error("could not find gene \"{0}\" of an antibody reference, ignoring it")]
    UnknownRppaGene(String)
}

fn duplicate_gene_message(symbol: &str, entrez_gene_id: &i64, original: &Option<String>) -> String {
    let mut message = format!("gene {symbol} ({entrez_gene_id}) was already imported, only the first row is kept");
    if let Some(orig) = original {
        message.push_str(&format!(" (given in your file as \"{orig}\")"));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        let dup = RowWarning::DuplicateGene {
            symbol: "TP53".to_string(),
            entrez_gene_id: 7157,
            original: Some("tp53".to_string())
        };
        assert!(dup.to_string().contains("given in your file as \"tp53\""));
        let dup = RowWarning::DuplicateGene {
            symbol: "TP53".to_string(),
            entrez_gene_id: 7157,
            original: None
        };
        assert!(!dup.to_string().contains("given in your file"));

        assert_eq!(RowWarningKind::from(&RowWarning::UnknownEntrezId(5)), RowWarningKind::UnknownEntrezId);
        assert_eq!(RowWarningKind::AmbiguousSymbol.to_string(), "AmbiguousSymbol");
    }

    #[test]
    fn test_error_messages() {
        let err = ImportError::NothingImported { lines_read: 3, rows_skipped: 2 };
        assert_eq!(err.to_string(), "no rows were stored (3 lines read, 2 rows skipped)");
        let err = ImportError::Collaborator { line_number: 4, cause: "boom".into() };
        assert_eq!(err.to_string(), "collaborator failure at line 4: boom");
    }
}
