
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::io::BufRead;

use crate::catalog::{AlterationSink, EventStore, GeneCatalog, SampleRegistry};
use crate::data_types::genetic_profile::{GeneticProfile, ProfileKind};
use crate::importer::cna_events::CnaEventDeduplicator;
use crate::importer::errors::{ImportError, RowWarningKind};
use crate::importer::header::HeaderLayout;
use crate::importer::row_processor::{RowOutcome, RowProcessor, RowReport};
use crate::importer::samples::SampleColumnMap;

/// Lines between progress messages
const PROGRESS_INTERVAL: usize = 10_000;

/// Everything the importer reads from or writes to, borrowed for the duration of one import
pub struct Collaborators<'c> {
    pub genes: &'c mut dyn GeneCatalog,
    pub samples: &'c mut dyn SampleRegistry,
    pub events: &'c mut dyn EventStore,
    pub sink: &'c mut dyn AlterationSink
}

/// Counters for a finished (or in-progress) import
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImportSummary {
    /// Processing branch that was used
    profile_kind: Option<ProfileKind>,
    /// Rows accepted by the writer for at least one gene
    rows_stored: usize,
    /// Gene rows handed to the sink, several per row for duplicated rows
    genes_stored: usize,
    /// Lines after the header, comments and blanks included
    lines_read: usize,
    /// Data lines with nothing stored
    rows_skipped: usize,
    /// Data lines excluded by the target line filter
    rows_not_targeted: usize,
    /// Tally of every warning by kind
    warning_counts: BTreeMap<RowWarningKind, usize>,
    live_samples: usize,
    filtered_samples: usize,
    registered_samples: usize,
    new_cna_events: usize,
    reused_cna_events: usize,
    phospho_genes_created: usize
}

impl ImportSummary {
    /// Adds one line's outcome, logging each of its warnings
    fn record(&mut self, line_number: usize, report: &RowReport) {
        self.lines_read += 1;
        match report.outcome {
            RowOutcome::Ignored => {},
            RowOutcome::Stored { genes } => {
                self.rows_stored += 1;
                self.genes_stored += genes;
            },
            RowOutcome::Skipped => self.rows_skipped += 1,
            RowOutcome::NotTargeted => self.rows_not_targeted += 1
        };
        for warning in report.warnings.iter() {
            warn!("Line {line_number}: {warning}");
            *self.warning_counts.entry(RowWarningKind::from(warning)).or_insert(0) += 1;
        }
    }

    /// Copies the final counters out of the row processor
    fn finalize(&mut self, processor: &RowProcessor) {
        let samples = processor.samples();
        self.live_samples = samples.live_samples().len();
        self.filtered_samples = samples.filtered_count();
        self.registered_samples = samples.registered_samples();
        if let Some(events) = processor.events() {
            self.new_cna_events = events.new_events();
            self.reused_cna_events = events.reused_events();
        }
        self.phospho_genes_created = processor.resolver().phospho_genes_created();
    }

    /// Number of warnings of one kind
    pub fn warnings_of(&self, kind: RowWarningKind) -> usize {
        self.warning_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of warnings
    pub fn total_warnings(&self) -> usize {
        self.warning_counts.values().sum()
    }

    // getters
    pub fn profile_kind(&self) -> Option<ProfileKind> {
        self.profile_kind
    }

    pub fn rows_stored(&self) -> usize {
        self.rows_stored
    }

    pub fn genes_stored(&self) -> usize {
        self.genes_stored
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    pub fn rows_not_targeted(&self) -> usize {
        self.rows_not_targeted
    }

    pub fn warning_counts(&self) -> &BTreeMap<RowWarningKind, usize> {
        &self.warning_counts
    }

    pub fn live_samples(&self) -> usize {
        self.live_samples
    }

    pub fn filtered_samples(&self) -> usize {
        self.filtered_samples
    }

    pub fn registered_samples(&self) -> usize {
        self.registered_samples
    }

    pub fn new_cna_events(&self) -> usize {
        self.new_cna_events
    }

    pub fn reused_cna_events(&self) -> usize {
        self.reused_cna_events
    }

    pub fn phospho_genes_created(&self) -> usize {
        self.phospho_genes_created
    }
}

/// Imports one tab-delimited matrix into one genetic profile
#[derive(Clone, Debug)]
pub struct TabDelimImporter {
    profile: GeneticProfile,
    target_line: Option<String>
}

impl TabDelimImporter {
    pub fn new(profile: GeneticProfile) -> Self {
        Self {
            profile,
            target_line: None
        }
    }

    /// Only store rows whose first field equals `target_line`, this is deprecated
    pub fn with_target_line(mut self, target_line: Option<String>) -> Self {
        self.target_line = target_line;
        self
    }

    /// Runs the import over a stream.
    /// # Arguments
    /// * `reader` - the matrix, one line per gene or antibody
    /// * `collaborators` - gene catalog, sample registry, event store, and sink
    /// # Errors
    /// * if the header is missing or lacks required columns
    /// * if reading the stream fails or any collaborator fails, rows handed to the sink before this are flushed
    /// * if no row at all was stored
    pub fn import<R: BufRead>(&self, mut reader: R, collaborators: &mut Collaborators) -> Result<ImportSummary, ImportError> {
        let mut buffer = String::new();
        let mut line_number: usize = 0;

        // the header is the first line that is neither blank nor a comment
        let header_line = loop {
            buffer.clear();
            let bytes_read = reader.read_line(&mut buffer)
                .map_err(|source| ImportError::Io { line_number: line_number + 1, source })?;
            if bytes_read == 0 {
                return Err(ImportError::MissingHeader);
            }
            line_number += 1;
            let line = buffer.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() && !line.starts_with('#') {
                break line.to_string();
            }
        };

        let header_fields: Vec<&str> = header_line.split('\t').collect();
        let profile_kind = self.profile.profile_kind(&header_fields);
        let layout = HeaderLayout::analyze(&header_fields, profile_kind)?;
        info!(
            "Importing {} as a {profile_kind} profile with {} sample columns",
            self.profile.stable_id(), layout.sample_headers().len()
        );

        let samples = SampleColumnMap::resolve(&self.profile, layout.sample_headers(), &mut *collaborators.samples)
            .map_err(|cause| ImportError::Collaborator { line_number, cause })?;

        let events = if profile_kind == ProfileKind::DiscretizedCna {
            let dedup = CnaEventDeduplicator::seed(&*collaborators.events)
                .map_err(|cause| ImportError::Collaborator { line_number, cause })?;
            collaborators.sink.set_bulk_load(true);
            Some(dedup)
        } else {
            None
        };
        debug!("Bulk loading: {}", collaborators.sink.is_bulk_load());

        let mut processor = RowProcessor::new(
            self.profile.genetic_profile_id(), profile_kind, layout, samples, events, self.target_line.clone()
        );
        let mut summary = ImportSummary {
            profile_kind: Some(profile_kind),
            ..Default::default()
        };

        loop {
            buffer.clear();
            let bytes_read = match reader.read_line(&mut buffer) {
                Ok(b) => b,
                Err(source) => {
                    flush_after_fault(collaborators);
                    return Err(ImportError::Io { line_number: line_number + 1, source });
                }
            };
            if bytes_read == 0 {
                break;
            }
            line_number += 1;

            let report = match processor.process_line(&buffer, collaborators) {
                Ok(r) => r,
                Err(cause) => {
                    flush_after_fault(collaborators);
                    return Err(ImportError::Collaborator { line_number, cause });
                }
            };
            summary.record(line_number, &report);

            if summary.lines_read % PROGRESS_INTERVAL == 0 {
                info!("Processed {} lines, {} rows stored", summary.lines_read, summary.rows_stored);
            }
        }

        collaborators.sink.flush()
            .map_err(|cause| ImportError::Collaborator { line_number, cause })?;
        summary.finalize(&processor);

        if summary.rows_stored == 0 {
            return Err(ImportError::NothingImported {
                lines_read: summary.lines_read,
                rows_skipped: summary.rows_skipped
            });
        }
        info!(
            "Stored {} rows ({} genes) from {} lines, skipped {} rows with {} warnings",
            summary.rows_stored, summary.genes_stored, summary.lines_read, summary.rows_skipped, summary.total_warnings()
        );
        Ok(summary)
    }

    // getters
    pub fn profile(&self) -> &GeneticProfile {
        &self.profile
    }

    pub fn target_line(&self) -> Option<&str> {
        self.target_line.as_deref()
    }
}

/// Rows already handed over remain stored, the original fault is what gets reported
fn flush_after_fault(collaborators: &mut Collaborators) {
    if let Err(e) = collaborators.sink.flush() {
        error!("Failed to flush stored rows after an import fault: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::catalog::CollaboratorResult;
    use crate::catalog::alteration_sink::BulkAlterationSink;
    use crate::catalog::event_database::CnaEventDatabase;
    use crate::catalog::gene_collection::GeneCollection;
    use crate::catalog::sample_database::SampleDatabase;
    use crate::data_types::alteration_row::GeneticAlterationRow;
    use crate::data_types::canonical_gene::{CanonicalGene, GeneType};
    use crate::data_types::genetic_profile::GeneticAlterationType;

    /// Keeps rows in memory so tests can inspect them
    #[derive(Default)]
    struct MemorySink {
        bulk_load: bool,
        pending: Vec<GeneticAlterationRow>,
        rows: Vec<GeneticAlterationRow>,
        flushes: usize,
        fail_after: Option<usize>
    }

    impl AlterationSink for MemorySink {
        fn add_row(&mut self, row: GeneticAlterationRow) -> CollaboratorResult<()> {
            if let Some(limit) = self.fail_after {
                if self.pending.len() + self.rows.len() >= limit {
                    return Err("sink is full".into());
                }
            }
            if self.bulk_load {
                self.pending.push(row);
            } else {
                self.rows.push(row);
            }
            Ok(())
        }

        fn set_bulk_load(&mut self, enabled: bool) {
            self.bulk_load = enabled;
        }

        fn is_bulk_load(&self) -> bool {
            self.bulk_load
        }

        fn flush(&mut self) -> CollaboratorResult<()> {
            self.rows.append(&mut self.pending);
            self.flushes += 1;
            Ok(())
        }
    }

    impl MemorySink {
        fn row_for(&self, entrez_gene_id: i64) -> Option<&GeneticAlterationRow> {
            self.rows.iter().find(|r| r.entrez_gene_id() == entrez_gene_id)
        }
    }

    struct Fixture {
        genes: GeneCollection,
        samples: SampleDatabase,
        events: CnaEventDatabase,
        sink: MemorySink
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                genes: GeneCollection::new(vec![
                    CanonicalGene::new(207, "AKT1", &["RAC"]).with_cytoband("14q32.33"),
                    CanonicalGene::new(208, "AKT2", &["RAC"]),
                    CanonicalGene::new(672, "BRCA1", &[]),
                    CanonicalGene::new(7157, "TP53", &["P53"]),
                    CanonicalGene::new(406991, "MIR21", &[]).with_type(GeneType::MicroRna)
                ]).unwrap(),
                samples: SampleDatabase::new(),
                events: CnaEventDatabase::new(),
                sink: MemorySink::default()
            }
        }

        fn import(&mut self, profile: GeneticProfile, target_line: Option<&str>, content: &str) -> Result<ImportSummary, ImportError> {
            let mut collaborators = Collaborators {
                genes: &mut self.genes,
                samples: &mut self.samples,
                events: &mut self.events,
                sink: &mut self.sink
            };
            TabDelimImporter::new(profile)
                .with_target_line(target_line.map(|t| t.to_string()))
                .import(Cursor::new(content.as_bytes()), &mut collaborators)
        }
    }

    fn values(row: &GeneticAlterationRow) -> Vec<&str> {
        row.values().iter().map(|v| v.as_str()).collect()
    }

    fn mrna_profile() -> GeneticProfile {
        GeneticProfile::new(5, "study_mrna", 1, GeneticAlterationType::MrnaExpression, false)
    }

    fn cna_profile() -> GeneticProfile {
        GeneticProfile::new(4, "study_gistic", 1, GeneticAlterationType::CopyNumberAlteration, true)
    }

    fn rppa_profile() -> GeneticProfile {
        GeneticProfile::new(6, "study_rppa", 1, GeneticAlterationType::ProteinLevel, false)
    }

    #[test]
    fn test_basic_import() {
        let mut fixture = Fixture::new();
        let content = "#comment line\n\nHugo_Symbol\tEntrez_Gene_Id\tS1\tS2\nTP53\t7157\t0.5\t-1.2\r\nBRCA1\t\t1.1\tNA\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();

        assert_eq!(summary.profile_kind(), Some(ProfileKind::Continuous));
        assert_eq!(summary.rows_stored(), 2);
        assert_eq!(summary.lines_read(), 2);
        assert_eq!(summary.total_warnings(), 0);
        assert_eq!(summary.live_samples(), 2);
        assert_eq!(summary.registered_samples(), 2);
        assert!(!fixture.sink.is_bulk_load());
        assert_eq!(values(fixture.sink.row_for(7157).unwrap()), vec!["0.5", "-1.2"]);
        assert_eq!(values(fixture.sink.row_for(672).unwrap()), vec!["1.1", "NA"]);
        assert!(fixture.sink.rows.iter().all(|r| r.genetic_profile_id() == 5));
    }

    #[test]
    fn test_non_integer_id_dropped() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tEntrez_Gene_Id\tS1\nTP53\t12a\t1\nBRCA1\t672\t2\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(summary.rows_stored(), 1);
        assert_eq!(summary.warnings_of(RowWarningKind::InvalidEntrezId), 1);
        assert!(fixture.sink.row_for(7157).is_none());
    }

    #[test]
    fn test_unknown_entrez_no_fallback() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tEntrez_Gene_Id\tS1\nTP53\t99999\t1\nBRCA1\t672\t2\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(summary.warnings_of(RowWarningKind::UnknownEntrezId), 1);
        assert!(fixture.sink.row_for(7157).is_none());
    }

    #[test]
    fn test_first_row_wins() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\nTP53\t1\nP53\t2\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(summary.rows_stored(), 1);
        assert_eq!(summary.rows_skipped(), 1);
        assert_eq!(summary.warnings_of(RowWarningKind::DuplicateGene), 1);
        assert_eq!(fixture.sink.rows.len(), 1);
        assert_eq!(values(&fixture.sink.rows[0]), vec!["1"]);
    }

    #[test]
    fn test_first_alternative_symbol() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\nTP53|TP53P1\t3.0\n";
        fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(values(fixture.sink.row_for(7157).unwrap()), vec!["3.0"]);
    }

    #[test]
    fn test_ambiguous_symbol() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\nRAC\t3.0\nTP53\t1.0\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(summary.rows_stored(), 1);
        assert_eq!(summary.total_warnings(), 1);
        assert_eq!(summary.warnings_of(RowWarningKind::AmbiguousSymbol), 1);
        assert!(fixture.sink.row_for(207).is_none());
        assert!(fixture.sink.row_for(208).is_none());
    }

    #[test]
    fn test_filtered_column() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tTCGA-A1-A0SB-01\tTCGA-A1-A0SB-11\tTCGA-A1-A0SC-01\nTP53\t1\t2\t3\n";
        let summary = fixture.import(mrna_profile(), None, content).unwrap();
        assert_eq!(summary.live_samples(), 2);
        assert_eq!(summary.filtered_samples(), 1);
        let row = fixture.sink.row_for(7157).unwrap();
        assert_eq!(values(row), vec!["1", "3"]);
        assert_eq!(fixture.samples.profile_samples(5).unwrap().len(), row.values().len());
    }

    #[test]
    fn test_cna_event_identity() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\tS2\tS3\nBRCA1\t2\t2\t-2\nTP53\t-1.5\t0\t1\n";
        let summary = fixture.import(cna_profile(), None, content).unwrap();

        assert_eq!(summary.profile_kind(), Some(ProfileKind::DiscretizedCna));
        assert!(fixture.sink.is_bulk_load());
        assert_eq!(fixture.sink.flushes, 1);
        assert_eq!(summary.new_cna_events(), 3);
        assert_eq!(summary.reused_cna_events(), 1);

        let events = fixture.events.events();
        let brca1_amp = events.iter().find(|e| e.key.entrez_gene_id == 672 && e.key.alteration.code() == 2).unwrap();
        assert_eq!(fixture.events.case_count(brca1_amp.event_id), 2);
        assert_eq!(values(fixture.sink.row_for(7157).unwrap()), vec!["-2", "0", "1"]);

        // importing again reuses every event
        let mut second = Fixture::new();
        second.events = fixture.events.clone();
        let summary = second.import(cna_profile(), None, content).unwrap();
        assert_eq!(summary.new_cna_events(), 0);
        assert_eq!(summary.reused_cna_events(), 4);
        assert_eq!(second.events.events().len(), 3);
    }

    #[test]
    fn test_rppa_phospho() {
        let mut fixture = Fixture::new();
        let content = "Composite.Element.Ref\tS1\tS2\nAKT1 AKT2|Akt_pS473\t0.1\t0.2\nTP53|p53-R-V\t1.5\t1.6\n";
        let summary = fixture.import(rppa_profile(), None, content).unwrap();

        assert_eq!(summary.profile_kind(), Some(ProfileKind::AntibodyArray));
        assert_eq!(summary.rows_stored(), 2);
        assert_eq!(summary.genes_stored(), 3);
        assert_eq!(summary.phospho_genes_created(), 2);

        let akt1 = fixture.genes.gene_by_exact_symbol("AKT1_pS473").unwrap();
        let akt2 = fixture.genes.gene_by_exact_symbol("AKT2_pS473").unwrap();
        assert_eq!(akt1.gene_type(), GeneType::Phosphoprotein);
        assert_eq!(akt1.cytoband(), Some("14q32.33"));
        assert_eq!(values(fixture.sink.row_for(akt1.entrez_gene_id()).unwrap()), vec!["0.1", "0.2"]);
        assert_eq!(values(fixture.sink.row_for(akt2.entrez_gene_id()).unwrap()), vec!["0.1", "0.2"]);
        assert!(fixture.sink.row_for(7157).is_some());
    }

    #[test]
    fn test_protein_level_without_composite() {
        // protein-level data keyed by gene symbols is a plain continuous profile
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\nTP53\t0.3\n";
        let summary = fixture.import(rppa_profile(), None, content).unwrap();
        assert_eq!(summary.profile_kind(), Some(ProfileKind::Continuous));
        assert_eq!(summary.rows_stored(), 1);
    }

    #[test]
    fn test_target_line() {
        let mut fixture = Fixture::new();
        let content = "Hugo_Symbol\tS1\nTP53\t1\nBRCA1\t2\n";
        let summary = fixture.import(mrna_profile(), Some("BRCA1"), content).unwrap();
        assert_eq!(summary.rows_stored(), 1);
        assert_eq!(summary.rows_not_targeted(), 1);
        assert!(fixture.sink.row_for(7157).is_none());
    }

    #[test]
    fn test_fatal_errors() {
        let mut fixture = Fixture::new();
        let err = fixture.import(mrna_profile(), None, "Hugo_Symbol\tS1\n").unwrap_err();
        assert!(matches!(err, ImportError::NothingImported { lines_read: 0, rows_skipped: 0 }));

        let err = fixture.import(mrna_profile(), None, "Hugo_Symbol\tS1\nNOPE\t1\n").unwrap_err();
        assert!(matches!(err, ImportError::NothingImported { lines_read: 1, rows_skipped: 1 }));

        let err = fixture.import(mrna_profile(), None, "# only a comment\n\n").unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader));

        let err = fixture.import(mrna_profile(), None, "Gene\tS1\nTP53\t1\n").unwrap_err();
        assert!(matches!(err, ImportError::MissingGeneColumn));

        let err = fixture.import(rppa_profile(), None, "Composite.Element.Ref\tEntrez_Gene_Id\nA|B\t1\n").unwrap_err();
        assert!(matches!(err, ImportError::NoSampleColumns));
    }

    #[test]
    fn test_sink_fault_flushes() {
        let mut fixture = Fixture::new();
        fixture.sink.fail_after = Some(1);
        let content = "Hugo_Symbol\tS1\tS2\nBRCA1\t2\t0\nTP53\t-2\t0\n";
        let err = fixture.import(cna_profile(), None, content).unwrap_err();
        match err {
            ImportError::Collaborator { line_number, .. } => assert_eq!(line_number, 3),
            other => panic!("unexpected error: {other:?}")
        };
        // the row accepted before the fault is not rolled back
        assert_eq!(fixture.sink.flushes, 1);
        assert!(fixture.sink.row_for(672).is_some());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut fixture = Fixture::new();
        let mut content = b"Hugo_Symbol\tS1\nTP53\t1\n".to_vec();
        content.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let mut collaborators = Collaborators {
            genes: &mut fixture.genes,
            samples: &mut fixture.samples,
            events: &mut fixture.events,
            sink: &mut fixture.sink
        };
        let err = TabDelimImporter::new(mrna_profile())
            .import(Cursor::new(content), &mut collaborators)
            .unwrap_err();
        assert!(matches!(err, ImportError::Io { line_number: 3, .. }));
        assert_eq!(fixture.sink.rows.len(), 1);
    }
}
