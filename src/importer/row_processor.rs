
use log::trace;

use crate::catalog::CollaboratorResult;
use crate::data_types::canonical_gene::CanonicalGene;
use crate::data_types::cna_event::{CnaAlteration, CnaEvent};
use crate::data_types::genetic_profile::ProfileKind;
use crate::data_types::import_const::{HOMOZYGOUS_DELETION, PARTIAL_DELETION};
use crate::importer::cna_events::CnaEventDeduplicator;
use crate::importer::errors::RowWarning;
use crate::importer::gene_resolver::{first_alternative, unresolved_warning, GeneResolution, GeneResolver, RowIdentifiers};
use crate::importer::header::HeaderLayout;
use crate::importer::samples::SampleColumnMap;
use crate::importer::session::Collaborators;
use crate::importer::writer::AlterationWriter;

/// What happened to a single line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowOutcome {
    /// Comment or blank line
    Ignored,
    /// Values were stored for this many genes
    Stored { genes: usize },
    /// Nothing was stored
    Skipped,
    /// Resolved, but excluded by the target line filter
    NotTargeted
}

/// The outcome of a line with every warning it produced
#[derive(Clone, Debug, PartialEq)]
pub struct RowReport {
    pub outcome: RowOutcome,
    pub warnings: Vec<RowWarning>
}

impl RowReport {
    fn new(outcome: RowOutcome, warnings: Vec<RowWarning>) -> Self {
        Self {
            outcome,
            warnings
        }
    }
}

/// Per-row processing for one import: shape checks, gene resolution, CNA events, and storage
pub struct RowProcessor {
    genetic_profile_id: u32,
    profile_kind: ProfileKind,
    layout: HeaderLayout,
    samples: SampleColumnMap,
    resolver: GeneResolver,
    events: Option<CnaEventDeduplicator>,
    writer: AlterationWriter,
    /// Deprecated filter, only rows whose first field equals this are stored
    target_line: Option<String>
}

impl RowProcessor {
    /// Constructor
    /// # Arguments
    /// * `genetic_profile_id` - the destination profile
    /// * `profile_kind` - the processing branch
    /// * `layout` - the analyzed header
    /// * `samples` - the resolved sample columns
    /// * `events` - the event cache, only used for discretized CNA profiles
    /// * `target_line` - optional first-field filter
    pub fn new(
        genetic_profile_id: u32, profile_kind: ProfileKind, layout: HeaderLayout, samples: SampleColumnMap,
        events: Option<CnaEventDeduplicator>, target_line: Option<String>
    ) -> Self {
        Self {
            genetic_profile_id,
            profile_kind,
            layout,
            samples,
            resolver: GeneResolver::new(profile_kind),
            events,
            writer: AlterationWriter::new(genetic_profile_id),
            target_line
        }
    }

    /// Processes one data line.
    /// # Arguments
    /// * `line` - the raw line, a trailing line ending is allowed
    /// * `collaborators` - gene catalog, event store, and sink
    /// # Errors
    /// * if any collaborator fails
    pub fn process_line(&mut self, line: &str, collaborators: &mut Collaborators) -> CollaboratorResult<RowReport> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(RowReport::new(RowOutcome::Ignored, vec![]));
        }

        let mut warnings = vec![];
        let mut fields: Vec<&str> = line.split('\t').collect();
        let expected = self.layout.column_count();
        if fields.len() < expected {
            warnings.push(RowWarning::ShortRow { found: fields.len(), expected });
            return Ok(RowReport::new(RowOutcome::Skipped, warnings));
        } else if fields.len() > expected {
            warnings.push(RowWarning::LongRow { found: fields.len(), expected });
            fields.truncate(expected);
        }

        let mut values = self.samples.live_values(&fields[self.layout.sample_start_index()..]);
        let ids = RowIdentifiers::from_fields(&self.layout, &fields);
        let resolution = self.resolver.resolve(&ids, &mut *collaborators.genes, &mut warnings)?;

        if let GeneResolution::Rejected(warning) = &resolution {
            warnings.push(warning.clone());
            return Ok(RowReport::new(RowOutcome::Skipped, warnings));
        }

        let targeted = self.target_line.as_deref()
            .map(|target| fields[0] == target)
            .unwrap_or(true);
        if !targeted {
            trace!("Skipping untargeted row {:?}", fields[0]);
            return Ok(RowReport::new(RowOutcome::NotTargeted, warnings));
        }

        let original = ids.gene_symbol(self.profile_kind).map(|symbol| {
            if self.profile_kind == ProfileKind::AntibodyArray {
                symbol
            } else {
                first_alternative(symbol)
            }
        });

        let outcome = match resolution {
            GeneResolution::Unresolved(identifier) => {
                warnings.push(unresolved_warning(&identifier));
                RowOutcome::Skipped
            },
            GeneResolution::ResolvedOne(gene) => {
                if self.profile_kind == ProfileKind::DiscretizedCna {
                    self.derive_cna_events(&gene, &mut values, collaborators)?;
                }
                if self.writer.store(&gene, values, original, &mut *collaborators.sink, &mut warnings)? {
                    RowOutcome::Stored { genes: 1 }
                } else {
                    RowOutcome::Skipped
                }
            },
            GeneResolution::ResolvedMany(genes) => {
                let eligible: Vec<&CanonicalGene> = genes.iter()
                    .filter(|gene| self.profile_kind.allows_multiple_genes() || gene.is_micro_rna())
                    .collect();
                if eligible.is_empty() {
                    let symbol = original.unwrap_or_default().to_string();
                    warnings.push(RowWarning::AmbiguousSymbol(symbol));
                    RowOutcome::Skipped
                } else {
                    let mut stored = 0;
                    for gene in eligible.into_iter() {
                        if self.writer.store(gene, values.clone(), original, &mut *collaborators.sink, &mut warnings)? {
                            stored += 1;
                        }
                    }
                    if stored > 0 {
                        RowOutcome::Stored { genes: stored }
                    } else {
                        warnings.push(RowWarning::AmbiguousSymbol(original.unwrap_or_default().to_string()));
                        RowOutcome::Skipped
                    }
                }
            },
            // handled above
            GeneResolution::Rejected(_) => RowOutcome::Skipped
        };
        Ok(RowReport::new(outcome, warnings))
    }

    /// Normalizes partial deletions and records an event for every amplification or deep deletion.
    /// Events are derived even when the writer later rejects the row as a duplicate gene.
    fn derive_cna_events(&mut self, gene: &CanonicalGene, values: &mut [String], collaborators: &mut Collaborators) -> CollaboratorResult<()> {
        for value in values.iter_mut() {
            if value == PARTIAL_DELETION {
                *value = HOMOZYGOUS_DELETION.to_string();
            }
        }
        let dedup = match self.events.as_mut() {
            Some(d) => d,
            None => return Ok(())
        };
        for (value, &sample_id) in values.iter().zip(self.samples.live_samples().iter()) {
            if let Some(alteration) = CnaAlteration::from_value(value) {
                let mut event = CnaEvent::new(sample_id, self.genetic_profile_id, gene.entrez_gene_id(), alteration);
                dedup.resolve(&mut event, &mut *collaborators.events)?;
            }
        }
        Ok(())
    }

    // getters
    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    pub fn samples(&self) -> &SampleColumnMap {
        &self.samples
    }

    pub fn resolver(&self) -> &GeneResolver {
        &self.resolver
    }

    pub fn events(&self) -> Option<&CnaEventDeduplicator> {
        self.events.as_ref()
    }

    pub fn writer(&self) -> &AlterationWriter {
        &self.writer
    }
}
