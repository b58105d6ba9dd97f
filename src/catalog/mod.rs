
/// Contains the TSV writer that receives finished alteration rows
pub mod alteration_sink;
/// Contains the in-memory CNA event store
pub mod event_database;
/// Contains the in-memory gene catalog loaded from TSV
pub mod gene_collection;
/// Contains the in-memory sample and patient registry
pub mod sample_database;

use crate::data_types::alteration_row::GeneticAlterationRow;
use crate::data_types::canonical_gene::CanonicalGene;
use crate::data_types::cna_event::CnaEventKey;
use crate::data_types::sample::Sample;

/// Errors from any collaborator are opaque to the importer
pub type CollaboratorResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Lookup of canonical genes, the importer never constructs genes except for phospho-proteins
pub trait GeneCatalog {
    /// Exact lookup by numeric gene id
    fn gene_by_entrez_id(&self, entrez_gene_id: i64) -> Option<CanonicalGene>;
    /// Symbol lookup that may return several candidates when only aliases match
    fn genes_by_symbol(&self, symbol: &str) -> Vec<CanonicalGene>;
    /// Symbol lookup that only returns a gene when exactly one candidate exists
    fn non_ambiguous_gene(&self, symbol: &str) -> Option<CanonicalGene>;
    /// Lookup by the primary symbol only, aliases are ignored
    fn gene_by_exact_symbol(&self, symbol: &str) -> Option<CanonicalGene>;
    /// Adds a new gene; a gene without an identity (id 0) is assigned one.
    /// Returns the gene as stored.
    fn add_gene(&mut self, gene: CanonicalGene) -> CollaboratorResult<CanonicalGene>;
}

/// Registry of patients, samples and their profile memberships
pub trait SampleRegistry {
    /// Registers any unknown, non-normal samples (and their patients) for the study.
    /// Returns the number of samples that were added.
    fn register_on_the_fly(&mut self, cancer_study_id: u32, sample_headers: &[String]) -> CollaboratorResult<usize>;
    /// Lookup by the stable sample id within a study
    fn sample_by_stable_id(&self, cancer_study_id: u32, stable_id: &str) -> Option<Sample>;
    /// True if the sample is already a member of the profile
    fn sample_in_profile(&self, internal_sample_id: u32, genetic_profile_id: u32) -> bool;
    /// Records profile membership for a sample
    fn add_sample_to_profile(&mut self, internal_sample_id: u32, genetic_profile_id: u32) -> CollaboratorResult<()>;
    /// Stores the column order of the samples for a profile, which is the order of every value vector
    fn set_profile_samples(&mut self, genetic_profile_id: u32, ordered_samples: &[u32]) -> CollaboratorResult<()>;
}

/// Persisted CNA events, canonical events and their case associations
pub trait EventStore {
    /// Every canonical event that already exists, with its identity
    fn all_events(&self) -> CollaboratorResult<Vec<(CnaEventKey, u64)>>;
    /// Persists a new canonical event and returns the identity minted for it
    fn add_canonical_event(&mut self, key: &CnaEventKey) -> CollaboratorResult<u64>;
    /// Associates a sample with an existing canonical event
    fn add_case_event(&mut self, internal_sample_id: u32, event_id: u64) -> CollaboratorResult<()>;
}

/// Destination of finished rows, possibly batched until flushed
pub trait AlterationSink {
    /// Accepts one finished row
    fn add_row(&mut self, row: GeneticAlterationRow) -> CollaboratorResult<()>;
    /// Toggles batch mode, where rows are held until `flush`
    fn set_bulk_load(&mut self, enabled: bool);
    /// True if batch mode is on
    fn is_bulk_load(&self) -> bool;
    /// Writes out anything that is held
    fn flush(&mut self) -> CollaboratorResult<()>;
}
