
/// Contains the finished per-gene value row handed to storage
pub mod alteration_row;
/// Contains the catalog gene definition, including phospho-protein derivation
pub mod canonical_gene;
/// Contains CNA events and their identity key
pub mod cna_event;
/// Contains the genetic profile definition and its processing branch
pub mod genetic_profile;
/// Constants that are hard-coded in the matrix format, header names and discrete codes
pub mod import_const;
/// Contains registered patients and samples
pub mod sample;
