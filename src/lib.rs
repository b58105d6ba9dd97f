
/// Contains the collaborator traits and their file-backed implementations
pub mod catalog;
/// Contains all the CLI related functionality
pub mod cli;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Contains the tab-delimited matrix importer
pub mod importer;
/// Contains functionality for displaying catalog and registry statistics
pub mod stats;
/// Contains generic utilities that are handy wrappers
pub mod util;
