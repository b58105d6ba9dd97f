/// the main CLI module
pub mod core;
/// The import CLI subcommand for loading a matrix into a genetic profile
pub mod import;
/// The stats CLI subcommand for describing catalog and registry files
pub mod stats;
