
/// Identity cache that keeps one event id per (profile, gene, alteration)
pub mod cna_events;
/// Fatal import errors and per-row warnings
pub mod errors;
/// Resolves row identifiers to catalog genes
pub mod gene_resolver;
/// Header classification and sample start detection
pub mod header;
/// Per-row processing
pub mod row_processor;
/// Sample column resolution and filtering
pub mod samples;
/// The import entry point that drives a whole stream
pub mod session;
/// First-row-wins storage of alteration rows
pub mod writer;
