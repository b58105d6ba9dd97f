
use clap::Args;
use log::{info, warn};
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename, check_required_filename};

#[derive(Args, Clone, Default)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct ImportSettings {
    /// Input tab-delimited matrix, genes by samples (optionally gzipped)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_filename: PathBuf,

    /// Genetic profile definition that receives the data (JSON)
    #[clap(required = true)]
    #[clap(short = 'p')]
    #[clap(long = "profile")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub profile_filename: PathBuf,

    /// Gene catalog with Entrez ids, symbols, and aliases (TSV)
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "genes")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub genes_filename: PathBuf,

    /// Existing sample registry (JSON); an empty registry is used if not provided
    #[clap(short = 's')]
    #[clap(long = "samples")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub samples_filename: Option<PathBuf>,

    /// Existing CNA event store (JSON); an empty store is used if not provided
    #[clap(short = 'e')]
    #[clap(long = "events")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub events_filename: Option<PathBuf>,

    /// Output alteration rows (TSV)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Output sample registry including samples added during import (JSON)
    #[clap(long = "output-samples")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_samples: Option<PathBuf>,

    /// Output CNA event store including new events (JSON)
    #[clap(long = "output-events")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_events: Option<PathBuf>,

    /// Output gene catalog including synthesized phospho-proteins (TSV)
    #[clap(long = "output-genes")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_genes: Option<PathBuf>,

    /// Only store the row whose first field equals this value (deprecated)
    #[clap(hide = true)]
    #[clap(long = "target-line")]
    #[clap(value_name = "ID")]
    pub target_line: Option<String>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Checks the import settings and dumps them to the logger
/// # Arguments
/// * `settings` - the raw settings from the command line
/// # Errors
/// * if an output would overwrite the input matrix
pub fn check_import_settings(settings: ImportSettings) -> Result<ImportSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.input_filename, "Input matrix");
    check_required_filename(&settings.profile_filename, "Profile JSON");
    check_required_filename(&settings.genes_filename, "Gene catalog");
    check_optional_filename(settings.samples_filename.as_deref(), "Sample registry");
    check_optional_filename(settings.events_filename.as_deref(), "CNA event store");

    info!("\tMatrix: {:?}", settings.input_filename);
    info!("\tProfile: {:?}", settings.profile_filename);
    info!("\tGenes: {:?}", settings.genes_filename);
    match settings.samples_filename.as_ref() {
        Some(filename) => info!("\tSamples: {filename:?}"),
        None => info!("\tSamples: None, starting from an empty registry")
    };
    match settings.events_filename.as_ref() {
        Some(filename) => info!("\tCNA events: {filename:?}"),
        None => info!("\tCNA events: None, starting from an empty store")
    };
    if let Some(target_line) = settings.target_line.as_ref() {
        warn!("\tTarget line: {target_line:?}, this option is deprecated and all other rows are ignored");
    }

    let outputs = [
        Some(&settings.output_filename), settings.output_samples.as_ref(),
        settings.output_events.as_ref(), settings.output_genes.as_ref()
    ];
    for output in outputs.iter().flatten() {
        if **output == settings.input_filename {
            bail!("Output file {output:?} would overwrite the input matrix");
        }
    }

    // outputs
    info!("Outputs:");
    info!("\tAlteration rows: {:?}", settings.output_filename);
    match settings.output_samples.as_ref() {
        Some(filename) => info!("\tSamples: {filename:?}"),
        None => warn!("\tSamples: no output provided, samples registered during import are not saved")
    };
    if let Some(filename) = settings.output_events.as_ref() {
        info!("\tCNA events: {filename:?}");
    }
    if let Some(filename) = settings.output_genes.as_ref() {
        info!("\tGenes: {filename:?}");
    }

    Ok(settings)
}
