
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename};

#[derive(Clone, Args)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct StatsSettings {
    /// Gene catalog (TSV)
    #[clap(short = 'g')]
    #[clap(long = "genes")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub genes_filename: Option<PathBuf>,

    /// Sample registry (JSON)
    #[clap(short = 's')]
    #[clap(long = "samples")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub samples_filename: Option<PathBuf>,

    /// CNA event store (JSON)
    #[clap(short = 'e')]
    #[clap(long = "events")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub events_filename: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_stats_settings(settings: StatsSettings) -> Result<StatsSettings, Box<dyn std::error::Error>> {
    check_optional_filename(settings.genes_filename.as_deref(), "Gene catalog");
    check_optional_filename(settings.samples_filename.as_deref(), "Sample registry");
    check_optional_filename(settings.events_filename.as_deref(), "CNA event store");

    if settings.genes_filename.is_none() && settings.samples_filename.is_none() && settings.events_filename.is_none() {
        simple_error::bail!("Must provide at least one of --genes, --samples, or --events.");
    }

    info!("Inputs:");
    info!("\tGenes: {:?}", settings.genes_filename);
    info!("\tSamples: {:?}", settings.samples_filename);
    info!("\tCNA events: {:?}", settings.events_filename);

    Ok(settings)
}
