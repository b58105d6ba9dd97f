
use log::{LevelFilter, error, info};

use tabimport::catalog::alteration_sink::BulkAlterationSink;
use tabimport::catalog::event_database::CnaEventDatabase;
use tabimport::catalog::gene_collection::GeneCollection;
use tabimport::catalog::sample_database::SampleDatabase;
use tabimport::cli::core::{Commands, get_cli};
use tabimport::cli::import::{ImportSettings, check_import_settings};
use tabimport::cli::stats::{StatsSettings, check_stats_settings};
use tabimport::data_types::genetic_profile::GeneticProfile;
use tabimport::importer::errors::ImportError;
use tabimport::importer::session::{Collaborators, ImportSummary, TabDelimImporter};
use tabimport::util::file_io::{create_text_writer, load_json, open_text_reader};

/// Sets up the logger for the given verbosity count
/// # Arguments
/// * `verbosity` - the number of times `-v` was provided
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// This will run the "import" mode of the tool
/// # Arguments
/// * `settings` - the ImportSettings object
fn run_import(settings: ImportSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: ImportSettings = match check_import_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    info!("Loading genetic profile from {:?}...", cli_settings.profile_filename);
    let profile: GeneticProfile = match load_json(&cli_settings.profile_filename) {
        Ok(p) => p,
        Err(e) => {
            error!("Error while loading genetic profile file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Profile {} ({}), type {}", profile.stable_id(), profile.genetic_profile_id(), profile.genetic_alteration_type());

    info!("Loading gene catalog from {:?}...", cli_settings.genes_filename);
    let mut genes = match GeneCollection::load_tsv(&cli_settings.genes_filename) {
        Ok(g) => g,
        Err(e) => {
            error!("Error while loading gene catalog: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Loaded {} genes.", genes.len());

    let mut samples = match cli_settings.samples_filename.as_ref() {
        Some(filename) => match SampleDatabase::load(filename) {
            Ok(s) => s,
            Err(e) => {
                error!("Error while loading sample registry: {e}");
                std::process::exit(exitcode::IOERR);
            }
        },
        None => SampleDatabase::new()
    };

    let mut events = match cli_settings.events_filename.as_ref() {
        Some(filename) => match CnaEventDatabase::load(filename) {
            Ok(ev) => ev,
            Err(e) => {
                error!("Error while loading CNA event store: {e}");
                std::process::exit(exitcode::IOERR);
            }
        },
        None => CnaEventDatabase::new()
    };

    let reader = match open_text_reader(&cli_settings.input_filename) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while opening input matrix: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut sink = match create_text_writer(&cli_settings.output_filename) {
        Ok(w) => BulkAlterationSink::new(w),
        Err(e) => {
            error!("Error while creating output file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // all the work
    info!("Importing {:?}...", cli_settings.input_filename);
    let importer = TabDelimImporter::new(profile)
        .with_target_line(cli_settings.target_line.clone());
    let mut collaborators = Collaborators {
        genes: &mut genes,
        samples: &mut samples,
        events: &mut events,
        sink: &mut sink
    };
    let summary: ImportSummary = match importer.import(reader, &mut collaborators) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while importing matrix: {e}");
            let code = match e {
                ImportError::Io { .. } | ImportError::Collaborator { .. } => exitcode::IOERR,
                _ => exitcode::DATAERR
            };
            std::process::exit(code);
        }
    };

    let rows_written = sink.rows_written();
    if let Err(e) = sink.into_inner() {
        error!("Error while writing alteration rows: {e}");
        std::process::exit(exitcode::IOERR);
    }
    info!("Wrote {rows_written} alteration rows to {:?}", cli_settings.output_filename);

    info!("Import summary:");
    info!("\tRows stored: {} ({} genes)", summary.rows_stored(), summary.genes_stored());
    info!("\tRows skipped: {}", summary.rows_skipped());
    info!("\tSamples: {} live, {} filtered, {} registered", summary.live_samples(), summary.filtered_samples(), summary.registered_samples());
    if summary.new_cna_events() + summary.reused_cna_events() > 0 {
        info!("\tCNA events: {} new, {} reused", summary.new_cna_events(), summary.reused_cna_events());
    }
    if summary.phospho_genes_created() > 0 {
        info!("\tPhospho-proteins created: {}", summary.phospho_genes_created());
    }
    for (kind, count) in summary.warning_counts().iter() {
        info!("\tWarnings {kind}: {count}");
    }

    // save any updated collaborators
    if let Some(filename) = cli_settings.output_samples.as_ref() {
        info!("Saving sample registry to {filename:?}");
        if let Err(e) = samples.save(filename) {
            error!("Error while writing sample registry: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
    if let Some(filename) = cli_settings.output_events.as_ref() {
        info!("Saving CNA event store to {filename:?}");
        if let Err(e) = events.save(filename) {
            error!("Error while writing CNA event store: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
    if let Some(filename) = cli_settings.output_genes.as_ref() {
        info!("Saving gene catalog to {filename:?}");
        if let Err(e) = genes.save_tsv(filename) {
            error!("Error while writing gene catalog: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
}

/// This will run the "stats" mode of the tool
/// # Arguments
/// * `settings` - the StatsSettings object
fn run_stats(settings: StatsSettings) {
    init_logging(settings.verbosity);

    let cli_settings: StatsSettings = match check_stats_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    if let Some(filename) = cli_settings.genes_filename.as_ref() {
        match GeneCollection::load_tsv(filename) {
            Ok(genes) => tabimport::stats::print_gene_stats(&genes),
            Err(e) => {
                error!("Error while loading gene catalog: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
    if let Some(filename) = cli_settings.samples_filename.as_ref() {
        match SampleDatabase::load(filename) {
            Ok(samples) => tabimport::stats::print_sample_stats(&samples),
            Err(e) => {
                error!("Error while loading sample registry: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
    if let Some(filename) = cli_settings.events_filename.as_ref() {
        match CnaEventDatabase::load(filename) {
            Ok(events) => tabimport::stats::print_event_stats(&events),
            Err(e) => {
                error!("Error while loading CNA event store: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Import(settings) => {
            run_import(*settings);
        },
        Commands::Stats(settings) => {
            run_stats(*settings);
        }
    }

    info!("Process finished successfully.");
}
