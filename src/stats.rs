
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::catalog::event_database::CnaEventDatabase;
use crate::catalog::gene_collection::GeneCollection;
use crate::catalog::sample_database::SampleDatabase;
use crate::data_types::cna_event::CnaAlteration;

/// Prints the statistics for a gene catalog
/// # Arguments
/// * `genes` - the catalog to print the statistics for
pub fn print_gene_stats(genes: &GeneCollection) {
    println!("Gene catalog statistics:");
    println!("\tTotal genes: {}", genes.len());
    for (gene_type, count) in genes.type_counts().iter() {
        println!("\t\t{gene_type}: {count}");
    }
    let synthesized = genes.genes().keys().filter(|&&id| id < 0).count();
    println!("\tSynthesized genes: {synthesized}");
    println!("\tTotal aliases: {}", genes.genes().values().map(|g| g.aliases().len()).sum::<usize>());

    // per-gene listing only with elevated verbosity
    if log::log_enabled!(log::Level::Debug) {
        println!();
        println!("entrez_gene_id\thugo_gene_symbol\tgene_type\taliases");
        for gene in genes.genes().values() {
            println!("{}\t{}\t{}\t{}", gene.entrez_gene_id(), gene.hugo_gene_symbol(), gene.gene_type(), gene.aliases().iter().join("|"));
        }
        println!();
    }
}

/// Prints the statistics for a sample registry
/// # Arguments
/// * `samples` - the registry to print the statistics for
pub fn print_sample_stats(samples: &SampleDatabase) {
    println!("Sample registry statistics:");
    println!("\tTotal patients: {}", samples.patients().len());
    println!("\tTotal samples: {}", samples.samples().len());

    let study_counts = samples.samples().iter()
        .map(|s| s.cancer_study_id())
        .counts();
    for (study_id, count) in study_counts.iter().sorted() {
        println!("\t\tStudy {study_id}: {count} samples");
    }

    println!("\tProfiles with samples: {}", samples.profile_members().len());
    for profile_id in samples.profile_members().keys() {
        let ordered = samples.profile_samples(*profile_id).map(|s| s.len()).unwrap_or(0);
        println!("\t\tProfile {profile_id}: {} members, {ordered} ordered columns", samples.profile_member_count(*profile_id));
    }
}

/// Prints the statistics for a CNA event store
/// # Arguments
/// * `events` - the store to print the statistics for
pub fn print_event_stats(events: &CnaEventDatabase) {
    println!("CNA event statistics:");
    println!("\tTotal canonical events: {}", events.events().len());
    for alteration in CnaAlteration::iter() {
        let count = events.events().iter()
            .filter(|e| e.key.alteration == alteration)
            .count();
        println!("\t\t{alteration}: {count}");
    }
    println!("\tTotal case associations: {}", events.case_events().len());

    if log::log_enabled!(log::Level::Debug) {
        println!();
        println!("event_id\tgenetic_profile_id\tentrez_gene_id\talteration\tcases");
        for event in events.events().iter() {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                event.event_id, event.key.genetic_profile_id, event.key.entrez_gene_id, event.key.alteration, events.case_count(event.event_id)
            );
        }
        println!();
    }
}
