
use log::{debug, warn};
use rustc_hash::FxHashSet as HashSet;

use crate::catalog::{CollaboratorResult, SampleRegistry};
use crate::data_types::genetic_profile::GeneticProfile;
use crate::util::stable_id::sample_stable_id;

/// Where the values of one sample column go
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleColumn {
    /// Values are kept for this internal sample id
    Live(u32),
    /// Values are dropped, e.g. normal samples or unregistered ids
    Filtered
}

/// Ordered routing of every sample column; built once per import and never changed
#[derive(Clone, Debug)]
pub struct SampleColumnMap {
    columns: Vec<SampleColumn>,
    live_samples: Vec<u32>,
    registered_samples: usize
}

impl SampleColumnMap {
    /// Registers unknown samples, resolves each sample column, and records profile membership.
    /// # Arguments
    /// * `profile` - the destination profile
    /// * `sample_headers` - header text of the sample columns, in file order
    /// * `registry` - the sample registry to resolve against
    /// # Errors
    /// * if the registry fails while registering samples or recording membership
    pub fn resolve(profile: &GeneticProfile, sample_headers: &[String], registry: &mut dyn SampleRegistry) -> CollaboratorResult<Self> {
        let study_id = profile.cancer_study_id();
        let profile_id = profile.genetic_profile_id();

        let registered_samples = registry.register_on_the_fly(study_id, sample_headers)?;
        if registered_samples > 0 {
            warn!("{registered_samples} samples were not registered yet and have been added on the fly");
        }

        let mut columns = Vec::with_capacity(sample_headers.len());
        let mut live_samples = vec![];
        let mut seen: HashSet<u32> = Default::default();
        for header in sample_headers.iter() {
            let stable_id = sample_stable_id(header);
            let column = match registry.sample_by_stable_id(study_id, &stable_id) {
                Some(sample) => {
                    let internal_id = sample.internal_id();
                    if !seen.insert(internal_id) {
                        warn!("Sample {stable_id} appears in more than one column, only the first column is used");
                        SampleColumn::Filtered
                    } else {
                        if !registry.sample_in_profile(internal_id, profile_id) {
                            registry.add_sample_to_profile(internal_id, profile_id)?;
                        }
                        live_samples.push(internal_id);
                        SampleColumn::Live(internal_id)
                    }
                },
                None => {
                    debug!("Sample column {header:?} is filtered");
                    SampleColumn::Filtered
                }
            };
            columns.push(column);
        }

        registry.set_profile_samples(profile_id, &live_samples)?;
        debug!("Resolved {} live and {} filtered sample columns", live_samples.len(), columns.len() - live_samples.len());

        Ok(Self {
            columns,
            live_samples,
            registered_samples
        })
    }

    /// Keeps only the values of live columns; `sample_values` starts at the first sample column.
    /// Missing trailing values are not padded.
    pub fn live_values(&self, sample_values: &[&str]) -> Vec<String> {
        self.columns.iter()
            .zip(sample_values.iter())
            .filter(|(column, _)| matches!(column, SampleColumn::Live(_)))
            .map(|(_, value)| value.to_string())
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.columns.len() - self.live_samples.len()
    }

    // getters
    pub fn columns(&self) -> &[SampleColumn] {
        &self.columns
    }

    pub fn live_samples(&self) -> &[u32] {
        &self.live_samples
    }

    pub fn registered_samples(&self) -> usize {
        self.registered_samples
    }
}
