
use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use simple_error::bail;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::catalog::{CollaboratorResult, SampleRegistry};
use crate::data_types::sample::{Patient, Sample};
use crate::util::file_io::{load_json, save_json};
use crate::util::stable_id::{is_normal, patient_stable_id, sample_stable_id};

/// A JSON-backed registry of patients and samples, including which samples belong to which profile.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SampleDatabase {
    /// All registered patients
    patients: Vec<Patient>,
    /// All registered samples
    samples: Vec<Sample>,
    /// Map from profile id to the set of member samples
    profile_members: BTreeMap<u32, BTreeSet<u32>>,
    /// Map from profile id to the column order of its samples
    profile_samples: BTreeMap<u32, Vec<u32>>,
    /// (study, stable id) -> index into `samples`
    #[serde(skip)]
    sample_index: HashMap<(u32, String), usize>,
    /// (study, stable id) -> index into `patients`
    #[serde(skip)]
    patient_index: HashMap<(u32, String), usize>,
    /// Largest patient id handed out so far
    #[serde(skip)]
    max_patient_id: u32,
    /// Largest sample id handed out so far
    #[serde(skip)]
    max_sample_id: u32
}

impl SampleDatabase {
    /// Creates an empty registry
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads a registry from JSON and rebuilds the lookup indices.
    /// # Errors
    /// * if the file cannot be loaded
    /// * if a stable id appears twice within a study
    pub fn load(filename: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut database: SampleDatabase = load_json(filename)?;
        database.rebuild_index()?;
        debug!("Loaded {} patients and {} samples", database.patients.len(), database.samples.len());
        Ok(database)
    }

    /// Saves the registry to JSON.
    /// # Errors
    /// * if the file cannot be written
    pub fn save(&self, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
        save_json(self, filename)
    }

    fn rebuild_index(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.sample_index.clear();
        self.patient_index.clear();
        self.max_patient_id = self.patients.iter().map(|p| p.internal_id()).max().unwrap_or(0);
        self.max_sample_id = self.samples.iter().map(|s| s.internal_id()).max().unwrap_or(0);
        for (i, patient) in self.patients.iter().enumerate() {
            let key = (patient.cancer_study_id(), patient.stable_id().to_string());
            if self.patient_index.insert(key, i).is_some() {
                bail!("Duplicate patient stable id: {}", patient.stable_id());
            }
        }
        for (i, sample) in self.samples.iter().enumerate() {
            let key = (sample.cancer_study_id(), sample.stable_id().to_string());
            if self.sample_index.insert(key, i).is_some() {
                bail!("Duplicate sample stable id: {}", sample.stable_id());
            }
        }
        Ok(())
    }

    /// Returns the patient id for the given stable id, registering the patient if needed
    fn get_or_add_patient(&mut self, cancer_study_id: u32, stable_id: &str) -> u32 {
        let key = (cancer_study_id, stable_id.to_string());
        if let Some(&index) = self.patient_index.get(&key) {
            return self.patients[index].internal_id();
        }
        let internal_id = self.max_patient_id + 1;
        self.max_patient_id = internal_id;
        trace!("Registering patient {stable_id} as {internal_id}");
        self.patients.push(Patient::new(internal_id, stable_id, cancer_study_id));
        self.patient_index.insert(key, self.patients.len() - 1);
        internal_id
    }

    /// Adds a sample; the patient is created if it does not exist yet.
    /// Returns the sample as stored.
    /// # Errors
    /// * if the sample is already registered in the study
    pub fn add_sample(&mut self, cancer_study_id: u32, raw_id: &str) -> Result<Sample, Box<dyn std::error::Error>> {
        let stable_id = sample_stable_id(raw_id);
        let key = (cancer_study_id, stable_id.clone());
        if self.sample_index.contains_key(&key) {
            bail!("Sample {stable_id} is already registered");
        }
        let internal_patient_id = self.get_or_add_patient(cancer_study_id, &patient_stable_id(raw_id));
        let internal_id = self.max_sample_id + 1;
        self.max_sample_id = internal_id;
        trace!("Registering sample {stable_id} as {internal_id}");
        let sample = Sample::new(internal_id, &stable_id, internal_patient_id, cancer_study_id);
        self.samples.push(sample.clone());
        self.sample_index.insert(key, self.samples.len() - 1);
        Ok(sample)
    }

    /// The ordered column samples recorded for a profile, if any
    pub fn profile_samples(&self, genetic_profile_id: u32) -> Option<&Vec<u32>> {
        self.profile_samples.get(&genetic_profile_id)
    }

    /// The number of member samples of a profile
    pub fn profile_member_count(&self, genetic_profile_id: u32) -> usize {
        self.profile_members.get(&genetic_profile_id).map(|m| m.len()).unwrap_or(0)
    }

    // getters
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn profile_members(&self) -> &BTreeMap<u32, BTreeSet<u32>> {
        &self.profile_members
    }
}

impl SampleRegistry for SampleDatabase {
    fn register_on_the_fly(&mut self, cancer_study_id: u32, sample_headers: &[String]) -> CollaboratorResult<usize> {
        let mut added = 0;
        for header in sample_headers.iter() {
            if is_normal(header) {
                trace!("Skipping normal sample {header}");
                continue;
            }
            let stable_id = sample_stable_id(header);
            if stable_id.is_empty() || self.sample_by_stable_id(cancer_study_id, &stable_id).is_some() {
                continue;
            }
            self.add_sample(cancer_study_id, header)?;
            added += 1;
        }
        Ok(added)
    }

    fn sample_by_stable_id(&self, cancer_study_id: u32, stable_id: &str) -> Option<Sample> {
        self.sample_index.get(&(cancer_study_id, stable_id.to_string()))
            .map(|&index| self.samples[index].clone())
    }

    fn sample_in_profile(&self, internal_sample_id: u32, genetic_profile_id: u32) -> bool {
        self.profile_members.get(&genetic_profile_id)
            .map(|members| members.contains(&internal_sample_id))
            .unwrap_or(false)
    }

    fn add_sample_to_profile(&mut self, internal_sample_id: u32, genetic_profile_id: u32) -> CollaboratorResult<()> {
        self.profile_members.entry(genetic_profile_id).or_default().insert(internal_sample_id);
        Ok(())
    }

    fn set_profile_samples(&mut self, genetic_profile_id: u32, ordered_samples: &[u32]) -> CollaboratorResult<()> {
        self.profile_samples.insert(genetic_profile_id, ordered_samples.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_register_on_the_fly() {
        let mut database = SampleDatabase::new();
        let added = database.register_on_the_fly(1, &headers(&[
            "TCGA-A1-A0SB-01A", "TCGA-A1-A0SB-11A", "TCGA-A1-A0SB-06", "S1"
        ])).unwrap();

        // the normal sample is skipped, the two tumor samples share a patient
        assert_eq!(added, 3);
        assert_eq!(database.samples().len(), 3);
        assert_eq!(database.patients().len(), 2);

        let sample = database.sample_by_stable_id(1, "TCGA-A1-A0SB-01").unwrap();
        let metastasis = database.sample_by_stable_id(1, "TCGA-A1-A0SB-06").unwrap();
        assert_eq!(sample.internal_patient_id(), metastasis.internal_patient_id());
        assert!(database.sample_by_stable_id(1, "TCGA-A1-A0SB-11").is_none());

        // registering again is a no-op, and studies are separate
        assert_eq!(database.register_on_the_fly(1, &headers(&["S1"])).unwrap(), 0);
        assert!(database.sample_by_stable_id(2, "S1").is_none());
        assert_eq!(database.register_on_the_fly(2, &headers(&["S1"])).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_sample() {
        let mut database = SampleDatabase::new();
        database.add_sample(1, "S1").unwrap();
        assert!(database.add_sample(1, "S1").is_err());
    }

    #[test]
    fn test_profile_membership() {
        let mut database = SampleDatabase::new();
        let s1 = database.add_sample(1, "S1").unwrap();
        let s2 = database.add_sample(1, "S2").unwrap();
        assert!(!database.sample_in_profile(s1.internal_id(), 7));
        database.add_sample_to_profile(s1.internal_id(), 7).unwrap();
        database.add_sample_to_profile(s1.internal_id(), 7).unwrap();
        assert!(database.sample_in_profile(s1.internal_id(), 7));
        assert!(!database.sample_in_profile(s2.internal_id(), 7));
        assert_eq!(database.profile_member_count(7), 1);

        database.set_profile_samples(7, &[s2.internal_id(), s1.internal_id()]).unwrap();
        assert_eq!(database.profile_samples(7), Some(&vec![2, 1]));
    }

    #[test]
    fn test_save_load() {
        let mut database = SampleDatabase::new();
        database.register_on_the_fly(3, &headers(&["S1", "S2"])).unwrap();
        database.add_sample_to_profile(1, 9).unwrap();

        let tmp_dir = tempfile::tempdir().unwrap();
        let filename = tmp_dir.path().join("samples.json");
        database.save(&filename).unwrap();
        let mut loaded = SampleDatabase::load(&filename).unwrap();
        assert_eq!(loaded.samples(), database.samples());
        assert!(loaded.sample_in_profile(1, 9));
        assert_eq!(loaded.sample_by_stable_id(3, "S2").unwrap().internal_id(), 2);

        // ids keep counting after a reload
        let sample = loaded.add_sample(3, "S3").unwrap();
        assert_eq!(sample.internal_id(), 3);
        assert_eq!(sample.internal_patient_id(), 3);
    }
}
