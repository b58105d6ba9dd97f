
use serde::{Deserialize, Serialize};

/// A registered patient within a study
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Patient {
    internal_id: u32,
    stable_id: String,
    cancer_study_id: u32
}

impl Patient {
    pub fn new(internal_id: u32, stable_id: &str, cancer_study_id: u32) -> Self {
        Self {
            internal_id,
            stable_id: stable_id.to_string(),
            cancer_study_id
        }
    }

    // getters
    pub fn internal_id(&self) -> u32 {
        self.internal_id
    }

    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    pub fn cancer_study_id(&self) -> u32 {
        self.cancer_study_id
    }
}

/// A registered sample, the target of one value column in a matrix
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sample {
    internal_id: u32,
    stable_id: String,
    internal_patient_id: u32,
    cancer_study_id: u32
}

impl Sample {
    pub fn new(internal_id: u32, stable_id: &str, internal_patient_id: u32, cancer_study_id: u32) -> Self {
        Self {
            internal_id,
            stable_id: stable_id.to_string(),
            internal_patient_id,
            cancer_study_id
        }
    }

    // getters
    pub fn internal_id(&self) -> u32 {
        self.internal_id
    }

    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    pub fn internal_patient_id(&self) -> u32 {
        self.internal_patient_id
    }

    pub fn cancer_study_id(&self) -> u32 {
        self.cancer_study_id
    }
}
