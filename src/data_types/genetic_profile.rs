
use serde::{Deserialize, Serialize};

use crate::data_types::import_const::COMPOSITE_ELEMENT_REF;

/// The kind of data a genetic profile holds, mirrors the portal alteration types
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneticAlterationType {
    CopyNumberAlteration,
    MrnaExpression,
    MicroRnaExpression,
    ProteinLevel,
    Methylation,
    MutationExtended,
    Generic
}

/// Destination dataset for a single import run, e.g. "mRNA expression, study X"
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeneticProfile {
    /// Internal profile identifier
    genetic_profile_id: u32,
    /// Stable identifier, e.g. "brca_tcga_gistic"
    stable_id: String,
    /// The internal id of the parent study
    cancer_study_id: u32,
    /// What the values in this profile represent
    genetic_alteration_type: GeneticAlterationType,
    /// Discretized CNA profiles are only the ones shown in the analysis tab
    #[serde(default)]
    show_profile_in_analysis_tab: bool,
    /// Display name
    #[serde(default)]
    profile_name: String
}

impl GeneticProfile {
    /// Constructor
    pub fn new(
        genetic_profile_id: u32, stable_id: &str, cancer_study_id: u32,
        genetic_alteration_type: GeneticAlterationType, show_profile_in_analysis_tab: bool
    ) -> Self {
        Self {
            genetic_profile_id,
            stable_id: stable_id.to_string(),
            cancer_study_id,
            genetic_alteration_type,
            show_profile_in_analysis_tab,
            profile_name: stable_id.to_string()
        }
    }

    /// Determines how rows of this profile are processed given the header of the file being imported.
    /// # Arguments
    /// * `header_fields` - the tab-split header line of the input matrix
    pub fn profile_kind(&self, header_fields: &[&str]) -> ProfileKind {
        match self.genetic_alteration_type {
            GeneticAlterationType::CopyNumberAlteration if self.show_profile_in_analysis_tab => ProfileKind::DiscretizedCna,
            GeneticAlterationType::ProteinLevel => {
                // RPPA files always lead with the antibody reference column
                let leads_with_composite = header_fields.first()
                    .map(|h| h.trim().eq_ignore_ascii_case(COMPOSITE_ELEMENT_REF))
                    .unwrap_or(false);
                if leads_with_composite {
                    ProfileKind::AntibodyArray
                } else {
                    ProfileKind::Continuous
                }
            },
            GeneticAlterationType::MicroRnaExpression => ProfileKind::MicroRna,
            _ => ProfileKind::Continuous
        }
    }

    // getters
    pub fn genetic_profile_id(&self) -> u32 {
        self.genetic_profile_id
    }

    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    pub fn cancer_study_id(&self) -> u32 {
        self.cancer_study_id
    }

    pub fn genetic_alteration_type(&self) -> GeneticAlterationType {
        self.genetic_alteration_type
    }

    pub fn show_profile_in_analysis_tab(&self) -> bool {
        self.show_profile_in_analysis_tab
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }
}

/// Processing branch for a profile, this drives header requirements and the per-row policy
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display)]
pub enum ProfileKind {
    /// Discrete copy-number calls that also produce CNA events
    #[strum(to_string = "discretized CNA")]
    DiscretizedCna,
    /// Reverse-phase protein array, rows are antibodies
    #[strum(to_string = "antibody array")]
    AntibodyArray,
    /// Micro-RNA expression, ambiguous rows are duplicated
    #[strum(to_string = "microRNA")]
    MicroRna,
    /// Any other value matrix, values are stored opaquely
    #[strum(to_string = "continuous")]
    Continuous
}

impl ProfileKind {
    /// If true, a row resolving to several genes stores its values for each of them
    pub fn allows_multiple_genes(&self) -> bool {
        matches!(self, ProfileKind::AntibodyArray | ProfileKind::MicroRna)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_kind() {
        let cna = GeneticProfile::new(1, "study_gistic", 10, GeneticAlterationType::CopyNumberAlteration, true);
        assert_eq!(cna.profile_kind(&["Hugo_Symbol", "S1"]), ProfileKind::DiscretizedCna);

        // continuous CNA (e.g. log2) is not shown in the analysis tab
        let log2 = GeneticProfile::new(2, "study_log2CNA", 10, GeneticAlterationType::CopyNumberAlteration, false);
        assert_eq!(log2.profile_kind(&["Hugo_Symbol", "S1"]), ProfileKind::Continuous);

        let rppa = GeneticProfile::new(3, "study_rppa", 10, GeneticAlterationType::ProteinLevel, false);
        assert_eq!(rppa.profile_kind(&["composite.element.ref", "S1"]), ProfileKind::AntibodyArray);
        assert_eq!(rppa.profile_kind(&["Hugo_Symbol", "S1"]), ProfileKind::Continuous);

        let mirna = GeneticProfile::new(4, "study_mirna", 10, GeneticAlterationType::MicroRnaExpression, false);
        assert_eq!(mirna.profile_kind(&["Hugo_Symbol", "S1"]), ProfileKind::MicroRna);
        assert!(ProfileKind::MicroRna.allows_multiple_genes());
        assert!(!ProfileKind::DiscretizedCna.allows_multiple_genes());
    }

    #[test]
    fn test_profile_json() {
        let json = r#"{
            "genetic_profile_id": 7,
            "stable_id": "brca_tcga_gistic",
            "cancer_study_id": 2,
            "genetic_alteration_type": "COPY_NUMBER_ALTERATION",
            "show_profile_in_analysis_tab": true
        }"#;
        let profile: GeneticProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.genetic_profile_id(), 7);
        assert_eq!(profile.genetic_alteration_type(), GeneticAlterationType::CopyNumberAlteration);
        assert_eq!(profile.genetic_alteration_type().to_string(), "COPY_NUMBER_ALTERATION");
        assert!(profile.profile_name().is_empty());
    }
}
