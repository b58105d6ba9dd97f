
use serde::{Deserialize, Serialize};

use crate::data_types::import_const::{AMPLIFICATION, HOMOZYGOUS_DELETION, PARTIAL_DELETION};

/// The discrete copy-number calls that are tracked as events
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::Display, strum_macros::EnumIter)]
pub enum CnaAlteration {
    #[strum(to_string = "HOMDEL")]
    HomozygousDeletion,
    #[strum(to_string = "AMP")]
    Amplification
}

impl CnaAlteration {
    /// Parses a raw matrix value into an event-producing alteration, if it is one.
    /// Partial deletions are folded into homozygous deletions; every other code is not an event.
    /// # Arguments
    /// * `value` - the raw cell value
    pub fn from_value(value: &str) -> Option<Self> {
        match normalize_cna_value(value) {
            AMPLIFICATION => Some(CnaAlteration::Amplification),
            HOMOZYGOUS_DELETION => Some(CnaAlteration::HomozygousDeletion),
            _ => None
        }
    }

    /// The discrete code as written to storage
    pub fn code(&self) -> i16 {
        match self {
            CnaAlteration::HomozygousDeletion => -2,
            CnaAlteration::Amplification => 2
        }
    }
}

/// Legacy partial deletions are stored as homozygous deletions, anything else is untouched
pub fn normalize_cna_value(value: &str) -> &str {
    if value == PARTIAL_DELETION {
        HOMOZYGOUS_DELETION
    } else {
        value
    }
}

/// The identity of a CNA event; the sample is deliberately absent
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CnaEventKey {
    pub genetic_profile_id: u32,
    pub entrez_gene_id: i64,
    pub alteration: CnaAlteration
}

/// A single sample exhibiting a CNA event
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CnaEvent {
    /// Internal id of the sample with the call
    sample_id: u32,
    /// What makes two events the same
    key: CnaEventKey,
    /// Assigned once the event has been resolved against known events
    event_id: Option<u64>
}

impl CnaEvent {
    /// Constructor
    pub fn new(sample_id: u32, genetic_profile_id: u32, entrez_gene_id: i64, alteration: CnaAlteration) -> Self {
        Self {
            sample_id,
            key: CnaEventKey {
                genetic_profile_id,
                entrez_gene_id,
                alteration
            },
            event_id: None
        }
    }

    pub fn set_event_id(&mut self, event_id: u64) {
        self.event_id = Some(event_id);
    }

    // getters
    pub fn sample_id(&self) -> u32 {
        self.sample_id
    }

    pub fn key(&self) -> &CnaEventKey {
        &self.key
    }

    pub fn event_id(&self) -> Option<u64> {
        self.event_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(CnaAlteration::from_value("2"), Some(CnaAlteration::Amplification));
        assert_eq!(CnaAlteration::from_value("-2"), Some(CnaAlteration::HomozygousDeletion));
        assert_eq!(CnaAlteration::from_value("-1.5"), Some(CnaAlteration::HomozygousDeletion));
        for value in ["1", "0", "-1", "NA", "", "2.0"] {
            assert_eq!(CnaAlteration::from_value(value), None);
        }
        assert_eq!(CnaAlteration::Amplification.code(), 2);
        assert_eq!(CnaAlteration::HomozygousDeletion.to_string(), "HOMDEL");
    }

    #[test]
    fn test_event_key_ignores_sample() {
        let e1 = CnaEvent::new(1, 5, 672, CnaAlteration::Amplification);
        let e2 = CnaEvent::new(2, 5, 672, CnaAlteration::Amplification);
        assert_ne!(e1, e2);
        assert_eq!(e1.key(), e2.key());
    }
}
