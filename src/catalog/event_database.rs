
use log::debug;
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use simple_error::bail;
use std::collections::BTreeSet;
use std::path::Path;

use crate::catalog::{CollaboratorResult, EventStore};
use crate::data_types::cna_event::CnaEventKey;
use crate::util::file_io::{load_json, save_json};

/// A canonical event with its minted identity
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CanonicalEvent {
    pub event_id: u64,
    #[serde(flatten)]
    pub key: CnaEventKey
}

/// JSON-backed store of canonical CNA events and the samples associated with each.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CnaEventDatabase {
    /// Every canonical event
    events: Vec<CanonicalEvent>,
    /// (internal sample id, event id) pairs
    case_events: BTreeSet<(u32, u64)>,
    /// key -> index into `events`
    #[serde(skip)]
    event_index: HashMap<CnaEventKey, usize>,
    /// event id -> number of associated samples
    #[serde(skip)]
    case_counts: HashMap<u64, usize>,
    /// Largest event id handed out so far
    #[serde(skip)]
    max_event_id: u64
}

impl CnaEventDatabase {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads the store from JSON.
    /// # Errors
    /// * if the file cannot be loaded
    /// * if an event key or identity is duplicated
    pub fn load(filename: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut database: CnaEventDatabase = load_json(filename)?;
        database.rebuild_index()?;
        debug!("Loaded {} CNA events with {} case associations", database.events.len(), database.case_events.len());
        Ok(database)
    }

    fn rebuild_index(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.event_index.clear();
        self.case_counts.clear();
        self.max_event_id = 0;
        for (i, event) in self.events.iter().enumerate() {
            if self.case_counts.insert(event.event_id, 0).is_some() {
                bail!("Duplicate CNA event id: {}", event.event_id);
            }
            if self.event_index.insert(event.key, i).is_some() {
                bail!("Duplicate CNA event key: {:?}", event.key);
            }
            self.max_event_id = self.max_event_id.max(event.event_id);
        }
        for (_, event_id) in self.case_events.iter() {
            match self.case_counts.get_mut(event_id) {
                Some(count) => *count += 1,
                None => bail!("Case association with unknown CNA event id: {event_id}")
            };
        }
        Ok(())
    }

    /// Saves the store to JSON.
    /// # Errors
    /// * if the file cannot be written
    pub fn save(&self, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
        save_json(self, filename)
    }

    /// The number of samples associated with an event
    pub fn case_count(&self, event_id: u64) -> usize {
        self.case_counts.get(&event_id).copied().unwrap_or(0)
    }

    // getters
    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    pub fn case_events(&self) -> &BTreeSet<(u32, u64)> {
        &self.case_events
    }
}

impl EventStore for CnaEventDatabase {
    fn all_events(&self) -> CollaboratorResult<Vec<(CnaEventKey, u64)>> {
        Ok(self.events.iter().map(|e| (e.key, e.event_id)).collect())
    }

    fn add_canonical_event(&mut self, key: &CnaEventKey) -> CollaboratorResult<u64> {
        if self.event_index.contains_key(key) {
            bail!("CNA event {key:?} already exists");
        }
        let event_id = self.max_event_id + 1;
        self.max_event_id = event_id;
        self.events.push(CanonicalEvent {
            event_id,
            key: *key
        });
        self.event_index.insert(*key, self.events.len() - 1);
        self.case_counts.insert(event_id, 0);
        Ok(event_id)
    }

    fn add_case_event(&mut self, internal_sample_id: u32, event_id: u64) -> CollaboratorResult<()> {
        let count = match self.case_counts.get_mut(&event_id) {
            Some(c) => c,
            None => bail!("Unknown CNA event id: {event_id}")
        };
        if self.case_events.insert((internal_sample_id, event_id)) {
            *count += 1;
        }
        Ok(())
    }
}
