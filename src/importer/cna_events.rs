
use log::debug;
use rustc_hash::FxHashMap as HashMap;

use crate::catalog::{CollaboratorResult, EventStore};
use crate::data_types::cna_event::{CnaEvent, CnaEventKey};

/// Identity cache of CNA events so that the same (profile, gene, alteration) always maps to one event id
#[derive(Debug, Default)]
pub struct CnaEventDeduplicator {
    known_events: HashMap<CnaEventKey, u64>,
    new_events: usize,
    reused_events: usize
}

impl CnaEventDeduplicator {
    /// Seeds the cache with every event that the store already has.
    /// # Errors
    /// * if the store fails to list its events
    pub fn seed(store: &dyn EventStore) -> CollaboratorResult<Self> {
        let known_events: HashMap<CnaEventKey, u64> = store.all_events()?.into_iter().collect();
        debug!("Seeded CNA event cache with {} events", known_events.len());
        Ok(Self {
            known_events,
            new_events: 0,
            reused_events: 0
        })
    }

    /// Assigns an event id to the event and records the sample association.
    /// Returns the event id and whether a new canonical event was created.
    /// # Errors
    /// * if the store fails to add the canonical event or the association
    pub fn resolve(&mut self, event: &mut CnaEvent, store: &mut dyn EventStore) -> CollaboratorResult<(u64, bool)> {
        let (event_id, is_new) = match self.known_events.get(event.key()) {
            Some(&event_id) => {
                self.reused_events += 1;
                (event_id, false)
            },
            None => {
                let event_id = store.add_canonical_event(event.key())?;
                self.known_events.insert(*event.key(), event_id);
                self.new_events += 1;
                (event_id, true)
            }
        };
        event.set_event_id(event_id);
        store.add_case_event(event.sample_id(), event_id)?;
        Ok((event_id, is_new))
    }

    // getters
    pub fn new_events(&self) -> usize {
        self.new_events
    }

    pub fn reused_events(&self) -> usize {
        self.reused_events
    }

    pub fn known_events(&self) -> usize {
        self.known_events.len()
    }
}
