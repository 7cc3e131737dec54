//! Local request cache with last-fetch-wins reconciliation
//!
//! Server fetches are authoritative. Optimistic patches record which fetch
//! generation they were based on; if a newer fetch landed in between, the
//! patch is dropped instead of overwriting fresher server truth.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::ExchangeRequest;

#[derive(Debug, Clone)]
struct Entry {
    request: ExchangeRequest,
    /// Generation of the fetch that last confirmed this entry.
    synced_gen: u64,
    synced_at: DateTime<Utc>,
    /// Set while the entry carries an optimistic patch not yet confirmed by
    /// a fetch.
    dirty: bool,
}

/// Cache of exchange requests keyed by request id.
#[derive(Debug, Default)]
pub struct RequestCache {
    entries: HashMap<String, Entry>,
    generation: u64,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a server-confirmed copy of a request. Always wins; clears any
    /// optimistic patch. Returns the new sync generation.
    pub fn sync(&mut self, request: ExchangeRequest) -> u64 {
        self.generation += 1;
        self.entries.insert(
            request.id.clone(),
            Entry {
                request,
                synced_gen: self.generation,
                synced_at: Utc::now(),
                dirty: false,
            },
        );
        self.generation
    }

    /// Record a whole fetched list in one pass.
    pub fn sync_all(&mut self, requests: Vec<ExchangeRequest>) {
        for request in requests {
            self.sync(request);
        }
    }

    /// Apply an optimistic patch that was computed against the entry as of
    /// `based_on`. Returns false (and leaves the entry alone) when a newer
    /// fetch has since replaced it.
    pub fn patch_if_current(&mut self, request: ExchangeRequest, based_on: u64) -> bool {
        match self.entries.get_mut(&request.id) {
            Some(entry) if entry.synced_gen <= based_on => {
                entry.request = request;
                entry.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ExchangeRequest> {
        self.entries.get(id).map(|e| &e.request)
    }

    /// Sync generation of an entry, used as the `based_on` marker for a
    /// patch computed from it.
    pub fn generation_of(&self, id: &str) -> Option<u64> {
        self.entries.get(id).map(|e| e.synced_gen)
    }

    pub fn synced_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(id).map(|e| e.synced_at)
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.entries.get(id).map(|e| e.dirty).unwrap_or(false)
    }

    pub fn remove(&mut self, id: &str) -> Option<ExchangeRequest> {
        self.entries.remove(id).map(|e| e.request)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
