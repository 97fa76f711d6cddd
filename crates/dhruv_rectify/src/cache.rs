//! Probe memoization for one rectification call.
//!
//! Passes overlap: the centre of pass `n + 1` was already probed in pass
//! `n`, and narrowing windows revisit the same instants. Keys are whole
//! milliseconds plus the bit patterns of the coordinates.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dhruv_vedic_base::GeoLocation;

use crate::search_types::BirthCandidate;

type ProbeKey = (i64, u64, u64);

fn key(time: DateTime<Utc>, location: &GeoLocation) -> ProbeKey {
    (
        time.timestamp_millis(),
        location.latitude_deg.to_bits(),
        location.longitude_deg.to_bits(),
    )
}

/// Concurrent map of scored candidates. No eviction.
#[derive(Debug, Default)]
pub struct ProbeCache {
    entries: DashMap<ProbeKey, Arc<BirthCandidate>>,
    hits: AtomicUsize,
}

impl ProbeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, time: DateTime<Utc>, location: &GeoLocation) -> Option<Arc<BirthCandidate>> {
        let found = self
            .entries
            .get(&key(time, location))
            .map(|entry| Arc::clone(entry.value()));
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, location: &GeoLocation, candidate: Arc<BirthCandidate>) {
        self.entries
            .insert(key(candidate.test_time, location), candidate);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RectifyConfig;
    use crate::search::DefaultEngine;
    use chrono::TimeZone;

    fn scored(time: DateTime<Utc>, location: &GeoLocation) -> Arc<BirthCandidate> {
        let engine = DefaultEngine::with_defaults(RectifyConfig::default()).unwrap();
        Arc::new(engine.evaluate_at(time, location, &[]).unwrap())
    }

    #[test]
    fn hit_after_insert() {
        let cache = ProbeCache::new();
        let delhi = GeoLocation::new(28.6139, 77.209).unwrap();
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        assert!(cache.get(t, &delhi).is_none());
        assert_eq!(cache.hits(), 0);

        cache.insert(&delhi, scored(t, &delhi));
        let found = cache.get(t, &delhi).expect("cached");
        assert_eq!(found.test_time, t);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keyed_by_place_and_millisecond() {
        let cache = ProbeCache::new();
        let delhi = GeoLocation::new(28.6139, 77.209).unwrap();
        let mumbai = GeoLocation::new(19.076, 72.8777).unwrap();
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        cache.insert(&delhi, scored(t, &delhi));

        assert!(cache.get(t, &mumbai).is_none());
        assert!(cache.get(t + chrono::TimeDelta::milliseconds(1), &delhi).is_none());
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn clear_resets_entries_and_hits() {
        let cache = ProbeCache::new();
        let delhi = GeoLocation::new(28.6139, 77.209).unwrap();
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        cache.insert(&delhi, scored(t, &delhi));
        let _ = cache.get(t, &delhi);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
    }
}
