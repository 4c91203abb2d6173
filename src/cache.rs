//! Caller-owned cache of loaded goal series
//!
//! A dashboard render reads the same few tables for many cards. The cache is
//! keyed by [`SeriesSource`], which carries both the storage identity and the
//! load parameters, and is only invalidated when the owner asks.

use crate::error::LoadError;
use crate::series::{load_series, GoalSeries, SeriesSource};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<SeriesSource, GoalSeries>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached series for `source`, loading it on first use
    pub fn get_or_load(&mut self, source: &SeriesSource) -> Result<&GoalSeries, LoadError> {
        self.get_or_insert_with(source, load_series)
    }

    /// Cached series for `source`, calling `loader` on a miss.
    /// A failed load leaves the cache untouched.
    pub fn get_or_insert_with<F>(&mut self, source: &SeriesSource, loader: F) -> Result<&GoalSeries, LoadError>
    where
        F: FnOnce(&SeriesSource) -> Result<GoalSeries, LoadError>,
    {
        match self.entries.entry(source.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!("Series cache miss for {}", source.path.display());
                let series = loader(source)?;
                Ok(entry.insert(series))
            }
        }
    }

    pub fn get(&self, source: &SeriesSource) -> Option<&GoalSeries> {
        self.entries.get(source)
    }

    /// Drop one cached series; returns whether it was cached
    pub fn invalidate(&mut self, source: &SeriesSource) -> bool {
        self.entries.remove(source).is_some()
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
