use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ItineraryEntry;
use crate::errors::{Result, TripError};

/// Per-day activity lists keyed by calendar date.
///
/// Lookups go by date equality only; callers must not depend on key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItineraryBook {
    days: BTreeMap<NaiveDate, Vec<ItineraryEntry>>,
}

const SAMPLE_ITINERARY: &str = include_str!("sample_itinerary.json");

impl ItineraryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Five-day Kansai plan offered to first-time users.
    pub fn sample() -> Result<Self> {
        Ok(serde_json::from_str(SAMPLE_ITINERARY)?)
    }

    pub fn contains_day(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Creates an empty list for `date` unless one already exists. Returns `true` if created.
    pub fn ensure_day(&mut self, date: NaiveDate) -> bool {
        if self.days.contains_key(&date) {
            return false;
        }
        self.days.insert(date, Vec::new());
        true
    }

    /// Drops the day and every entry in it.
    pub fn remove_day(&mut self, date: NaiveDate) -> Option<Vec<ItineraryEntry>> {
        self.days.remove(&date)
    }

    pub fn day(&self, date: NaiveDate) -> &[ItineraryEntry] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn entry_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.days.values().flatten().map(|entry| entry.id).max()
    }

    pub fn add_entry(&mut self, date: NaiveDate, entry: ItineraryEntry) {
        self.days.entry(date).or_default().push(entry);
    }

    /// Replaces the entry with the same id in place, keeping its position.
    pub fn update_entry(&mut self, date: NaiveDate, entry: ItineraryEntry) -> Result<()> {
        let slot = self
            .days
            .get_mut(&date)
            .and_then(|entries| entries.iter_mut().find(|existing| existing.id == entry.id))
            .ok_or_else(|| TripError::EntryNotFound {
                date: date.to_string(),
                id: entry.id,
            })?;
        *slot = entry;
        Ok(())
    }

    pub fn find_entry(&self, date: NaiveDate, id: i64) -> Option<&ItineraryEntry> {
        self.day(date).iter().find(|entry| entry.id == id)
    }

    pub fn remove_entry(&mut self, date: NaiveDate, id: i64) -> Result<ItineraryEntry> {
        let not_found = || TripError::EntryNotFound {
            date: date.to_string(),
            id,
        };
        let entries = self.days.get_mut(&date).ok_or_else(not_found)?;
        let idx = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(not_found)?;
        Ok(entries.remove(idx))
    }

    /// Moves the entry at `from` so it ends up at index `to`, shifting the rest.
    pub fn move_entry(&mut self, date: NaiveDate, from: usize, to: usize) -> Result<()> {
        let entries = self
            .days
            .get_mut(&date)
            .ok_or_else(|| TripError::DateNotFound(date.to_string()))?;
        let len = entries.len();
        if from >= len || to >= len {
            return Err(TripError::Validation(format!(
                "cannot move entry {from} to {to}: {date} has {len} entries"
            )));
        }
        let entry = entries.remove(from);
        entries.insert(to, entry);
        Ok(())
    }

    /// Clears every day, then takes all days from `other`.
    pub fn replace_with(&mut self, other: ItineraryBook) {
        self.days.clear();
        self.days.extend(other.days);
    }
}
