use chrono::{Days, NaiveDate};

use super::book::ItineraryBook;
use crate::domain::DateEntry;
use crate::errors::{Result, TripError};

/// Ordered, duplicate-free trip days plus the entries stored for each of them.
///
/// The range only grows by one day past either end, and it always keeps at
/// least one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeManager {
    dates: Vec<DateEntry>,
    selected: NaiveDate,
    book: ItineraryBook,
}

/// What a successful day deletion removed and what is selected afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedDay {
    pub date: DateEntry,
    pub removed_entries: usize,
    pub selected: NaiveDate,
}

impl DateRangeManager {
    /// `days` consecutive days starting at `start`, each with an empty list.
    pub fn new(start: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(TripError::Validation("a trip needs at least one day".into()));
        }
        let mut dates = Vec::with_capacity(days as usize);
        let mut book = ItineraryBook::new();
        for offset in 0..days {
            let date = start
                .checked_add_days(Days::new(offset.into()))
                .ok_or_else(|| out_of_calendar(start))?;
            book.ensure_day(date);
            dates.push(DateEntry::new(date));
        }
        Ok(Self {
            dates,
            selected: start,
            book,
        })
    }

    /// Rebuilds the range from the days present in `book`, falling back to
    /// `new(start, days)` when the book holds no days at all.
    pub fn from_book(book: ItineraryBook, start: NaiveDate, days: u32) -> Result<Self> {
        let mut manager = Self::new(start, days)?;
        if book.day_count() > 0 {
            manager.replace_book(book);
        }
        Ok(manager)
    }

    pub fn dates(&self) -> &[DateEntry] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> DateEntry {
        self.dates[0]
    }

    pub fn last(&self) -> DateEntry {
        self.dates[self.dates.len() - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.position(date).is_some()
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn select(&mut self, date: NaiveDate) -> Result<()> {
        if !self.contains(date) {
            return Err(TripError::DateNotFound(date.to_string()));
        }
        self.selected = date;
        Ok(())
    }

    pub fn book(&self) -> &ItineraryBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut ItineraryBook {
        &mut self.book
    }

    /// Adds the day after the current last one and selects it.
    pub fn append_day(&mut self) -> Result<DateEntry> {
        let last = self.last().date();
        let next = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| out_of_calendar(last))?;
        let entry = DateEntry::new(next);
        self.dates.push(entry);
        self.book.ensure_day(next);
        self.selected = next;
        tracing::debug!(date = %entry.full_date(), "appended trip day");
        Ok(entry)
    }

    /// Adds the day before the current first one and selects it.
    pub fn prepend_day(&mut self) -> Result<DateEntry> {
        let first = self.first().date();
        let previous = first
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| out_of_calendar(first))?;
        let entry = DateEntry::new(previous);
        self.dates.insert(0, entry);
        self.book.ensure_day(previous);
        self.selected = previous;
        tracing::debug!(date = %entry.full_date(), "prepended trip day");
        Ok(entry)
    }

    /// Fails with [`TripError::LastDateRemaining`] when only one day is left.
    pub fn ensure_deletable(&self) -> Result<()> {
        if self.dates.len() <= 1 {
            return Err(TripError::LastDateRemaining);
        }
        Ok(())
    }

    /// Removes `target` and its entries. Unknown dates leave everything untouched
    /// and return `Ok(None)`.
    ///
    /// Afterwards the day that slid into the removed slot is selected, or the
    /// new last day when the removed day was last.
    pub fn delete_day(&mut self, target: NaiveDate) -> Result<Option<DeletedDay>> {
        self.ensure_deletable()?;
        let Some(idx) = self.position(target) else {
            return Ok(None);
        };
        let date = self.dates.remove(idx);
        let removed_entries = self.book.remove_day(target).map_or(0, |entries| entries.len());
        let new_idx = idx.min(self.dates.len() - 1);
        self.selected = self.dates[new_idx].date();
        tracing::debug!(
            date = %date.full_date(),
            removed_entries,
            selected = %self.selected,
            "deleted trip day"
        );
        Ok(Some(DeletedDay {
            date,
            removed_entries,
            selected: self.selected,
        }))
    }

    /// Swaps in a whole new book and rebuilds the range from its days.
    ///
    /// A book without days keeps the current range and seeds empty lists for it.
    pub fn replace_book(&mut self, book: ItineraryBook) {
        self.book.replace_with(book);
        if self.book.day_count() == 0 {
            for entry in &self.dates {
                self.book.ensure_day(entry.date());
            }
            return;
        }
        self.dates = self.book.dates().map(DateEntry::new).collect();
        if !self.contains(self.selected) {
            self.selected = self.dates[0].date();
        }
    }

    fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|entry| entry.date() == date)
    }
}

fn out_of_calendar(date: NaiveDate) -> TripError {
    TripError::Validation(format!("no calendar day beyond {date}"))
}
