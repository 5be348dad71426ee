//! Whole-trip backup files: one JSON document with `itinerary`, `shopping`, and `expenses`.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::utils::write_atomic;
use crate::domain::{ExpenseRecord, ShoppingItem};
use crate::errors::{Result, TripError};
use crate::itinerary::ItineraryBook;
use crate::ledger::ExpenseLedger;
use crate::shopping::ShoppingList;

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub itinerary: &'a ItineraryBook,
    pub shopping: &'a ShoppingList,
    pub expenses: &'a ExpenseLedger,
}

impl ExportDocument<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parsed backup. A section that is absent (or `null`) leaves the matching store alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportPayload {
    #[serde(default)]
    pub itinerary: Option<ItineraryBook>,
    #[serde(default)]
    pub shopping: Option<Vec<ShoppingItem>>,
    #[serde(default)]
    pub expenses: Option<Vec<ExpenseRecord>>,
}

impl ImportPayload {
    /// Names of the sections this payload will overwrite.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self.itinerary.is_some() {
            sections.push("itinerary");
        }
        if self.shopping.is_some() {
            sections.push("shopping");
        }
        if self.expenses.is_some() {
            sections.push("expenses");
        }
        sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// Parses a backup document. Any syntax or shape problem rejects the whole file.
pub fn parse_import(raw: &str) -> Result<ImportPayload> {
    serde_json::from_str(raw).map_err(|err| TripError::MalformedImport(err.to_string()))
}

pub fn read_import(path: &Path) -> Result<ImportPayload> {
    let raw = fs::read_to_string(path)?;
    parse_import(&raw)
}

pub fn write_export(path: &Path, document: &ExportDocument<'_>) -> Result<()> {
    write_atomic(path, &document.to_json()?)
}

/// `<prefix>_<YYYY-MM-DD>.json`
pub fn export_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{}_{}.json", prefix, today.format("%Y-%m-%d"))
}
