//! Card catalog record types

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const PAGE_FOUND: &str = "Page Found";
pub const CARD_NAME: &str = "Card Name";
pub const CARD_DESCRIPTION: &str = "Card Description";

/// Attributes scraped from one card page, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRecord {
    fields: Vec<(String, String)>,
}

impl CardRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for CardRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// What happened on one listing page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageReport {
    pub page: u32,
    pub urls_found: usize,
    /// Extra listing attempts after the first
    pub redo_iterations: u32,
    pub cards_failed: usize,
    pub had_error: bool,
    pub checkpoint: Option<PathBuf>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages: Vec<PageReport>,
    pub urls_found: usize,
    pub cards_scraped: usize,
    pub cards_failed: usize,
    pub card_table: PathBuf,
    pub url_list: PathBuf,
}

impl ScrapeSummary {
    pub fn checkpoints(&self) -> impl Iterator<Item = &PathBuf> {
        self.pages.iter().filter_map(|p| p.checkpoint.as_ref())
    }

    /// Pages that ended with no card URLs at all.
    pub fn empty_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages
            .iter()
            .filter(|p| p.urls_found == 0)
            .map(|p| p.page)
    }
}
