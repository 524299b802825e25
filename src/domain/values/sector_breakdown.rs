//! Quantity totals per sector, kept in first-seen order so the pie chart
//! and the JSON map line up with the order holdings were submitted in.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorBreakdown {
    entries: Vec<(String, i64)>,
}

impl SectorBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sector: &str, quantity: i64) {
        match self.entries.iter_mut().find(|(s, _)| s == sector) {
            Some((_, total)) => *total += quantity,
            None => self.entries.push((sector.to_string(), quantity)),
        }
    }

    pub fn get(&self, sector: &str) -> Option<i64> {
        self.entries.iter().find(|(s, _)| s == sector).map(|(_, q)| *q)
    }

    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, q)| q).sum()
    }

    /// Share of each sector in percent, same order as `entries`.
    pub fn shares(&self) -> Vec<(String, f64)> {
        let total = self.total();
        if total <= 0 {
            return vec![];
        }
        self.entries
            .iter()
            .map(|(s, q)| (s.clone(), *q as f64 / total as f64 * 100.0))
            .collect()
    }

    /// Compact `{"IT": 10, "Banking": 5}` form used in prompts.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.entries.iter().map(|(s, q)| format!("\"{s}\": {q}")).collect();
        format!("{{{}}}", parts.join(", "))
    }
}

impl Serialize for SectorBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (sector, qty) in &self.entries {
            map.serialize_entry(sector, qty)?;
        }
        map.end()
    }
}
