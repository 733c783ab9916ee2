use std::collections::HashMap;

use anyhow::{Context, Result};

use super::normalize::normalize;

/// Known alternate renderings of canonical participant names.
///
/// Keys and aliases are stored normalized, so lookups are insensitive to
/// case, punctuation and club-type noise tokens. The table is immutable
/// seed data passed into the matcher at construction; it can be replaced
/// wholesale from a JSON file (`{"canonical": ["alias", ...], ...}`)
/// without touching code.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in seed table covering participants the two feeds are known
    /// to render differently.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.insert("Barcelona", &["Barca", "FC Barcelona Handball"]);
        table.insert("Real Madrid", &["Real"]);
        table.insert("Paris Saint-Germain", &["PSG", "Paris SG", "PSG Handball"]);
        table.insert("Bayern Munich", &["Bayern", "FC Bayern München"]);
        table.insert("Novak Djokovic", &["Djokovic N.", "N. Djokovic", "Djokovic"]);
        table.insert("Rafael Nadal", &["Nadal R.", "R. Nadal", "Nadal"]);
        table.insert("Roger Federer", &["Federer R.", "Federer"]);
        table.insert("Timo Boll", &["Boll T.", "T. Boll", "Boll"]);
        table.insert("Ma Long", &["Long M.", "Ma L."]);
        table
    }

    /// Load a table from a JSON file on disk.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias file {path}"))?;
        Self::from_json(&json)
    }

    /// Parse a table from its JSON file format.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(json).context("Failed to parse alias table JSON")?;
        let mut table = Self::new();
        for (canonical, aliases) in raw {
            let aliases: Vec<&str> = aliases.iter().map(String::as_str).collect();
            table.insert(&canonical, &aliases);
        }
        Ok(table)
    }

    /// Register aliases for a canonical name. Aliases that normalize to
    /// nothing are dropped.
    pub fn insert(&mut self, canonical: &str, aliases: &[&str]) {
        let key = normalize(canonical);
        if key.is_empty() {
            return;
        }
        let entry = self.entries.entry(key).or_default();
        for alias in aliases {
            let norm = normalize(alias);
            if !norm.is_empty() && !entry.contains(&norm) {
                entry.push(norm);
            }
        }
    }

    /// True when one name is a canonical key whose alias list contains the
    /// other's normalized form, in either direction. Used as a
    /// max-confidence fast path before fuzzy scoring.
    pub fn are_aliases(&self, a: &str, b: &str) -> bool {
        let norm_a = normalize(a);
        let norm_b = normalize(b);
        if norm_a.is_empty() || norm_b.is_empty() {
            return false;
        }
        self.lists(&norm_a, &norm_b) || self.lists(&norm_b, &norm_a)
    }

    fn lists(&self, canonical: &str, candidate: &str) -> bool {
        self.entries
            .get(canonical)
            .is_some_and(|aliases| aliases.iter().any(|alias| alias == candidate))
    }
}
