use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::IntentRecord;

/// On-disk shape of the intent file: `{ "intents": [ ... ] }`.
#[derive(Debug, Deserialize)]
struct IntentFile {
    intents: Vec<IntentRecord>,
}

/// The full FAQ rule set, loaded once at startup and immutable after.
///
/// Record order is load order and it matters: the matcher resolves
/// first-match-wins, so earlier records shadow later ones.
#[derive(Debug, Clone)]
pub struct IntentTable {
    records: Vec<IntentRecord>,
}

impl IntentTable {
    pub fn new(records: Vec<IntentRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: IntentFile =
            serde_json::from_str(raw).context("intent file is not valid intent JSON")?;
        Ok(Self::new(file.intents))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading intent file: {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("failed parsing intent file: {}", path.display()))
    }

    pub fn records(&self) -> &[IntentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
