use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Word returned when a classifier index is absent from the mapping
/// (stale artifact).
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Bijective word <-> dense class index mapping. Indices are assigned
/// over the sorted distinct labels of one training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    forward: BTreeMap<String, u32>,
}

impl LabelMapping {
    pub fn fit(labels: &[String]) -> Self {
        let distinct: std::collections::BTreeSet<&String> = labels.iter().collect();
        let forward = distinct
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index as u32))
            .collect();
        Self { forward }
    }

    pub fn encode(&self, label: &str) -> Option<u32> {
        self.forward.get(label).copied()
    }

    pub fn decode(&self, index: u32) -> Option<&str> {
        self.forward
            .iter()
            .find(|(_, &i)| i == index)
            .map(|(label, _)| label.as_str())
    }

    pub fn decode_or_unknown(&self, index: u32) -> String {
        self.decode(index).unwrap_or(UNKNOWN_LABEL).to_string()
    }

    pub fn class_count(&self) -> usize {
        self.forward.len()
    }
}
