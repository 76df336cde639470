use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// One processed video: its aggregated feature vector and word label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: Vec<f32>,
    pub label: String,
}

/// All examples of one processing run, persisted between the
/// data-processing and training stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, example: TrainingExample) {
        self.features.push(example.features);
        self.labels.push(example.label);
    }

    pub fn from_examples(examples: Vec<TrainingExample>) -> Self {
        let mut dataset = Self::new();
        for example in examples {
            dataset.push(example);
        }
        dataset
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_json(&std::fs::read(path)?)
    }
}

/// One manifest row tying a word to its video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub word: String,
    pub video: String,
}

/// Load a training manifest, skipping entries whose video file is
/// missing next to the manifest.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ModelError> {
    let entries: Vec<ManifestEntry> = serde_json::from_slice(&std::fs::read(path)?)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let (kept, dropped): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|entry| base.join(&entry.video).exists());
    for entry in &dropped {
        warn!("⚠️ video file not found for '{}': {}", entry.word, entry.video);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_len() {
        let mut dataset = Dataset::new();
        assert!(dataset.is_empty());

        dataset.push(TrainingExample {
            features: vec![1.0, 2.0],
            label: "salom".to_string(),
        });
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.labels[0], "salom");
    }

    #[test]
    fn test_json_roundtrip() {
        let dataset = Dataset::from_examples(vec![
            TrainingExample {
                features: vec![0.5; 4],
                label: "a".to_string(),
            },
            TrainingExample {
                features: vec![1.5; 4],
                label: "b".to_string(),
            },
        ]);

        let bytes = dataset.to_json().unwrap();
        let back = Dataset::from_json(&bytes).unwrap();
        assert_eq!(dataset, back);
    }

    #[test]
    fn test_manifest_skips_missing_videos() {
        let dir = std::env::temp_dir().join(format!(
            "sign_lib_manifest_{}",
            uuid::Uuid::new_v4().simple()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(dir.join("present.mp4"), b"x").unwrap();
        let manifest = serde_json::json!([
            { "word": "ha", "video": "present.mp4" },
            { "word": "yo'q", "video": "absent.mp4" },
        ]);
        let manifest_path = dir.join("words.json");
        std::fs::write(&manifest_path, manifest.to_string()).unwrap();

        let entries = load_manifest(&manifest_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "ha");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_manifest_rejects_bad_json() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("sign_lib_bad_{}.json", uuid::Uuid::new_v4().simple()));
        std::fs::write(&path, b"not json").unwrap();

        assert!(load_manifest(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
