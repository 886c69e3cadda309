use serde::{Deserialize, Serialize};

/// The single backend record holding a user's chosen categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceDocument {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(default)]
    pub interested_categories: Vec<String>,
}

/// Client-side set of selected category labels. Keeps selection order and
/// never holds a label twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    labels: Vec<String>,
}

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the label if absent, removes it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(pos) = self.labels.iter().position(|l| l == label) {
            self.labels.remove(pos);
            false
        } else {
            self.labels.push(label.to_owned());
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn replace_all(&mut self, labels: impl IntoIterator<Item = String>) {
        self.labels.clear();
        for label in labels {
            if !self.contains(&label) {
                self.labels.push(label);
            }
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
