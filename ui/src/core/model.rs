//! Chart document model. Mirrors the JSON contract of uploaded chart files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Group selected after every successful load (when the file provides it).
pub const DEFAULT_GROUP: &str = "NO_GROUP";

/// One measured unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DataRow {
    #[serde(rename = "AC", default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<f64>,
    /// Carried through untouched; not consumed by the limit models.
    #[serde(rename = "WATERFALL_AC", default)]
    pub waterfall_ac: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub category_id: String,
    pub data_row_id: String,
}

pub type GroupMapping = BTreeMap<String, Vec<GroupItem>>;
pub type DataRowMapping = BTreeMap<String, DataRow>;

/// Root document. Never mutated after load; a new file replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(default)]
    pub group_mapping: GroupMapping,
    #[serde(default)]
    pub data_row_mapping: DataRowMapping,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid chart file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read {0}")]
    Unreadable(String),
}

/// A group item paired with the observation it resolves to, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem<'a> {
    pub item: &'a GroupItem,
    pub value: Option<f64>,
}

impl ChartData {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Group names in stable (sorted) order for selectors.
    pub fn group_names(&self) -> Vec<String> {
        self.group_mapping.keys().cloned().collect()
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.group_mapping.contains_key(name)
    }

    pub fn group(&self, name: &str) -> &[GroupItem] {
        self.group_mapping
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `DEFAULT_GROUP` when present, otherwise the first group name.
    pub fn default_group(&self) -> String {
        if self.has_group(DEFAULT_GROUP) {
            DEFAULT_GROUP.to_string()
        } else {
            self.group_mapping
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_GROUP.to_string())
        }
    }

    pub fn value_for(&self, item: &GroupItem) -> Option<f64> {
        self.data_row_mapping
            .get(&item.data_row_id)
            .and_then(|row| row.ac)
            .filter(|value| value.is_finite())
    }

    /// Every item of `group` in order, with its resolved `AC` value.
    pub fn resolve_group(&self, group: &str) -> Vec<ResolvedItem<'_>> {
        self.group(group)
            .iter()
            .map(|item| {
                let value = self.value_for(item);
                if value.is_none() {
                    tracing::debug!(
                        group,
                        data_row_id = %item.data_row_id,
                        "skipping item without a resolvable AC value"
                    );
                }
                ResolvedItem { item, value }
            })
            .collect()
    }

    /// The observation sequence fed to the limit models: present values only.
    pub fn observations(&self, group: &str) -> Vec<f64> {
        self.group(group)
            .iter()
            .filter_map(|item| self.value_for(item))
            .collect()
    }
}
