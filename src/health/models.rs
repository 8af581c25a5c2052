use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Detail written under `status` is moved here, `status` belongs to the verdict.
const RENAMED_STATUS_KEY: &str = "reported_status";

/// Outcome of a single probe execution.
///
/// `detail` is passed through by the aggregator untouched and is flattened next to
/// `status` when serialized, e.g. `{"status": "DOWN", "error": "connection refused"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub status: Status,
    #[serde(flatten)]
    detail: Map<String, Value>,
}

impl ProbeResult {
    pub fn up() -> Self {
        Self {
            status: Status::Up,
            detail: Map::new(),
        }
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self::down_without_detail().with_detail("error", error.into())
    }

    pub fn down_without_detail() -> Self {
        Self {
            status: Status::Down,
            detail: Map::new(),
        }
    }

    /// Adds a detail entry. The `status` key is reserved and stored as
    /// `reported_status` instead.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        let key = if key == "status" {
            RENAMED_STATUS_KEY
        } else {
            key
        };
        self.detail.insert(key.to_string(), value.into());
        self
    }

    pub fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }

    pub fn is_down(&self) -> bool {
        self.status == Status::Down
    }
}

/// Snapshot of one check cycle, keyed by probe name in registration order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct CompositeResult {
    entries: IndexMap<String, ProbeResult>,
}

impl CompositeResult {
    pub(crate) fn from_entries(entries: IndexMap<String, ProbeResult>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &IndexMap<String, ProbeResult> {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff at least one entry is DOWN. An empty result is healthy.
    pub fn is_down(&self) -> bool {
        self.entries.values().any(ProbeResult::is_down)
    }

    pub fn status(&self) -> Status {
        if self.is_down() {
            Status::Down
        } else {
            Status::Up
        }
    }
}
