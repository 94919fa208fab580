use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// One occurrence of a counter object, keyed by its instance name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name as reported by the provider (e.g. "RDP-Tcp#0").
    pub name: String,

    /// Raw counter fields, keyed by the provider's field name.
    #[serde(default)]
    pub fields: HashMap<String, f64>,
}

impl Instance {
    /// Create an instance with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Set a raw field value.
    pub fn with_field(mut self, field: impl Into<String>, value: f64) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Look up a raw field value.
    pub fn field(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }
}

/// All instances of one counter object, captured at a single point in time.
///
/// Instance order is the provider's enumeration order and is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Counter object name (e.g. "RemoteFX Network").
    pub object: String,

    /// Instances in enumeration order.
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl CounterSnapshot {
    /// Create an empty snapshot for the named object.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            instances: Vec::new(),
        }
    }

    /// Append an instance.
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// A point-in-time dump of several counter objects, as written by an
/// external perf-counter agent.
///
/// ```json
/// { "objects": { "RemoteFX Network": [ { "name": "RDP-Tcp#0", "fields": { "Base TCP RTT": 12.5 } } ] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub objects: HashMap<String, Vec<Instance>>,
}

impl SnapshotDocument {
    /// Parse a snapshot document from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a snapshot document from disk.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Extract the snapshot of one counter object, if present.
    pub fn snapshot(&self, object: &str) -> Option<CounterSnapshot> {
        self.objects.get(object).map(|instances| CounterSnapshot {
            object: object.to_string(),
            instances: instances.clone(),
        })
    }
}
