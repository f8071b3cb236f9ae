use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A point written to a vector collection. Upserting an existing id
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: u64,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl Point {
    pub fn new(id: u64, vector: Vec<f32>, payload: Map<String, Value>) -> Self {
        Self {
            id,
            vector,
            payload,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertAck {
    #[serde(default)]
    pub operation_id: u64,
    #[serde(default)]
    pub status: String,
}

impl UpsertAck {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// A search hit, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: u64,
    pub score: f32,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub version: u64,
}

impl ScoredPoint {
    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(Value::as_str)
    }
}
