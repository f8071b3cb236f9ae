use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed JSON shape submitted to the grading endpoint. Field order is
/// part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    pub task: String,
    pub apikey: String,
    pub answer: Value,
}

impl AnswerEnvelope {
    pub fn new(task: impl Into<String>, apikey: impl Into<String>, answer: Value) -> Self {
        Self {
            task: task.into(),
            apikey: apikey.into(),
            answer,
        }
    }
}
