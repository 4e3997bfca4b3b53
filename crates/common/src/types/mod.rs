use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Health probe payload returned by `GET /health`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
}

impl Health {
    pub fn running(message: impl Into<String>) -> Self {
        Self {
            status: "running",
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
