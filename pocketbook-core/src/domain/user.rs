//! User domain model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Represents an authenticated user
///
/// The id is an opaque identifier issued by the backend. Profile fields
/// other than email are passed through untouched; the client never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: HashMap<String, serde_json::Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            profile: HashMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
