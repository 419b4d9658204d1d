// src/entity/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require};
use crate::error::Result;

/// Visitor profile; filling one in is what "logging in" means for regular users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_type: Option<String>,
    pub visit_date: DateTime<Utc>,
}

impl UserDetails {
    pub fn new(name: String) -> Self {
        Self {
            id: new_id(),
            name,
            email: None,
            age: None,
            gender: None,
            phone: None,
            occupation: None,
            bio: None,
            interests: Vec::new(),
            profile_picture: None,
            profile_picture_type: None,
            visit_date: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}
