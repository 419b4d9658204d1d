// src/entity/resource.rs
use serde::{Deserialize, Serialize};

use super::{new_id, require, Attachment, Comment};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Kind of resource (e.g., "article", "video", "tool")
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: u32,
}

impl Resource {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            resource_type: String::new(),
            category: String::new(),
            link: String::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            likes: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}
