// src/entity/project.rs
use serde::{Deserialize, Serialize};

use super::{new_id, require, Attachment, Comment};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Project {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            image: String::new(),
            category: String::new(),
            tech_stack: Vec::new(),
            demo_link: None,
            github_link: None,
            comments: Vec::new(),
            likes: 0,
            attachments: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("description", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalaxyError;

    #[test]
    fn test_validate_requires_title_and_description() {
        let project = Project::new("Starfield".to_string(), "Canvas demo".to_string());
        assert!(project.validate().is_ok());

        let untitled = Project::new(String::new(), "Canvas demo".to_string());
        assert!(matches!(
            untitled.validate(),
            Err(GalaxyError::Validation { ref field, .. }) if field == "title"
        ));
    }

    #[test]
    fn test_tech_stack_field_name() {
        let mut project = Project::new("Starfield".to_string(), "Canvas demo".to_string());
        project.tech_stack = vec!["React".to_string(), "TypeScript".to_string()];
        project.demo_link = Some("https://example.com".to_string());

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["techStack"][1], "TypeScript");
        assert_eq!(json["demoLink"], "https://example.com");
        assert!(json.get("comments").is_none());
    }
}
