// src/entity/about.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GalaxyError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Proficiency from 0 to 100
    pub level: u8,
}

/// The about page. Stored as a single record and replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl AboutContent {
    pub fn validate(&self) -> Result<()> {
        if let Some(skill) = self.skills.iter().find(|s| s.level > 100) {
            return Err(GalaxyError::validation(
                "skills",
                format!("level for '{}' must be 0-100, got {}", skill.name, skill.level),
            ));
        }
        Ok(())
    }
}

/// The single admin login pair. Compared by equality, never hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentials {
    pub user_id: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_bounds() {
        let mut about = AboutContent::default();
        about.skills.push(Skill {
            name: "Rust".to_string(),
            level: 100,
        });
        assert!(about.validate().is_ok());

        about.skills.push(Skill {
            name: "Juggling".to_string(),
            level: 101,
        });
        assert!(about.validate().is_err());
    }

    #[test]
    fn test_credentials_field_names() {
        let creds = AdminCredentials {
            user_id: "admin".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_string(&creds).unwrap();
        assert_eq!(json, r#"{"userId":"admin","password":"pw"}"#);
    }
}
