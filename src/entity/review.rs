// src/entity/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require, Attachment};
use crate::error::{GalaxyError, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub message: String,
    pub rating: u8,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Review {
    pub fn new(name: String, message: String, rating: u8) -> Self {
        Self {
            id: new_id(),
            name,
            role: String::new(),
            message,
            rating,
            date: Utc::now(),
            image: None,
            attachments: Vec::new(),
            user_id: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("message", &self.message)?;
        validate_rating(self.rating)
    }
}

pub(crate) fn validate_rating(rating: u8) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(GalaxyError::validation(
            "rating",
            format!("must be between {} and {}, got {}", MIN_RATING, MAX_RATING, rating),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Review::new("Ana".into(), "Great".into(), 1).validate().is_ok());
        assert!(Review::new("Ana".into(), "Great".into(), 5).validate().is_ok());
        assert!(Review::new("Ana".into(), "Great".into(), 0).validate().is_err());
        assert!(Review::new("Ana".into(), "Great".into(), 6).validate().is_err());
    }

    #[test]
    fn test_message_required() {
        let review = Review::new("Ana".into(), " ".into(), 4);
        assert!(matches!(
            review.validate(),
            Err(GalaxyError::Validation { ref field, .. }) if field == "message"
        ));
    }
}
