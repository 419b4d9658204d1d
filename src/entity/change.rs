// src/entity/change.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Add,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Add => write!(f, "add"),
            ChangeAction::Update => write!(f, "update"),
            ChangeAction::Delete => write!(f, "delete"),
        }
    }
}

/// Entity types recorded in the change log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Project,
    Resource,
    Review,
    UserDetails,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Project => write!(f, "project"),
            EntityType::Resource => write!(f, "resource"),
            EntityType::Review => write!(f, "review"),
            EntityType::UserDetails => write!(f, "userDetails"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "project" | "projects" => Ok(EntityType::Project),
            "resource" | "resources" => Ok(EntityType::Resource),
            "review" | "reviews" => Ok(EntityType::Review),
            "user" | "users" | "userdetails" => Ok(EntityType::UserDetails),
            _ => Err(format!("Invalid entity type: {}", s)),
        }
    }
}

/// One entry in the append-only audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseChange {
    pub id: String,
    pub action: ChangeAction,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl DatabaseChange {
    pub fn new(action: ChangeAction, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            id: new_id(),
            action,
            entity_type,
            entity_id,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_parsing() {
        assert_eq!("projects".parse::<EntityType>().unwrap(), EntityType::Project);
        assert_eq!("user-details".parse::<EntityType>().unwrap(), EntityType::UserDetails);
        assert!("planet".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_change_serialization() {
        let change = DatabaseChange::new(ChangeAction::Delete, EntityType::UserDetails, "42".into());
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["action"], "delete");
        assert_eq!(json["entityType"], "userDetails");
        assert_eq!(json["entityId"], "42");
    }
}
