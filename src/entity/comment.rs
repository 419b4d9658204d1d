// src/entity/comment.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, Attachment};

/// The record a comment thread hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentParent {
    Project(String),
    Resource(String),
}

impl CommentParent {
    pub fn id(&self) -> &str {
        match self {
            CommentParent::Project(id) | CommentParent::Resource(id) => id,
        }
    }
}

impl std::fmt::Display for CommentParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            CommentParent::Project(_) => "project",
            CommentParent::Resource(_) => "resource",
        };
        write!(f, "{} {}", kind, self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked_by: Vec<String>,
}

impl Reply {
    pub fn new(text: String, author: String) -> Self {
        Self {
            id: new_id(),
            text,
            author,
            user_id: None,
            timestamp: Utc::now(),
            likes: 0,
            liked_by: Vec::new(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked_by: Vec<String>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Comment {
    pub fn new(text: String, author: String) -> Self {
        Self {
            id: new_id(),
            text,
            author,
            user_id: None,
            project_id: None,
            resource_id: None,
            timestamp: Utc::now(),
            likes: 0,
            liked_by: Vec::new(),
            replies: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Point the comment at exactly one parent, clearing the other link.
    pub fn attach_to(&mut self, parent: &CommentParent) {
        match parent {
            CommentParent::Project(id) => {
                self.project_id = Some(id.clone());
                self.resource_id = None;
            }
            CommentParent::Resource(id) => {
                self.resource_id = Some(id.clone());
                self.project_id = None;
            }
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|id| id == user_id)
    }

    pub fn reply_mut(&mut self, reply_id: &str) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_to_keeps_single_parent() {
        let mut comment = Comment::new("Nice".to_string(), "Ana".to_string());
        comment.attach_to(&CommentParent::Project("p1".to_string()));
        comment.attach_to(&CommentParent::Resource("r1".to_string()));

        assert_eq!(comment.project_id, None);
        assert_eq!(comment.resource_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_is_liked_by() {
        let mut reply = Reply::new("Agreed".to_string(), "Bo".to_string());
        assert!(!reply.is_liked_by("u1"));
        reply.liked_by.push("u1".to_string());
        assert!(reply.is_liked_by("u1"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut comment = Comment::new("Hi".to_string(), "Ana".to_string());
        comment.attach_to(&CommentParent::Project("p1".to_string()));
        comment.liked_by.push("u9".to_string());

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["likedBy"][0], "u9");
        assert!(json.get("resourceId").is_none());
    }

    #[test]
    fn test_deserializes_sparse_record() {
        let json = r#"{"id":"1","text":"t","author":"a","timestamp":"2024-05-01T10:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.likes, 0);
        assert!(comment.replies.is_empty());
        assert!(comment.project_id.is_none() && comment.resource_id.is_none());
    }
}
