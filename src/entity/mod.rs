mod about;
mod attachment;
mod change;
mod comment;
mod project;
mod resource;
mod review;
mod user;

pub use about::{AboutContent, AdminCredentials, Experience, Skill};
pub use attachment::{Attachment, AttachmentKind};
pub use change::{ChangeAction, DatabaseChange, EntityType};
pub use comment::{Comment, CommentParent, Reply};
pub use project::Project;
pub use resource::Resource;
pub use review::Review;
pub use user::UserDetails;

use uuid::Uuid;

use crate::error::{GalaxyError, Result};

/// Generate a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reject empty or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GalaxyError::validation(field, "is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique_back_to_back() {
        let ids: Vec<String> = (0..1000).map(|_| new_id()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("title", "Galaxy").is_ok());
        assert!(matches!(
            require("title", "   "),
            Err(GalaxyError::Validation { ref field, .. }) if field == "title"
        ));
    }
}
