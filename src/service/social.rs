//! Comments, replies, likes and attachments embedded in projects and resources.
//!
//! Every operation loads the parent collection, finds the parent and the
//! nested record by linear scan, mutates in place and writes the whole
//! collection back. A successful mutation is logged as an `update` of the
//! parent. Likes are not deduplicated here; check `is_liked_by` first.

use super::{DataService, Record};
use crate::entity::{require, Attachment, Comment, CommentParent, Project, Reply, Resource};
use crate::error::Result;
use crate::storage::KeyValueStorage;

/// A record that carries a comment thread and attachments.
trait Social: Record {
    fn comments(&self) -> &[Comment];
    fn thread_mut(&mut self) -> (&mut Vec<Comment>, &mut Vec<Attachment>);
}

impl Social for Project {
    fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn thread_mut(&mut self) -> (&mut Vec<Comment>, &mut Vec<Attachment>) {
        (&mut self.comments, &mut self.attachments)
    }
}

impl Social for Resource {
    fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn thread_mut(&mut self) -> (&mut Vec<Comment>, &mut Vec<Attachment>) {
        (&mut self.comments, &mut self.attachments)
    }
}

type Thread<'a> = (&'a mut Vec<Comment>, &'a mut Vec<Attachment>);

impl<S: KeyValueStorage> DataService<S> {
    /// Run `f` against the parent's thread. Nothing is written unless both the
    /// parent exists and `f` returns `Some`.
    fn mutate_thread<T>(
        &self,
        parent: &CommentParent,
        f: impl FnOnce(Thread<'_>) -> Option<T>,
    ) -> Result<Option<T>> {
        match parent {
            CommentParent::Project(id) => self.mutate_social::<Project, T>(id, f),
            CommentParent::Resource(id) => self.mutate_social::<Resource, T>(id, f),
        }
    }

    fn mutate_social<P: Social, T>(
        &self,
        id: &str,
        f: impl FnOnce(Thread<'_>) -> Option<T>,
    ) -> Result<Option<T>> {
        let mut records = self.load_all::<P>()?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            tracing::warn!(entity = %P::ENTITY_TYPE, id, "comment parent not found");
            return Ok(None);
        };

        let Some(outcome) = f(record.thread_mut()) else {
            return Ok(None);
        };

        self.save_all(&records)?;
        self.log_change(crate::entity::ChangeAction::Update, P::ENTITY_TYPE, id)?;
        Ok(Some(outcome))
    }

    fn thread_of<P: Social>(&self, id: &str) -> Result<Vec<Comment>> {
        Ok(self
            .find::<P>(id)?
            .map(|p| p.comments().to_vec())
            .unwrap_or_default())
    }

    /// Comments on the parent in insertion order; empty if the parent is missing.
    pub fn get_comments(&self, parent: &CommentParent) -> Result<Vec<Comment>> {
        match parent {
            CommentParent::Project(id) => self.thread_of::<Project>(id),
            CommentParent::Resource(id) => self.thread_of::<Resource>(id),
        }
    }

    pub fn add_comment(&self, parent: &CommentParent, mut comment: Comment) -> Result<Option<Comment>> {
        require("text", &comment.text)?;
        require("author", &comment.author)?;

        comment.id = crate::entity::new_id();
        comment.attach_to(parent);

        let added = self.mutate_thread(parent, |(comments, _)| {
            comments.push(comment.clone());
            Some(comment)
        })?;
        if let Some(ref c) = added {
            tracing::debug!(%parent, comment = %c.id, "comment added");
        }
        Ok(added)
    }

    pub fn delete_comment(&self, parent: &CommentParent, comment_id: &str) -> Result<bool> {
        let removed = self.mutate_thread(parent, |(comments, _)| {
            let before = comments.len();
            comments.retain(|c| c.id != comment_id);
            (comments.len() != before).then_some(())
        })?;
        Ok(removed.is_some())
    }

    pub fn add_reply(
        &self,
        parent: &CommentParent,
        comment_id: &str,
        mut reply: Reply,
    ) -> Result<Option<Reply>> {
        require("text", &reply.text)?;
        require("author", &reply.author)?;
        reply.id = crate::entity::new_id();

        self.mutate_thread(parent, |(comments, _)| {
            let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
            comment.replies.push(reply.clone());
            Some(reply)
        })
    }

    pub fn delete_reply(&self, parent: &CommentParent, comment_id: &str, reply_id: &str) -> Result<bool> {
        let removed = self.mutate_thread(parent, |(comments, _)| {
            let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
            let before = comment.replies.len();
            comment.replies.retain(|r| r.id != reply_id);
            (comment.replies.len() != before).then_some(())
        })?;
        Ok(removed.is_some())
    }

    /// Add one like from `user_id`. Calling twice counts twice.
    pub fn like_comment(&self, parent: &CommentParent, comment_id: &str, user_id: &str) -> Result<bool> {
        let liked = self.mutate_thread(parent, |(comments, _)| {
            let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
            comment.likes = comment.likes.saturating_add(1);
            comment.liked_by.push(user_id.to_string());
            Some(())
        })?;
        Ok(liked.is_some())
    }

    /// Add one like from `user_id` to a reply. Calling twice counts twice.
    pub fn like_reply(
        &self,
        parent: &CommentParent,
        comment_id: &str,
        reply_id: &str,
        user_id: &str,
    ) -> Result<bool> {
        let liked = self.mutate_thread(parent, |(comments, _)| {
            let reply = comments
                .iter_mut()
                .find(|c| c.id == comment_id)?
                .reply_mut(reply_id)?;
            reply.likes = reply.likes.saturating_add(1);
            reply.liked_by.push(user_id.to_string());
            Some(())
        })?;
        Ok(liked.is_some())
    }

    pub fn add_attachment(
        &self,
        parent: &CommentParent,
        attachment: Attachment,
    ) -> Result<Option<Attachment>> {
        require("name", &attachment.name)?;
        require("url", &attachment.url)?;

        self.mutate_thread(parent, |(_, attachments)| {
            attachments.push(attachment.clone());
            Some(attachment)
        })
    }

    pub fn remove_attachment(&self, parent: &CommentParent, attachment_id: &str) -> Result<bool> {
        let removed = self.mutate_thread(parent, |(_, attachments)| {
            let before = attachments.len();
            attachments.retain(|a| a.id != attachment_id);
            (attachments.len() != before).then_some(())
        })?;
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AttachmentKind, ChangeAction, EntityType};
    use crate::error::GalaxyError;
    use crate::storage::MemoryStorage;

    fn setup() -> (DataService<MemoryStorage>, CommentParent, CommentParent) {
        let svc = DataService::new(MemoryStorage::new());
        let project = svc
            .add_project(Project::new("Nebula".into(), "Shader toy".into()))
            .unwrap();
        let resource = svc
            .add_resource(Resource::new("Rust book".into(), "Reading".into()))
            .unwrap();
        (
            svc,
            CommentParent::Project(project.id),
            CommentParent::Resource(resource.id),
        )
    }

    fn comment(text: &str) -> Comment {
        Comment::new(text.to_string(), "Visitor".to_string())
    }

    #[test]
    fn test_add_comment_stamps_single_parent() {
        let (svc, project, resource) = setup();

        let on_project = svc.add_comment(&project, comment("Love it")).unwrap().unwrap();
        assert_eq!(on_project.project_id.as_deref(), Some(project.id()));
        assert_eq!(on_project.resource_id, None);

        let on_resource = svc.add_comment(&resource, comment("Useful")).unwrap().unwrap();
        assert_eq!(on_resource.resource_id.as_deref(), Some(resource.id()));
        assert_eq!(on_resource.project_id, None);

        assert_eq!(svc.get_comments(&project).unwrap(), vec![on_project]);
        assert_eq!(svc.get_comments(&resource).unwrap(), vec![on_resource]);
    }

    #[test]
    fn test_add_comment_missing_parent() {
        let (svc, _, _) = setup();
        let ghost = CommentParent::Project("ghost".into());
        let changes_before = svc.get_database_changes().unwrap().len();

        assert!(svc.add_comment(&ghost, comment("Hello?")).unwrap().is_none());
        assert!(svc.get_comments(&ghost).unwrap().is_empty());
        assert_eq!(svc.get_database_changes().unwrap().len(), changes_before);
    }

    #[test]
    fn test_empty_comment_rejected() {
        let (svc, project, _) = setup();
        let result = svc.add_comment(&project, comment(""));
        assert!(matches!(result, Err(GalaxyError::Validation { .. })));
        assert!(svc.get_comments(&project).unwrap().is_empty());
    }

    #[test]
    fn test_comment_logged_as_parent_update() {
        let (svc, project, _) = setup();
        svc.add_comment(&project, comment("Hi")).unwrap();

        let last = svc.get_database_changes().unwrap().pop().unwrap();
        assert_eq!(last.action, ChangeAction::Update);
        assert_eq!(last.entity_type, EntityType::Project);
        assert_eq!(last.entity_id, project.id());
    }

    #[test]
    fn test_like_comment_is_not_idempotent() {
        let (svc, project, _) = setup();
        let c = svc.add_comment(&project, comment("Hi")).unwrap().unwrap();

        assert!(svc.like_comment(&project, &c.id, "u1").unwrap());
        assert!(svc.like_comment(&project, &c.id, "u1").unwrap());

        let stored = &svc.get_comments(&project).unwrap()[0];
        assert_eq!(stored.likes, 2);
        assert_eq!(stored.liked_by, vec!["u1", "u1"]);
        assert!(stored.is_liked_by("u1"));
    }

    #[test]
    fn test_comment_and_reply_likes_saturate() {
        let (svc, project, _) = setup();
        let mut c = comment("Popular");
        c.likes = u32::MAX;
        let mut reply = Reply::new("Agreed".into(), "Bo".into());
        reply.likes = u32::MAX;
        c.replies.push(reply.clone());
        let c = svc.add_comment(&project, c).unwrap().unwrap();

        assert!(svc.like_comment(&project, &c.id, "u1").unwrap());
        assert!(svc.like_reply(&project, &c.id, &reply.id, "u1").unwrap());

        let stored = &svc.get_comments(&project).unwrap()[0];
        assert_eq!(stored.likes, u32::MAX);
        assert_eq!(stored.replies[0].likes, u32::MAX);
        assert!(stored.replies[0].is_liked_by("u1"));
    }

    #[test]
    fn test_like_missing_comment_returns_false() {
        let (svc, project, _) = setup();
        assert!(!svc.like_comment(&project, "nope", "u1").unwrap());
    }

    #[test]
    fn test_replies_and_reply_likes() {
        let (svc, _, resource) = setup();
        let c = svc.add_comment(&resource, comment("Question")).unwrap().unwrap();

        let reply = svc
            .add_reply(&resource, &c.id, Reply::new("Answer".into(), "Sunny".into()))
            .unwrap()
            .unwrap();
        assert!(svc.like_reply(&resource, &c.id, &reply.id, "u2").unwrap());

        let stored = &svc.get_comments(&resource).unwrap()[0];
        assert_eq!(stored.replies.len(), 1);
        assert_eq!(stored.replies[0].likes, 1);
        assert!(stored.replies[0].is_liked_by("u2"));

        assert!(svc.delete_reply(&resource, &c.id, &reply.id).unwrap());
        assert!(!svc.delete_reply(&resource, &c.id, &reply.id).unwrap());
        assert!(svc.get_comments(&resource).unwrap()[0].replies.is_empty());
    }

    #[test]
    fn test_reply_to_missing_comment() {
        let (svc, project, _) = setup();
        let reply = Reply::new("Answer".into(), "Sunny".into());
        assert!(svc.add_reply(&project, "nope", reply).unwrap().is_none());
    }

    #[test]
    fn test_delete_comment() {
        let (svc, project, _) = setup();
        let c = svc.add_comment(&project, comment("Bye")).unwrap().unwrap();

        assert!(svc.delete_comment(&project, &c.id).unwrap());
        assert!(!svc.delete_comment(&project, &c.id).unwrap());
        assert!(svc.get_comments(&project).unwrap().is_empty());
    }

    #[test]
    fn test_attachments_on_parent() {
        let (svc, project, _) = setup();
        let attachment = Attachment::new(
            "shot.png".into(),
            "data:image/png;base64,AAAA".into(),
            AttachmentKind::Image,
        );

        let added = svc.add_attachment(&project, attachment).unwrap().unwrap();
        let stored = svc.get_project_by_id(project.id()).unwrap().unwrap();
        assert_eq!(stored.attachments, vec![added.clone()]);

        assert!(svc.remove_attachment(&project, &added.id).unwrap());
        assert!(!svc.remove_attachment(&project, &added.id).unwrap());
        let stored = svc.get_project_by_id(project.id()).unwrap().unwrap();
        assert!(stored.attachments.is_empty());
    }
}
