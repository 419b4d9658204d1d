//! Partial-update payloads. `None` leaves a field alone; for optional fields
//! `Some(None)` clears and `Some(Some(v))` sets.

use chrono::{DateTime, Utc};

use crate::entity::{Attachment, Project, Resource, Review, UserDetails};

/// Update payload for a project
#[derive(Debug, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub demo_link: Option<Option<String>>,
    pub github_link: Option<Option<String>>,
}

impl ProjectUpdate {
    pub(crate) fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(image) = self.image {
            project.image = image;
        }
        if let Some(category) = self.category {
            project.category = category;
        }
        if let Some(tech_stack) = self.tech_stack {
            project.tech_stack = tech_stack;
        }
        if let Some(demo_link) = self.demo_link {
            project.demo_link = demo_link;
        }
        if let Some(github_link) = self.github_link {
            project.github_link = github_link;
        }
    }
}

/// Update payload for a resource
#[derive(Debug, Default)]
pub struct ResourceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub resource_type: Option<String>,
    pub category: Option<String>,
    pub link: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

impl ResourceUpdate {
    pub(crate) fn apply(self, resource: &mut Resource) {
        if let Some(title) = self.title {
            resource.title = title;
        }
        if let Some(description) = self.description {
            resource.description = description;
        }
        if let Some(resource_type) = self.resource_type {
            resource.resource_type = resource_type;
        }
        if let Some(category) = self.category {
            resource.category = category;
        }
        if let Some(link) = self.link {
            resource.link = link;
        }
        if let Some(attachments) = self.attachments {
            resource.attachments = attachments;
        }
    }
}

/// Update payload for a review
#[derive(Debug, Default)]
pub struct ReviewUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub message: Option<String>,
    pub rating: Option<u8>,
    pub date: Option<DateTime<Utc>>,
    pub image: Option<Option<String>>,
}

impl ReviewUpdate {
    pub(crate) fn apply(self, review: &mut Review) {
        if let Some(name) = self.name {
            review.name = name;
        }
        if let Some(role) = self.role {
            review.role = role;
        }
        if let Some(message) = self.message {
            review.message = message;
        }
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(date) = self.date {
            review.date = date;
        }
        if let Some(image) = self.image {
            review.image = image;
        }
    }
}

/// Update payload for a visitor profile
#[derive(Debug, Default)]
pub struct UserDetailsUpdate {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub age: Option<Option<u32>>,
    pub gender: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub occupation: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub interests: Option<Vec<String>>,
    /// Data URI and its extension tag, set together
    pub profile_picture: Option<Option<(String, String)>>,
}

impl UserDetailsUpdate {
    pub(crate) fn apply(self, user: &mut UserDetails) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(gender) = self.gender {
            user.gender = gender;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(occupation) = self.occupation {
            user.occupation = occupation;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(interests) = self.interests {
            user.interests = interests;
        }
        if let Some(picture) = self.profile_picture {
            match picture {
                Some((url, kind)) => {
                    user.profile_picture = Some(url);
                    user.profile_picture_type = Some(kind);
                }
                None => {
                    user.profile_picture = None;
                    user.profile_picture_type = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_update_clears_optional_link() {
        let mut project = Project::new("Orbit".into(), "Sim".into());
        project.github_link = Some("https://git.example/orbit".into());

        ProjectUpdate {
            github_link: Some(None),
            ..Default::default()
        }
        .apply(&mut project);

        assert_eq!(project.github_link, None);
        assert_eq!(project.title, "Orbit");
    }

    #[test]
    fn test_user_update_sets_picture_pair() {
        let mut user = UserDetails::new("Vee".into());
        UserDetailsUpdate {
            profile_picture: Some(Some(("data:image/png;base64,AA".into(), "png".into()))),
            age: Some(Some(30)),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.profile_picture_type.as_deref(), Some("png"));
        assert_eq!(user.age, Some(30));
    }
}
