//! The data access layer.
//!
//! `DataService` is an explicitly constructed repository over a
//! [`KeyValueStorage`]. Each collection lives under one storage key and is
//! loaded, scanned, mutated and saved back whole. Every add/update/delete of a
//! top-level record appends one entry to the change log; the about page and
//! the admin credentials are replaced without logging.

mod export;
mod social;
mod updates;

pub use export::{export_file_name, DatabaseExport};
pub use updates::{ProjectUpdate, ResourceUpdate, ReviewUpdate, UserDetailsUpdate};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GalaxyConfig;
use crate::entity::{
    new_id, AboutContent, AdminCredentials, ChangeAction, DatabaseChange, EntityType, Project,
    Resource, Review, UserDetails,
};
use crate::error::Result;
use crate::storage::{keys, JsonStore, KeyValueStorage};

/// A top-level record stored as one element of a JSON array.
pub(crate) trait Record: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;
    const ENTITY_TYPE: EntityType;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn validate(&self) -> Result<()>;
}

macro_rules! impl_record {
    ($ty:ty, $key:expr, $entity_type:expr) => {
        impl Record for $ty {
            const KEY: &'static str = $key;
            const ENTITY_TYPE: EntityType = $entity_type;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn validate(&self) -> Result<()> {
                <$ty>::validate(self)
            }
        }
    };
}

impl_record!(Project, keys::PROJECTS, EntityType::Project);
impl_record!(Resource, keys::RESOURCES, EntityType::Resource);
impl_record!(Review, keys::REVIEWS, EntityType::Review);
impl_record!(UserDetails, keys::USER_DETAILS, EntityType::UserDetails);

pub struct DataService<S> {
    store: JsonStore<S>,
    admin_seed: AdminCredentials,
}

impl<S: KeyValueStorage> DataService<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, &GalaxyConfig::default())
    }

    pub fn with_config(storage: S, config: &GalaxyConfig) -> Self {
        Self {
            store: JsonStore::new(storage),
            admin_seed: config.admin_credentials(),
        }
    }

    pub fn store(&self) -> &JsonStore<S> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Generic collection helpers
    // ------------------------------------------------------------------

    fn load_all<T: Record>(&self) -> Result<Vec<T>> {
        self.store.load(T::KEY)
    }

    fn save_all<T: Record>(&self, records: &[T]) -> Result<()> {
        self.store.save(T::KEY, records)
    }

    fn find<T: Record>(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load_all::<T>()?.into_iter().find(|r| r.id() == id))
    }

    fn insert<T: Record>(&self, mut record: T) -> Result<T> {
        record.validate()?;
        record.set_id(new_id());

        let mut records = self.load_all::<T>()?;
        records.push(record.clone());
        self.save_all(&records)?;

        tracing::debug!(entity = %T::ENTITY_TYPE, id = record.id(), "added");
        self.log_change(ChangeAction::Add, T::ENTITY_TYPE, record.id())?;
        Ok(record)
    }

    /// Apply `mutate` to the record with `id`. Returns `None` without writing
    /// when no such record exists.
    fn modify<T: Record>(&self, id: &str, mutate: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let mut records = self.load_all::<T>()?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            tracing::warn!(entity = %T::ENTITY_TYPE, id, "update target not found");
            return Ok(None);
        };

        mutate(record);
        record.validate()?;
        let updated = record.clone();

        self.save_all(&records)?;
        tracing::debug!(entity = %T::ENTITY_TYPE, id, "updated");
        self.log_change(ChangeAction::Update, T::ENTITY_TYPE, id)?;
        Ok(Some(updated))
    }

    fn remove<T: Record>(&self, id: &str) -> Result<bool> {
        let mut records = self.load_all::<T>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            tracing::warn!(entity = %T::ENTITY_TYPE, id, "delete target not found");
            return Ok(false);
        }

        self.save_all(&records)?;
        tracing::debug!(entity = %T::ENTITY_TYPE, id, "deleted");
        self.log_change(ChangeAction::Delete, T::ENTITY_TYPE, id)?;
        Ok(true)
    }

    /// Replace a stored record wholesale, keeping its id.
    pub(crate) fn replace<T: Record>(&self, record: T) -> Result<Option<T>> {
        let id = record.id().to_string();
        self.modify::<T>(&id, |existing| *existing = record)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub fn get_all_projects(&self) -> Result<Vec<Project>> {
        self.load_all()
    }

    pub fn get_project_by_id(&self, id: &str) -> Result<Option<Project>> {
        self.find(id)
    }

    pub fn add_project(&self, project: Project) -> Result<Project> {
        self.insert(project)
    }

    pub fn update_project(&self, id: &str, update: ProjectUpdate) -> Result<Option<Project>> {
        self.modify(id, |p: &mut Project| update.apply(p))
    }

    pub fn delete_project(&self, id: &str) -> Result<bool> {
        self.remove::<Project>(id)
    }

    pub fn like_project(&self, id: &str) -> Result<Option<u32>> {
        Ok(self
            .modify(id, |p: &mut Project| p.likes = p.likes.saturating_add(1))?
            .map(|p| p.likes))
    }

    pub fn projects_by_category(&self, category: &str) -> Result<Vec<Project>> {
        Ok(self
            .get_all_projects()?
            .into_iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect())
    }

    pub fn project_categories(&self) -> Result<Vec<String>> {
        Ok(distinct(self.get_all_projects()?.into_iter().map(|p| p.category)))
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    pub fn get_all_resources(&self) -> Result<Vec<Resource>> {
        self.load_all()
    }

    pub fn get_resource_by_id(&self, id: &str) -> Result<Option<Resource>> {
        self.find(id)
    }

    pub fn add_resource(&self, resource: Resource) -> Result<Resource> {
        self.insert(resource)
    }

    pub fn update_resource(&self, id: &str, update: ResourceUpdate) -> Result<Option<Resource>> {
        self.modify(id, |r: &mut Resource| update.apply(r))
    }

    pub fn delete_resource(&self, id: &str) -> Result<bool> {
        self.remove::<Resource>(id)
    }

    pub fn like_resource(&self, id: &str) -> Result<Option<u32>> {
        Ok(self
            .modify(id, |r: &mut Resource| r.likes = r.likes.saturating_add(1))?
            .map(|r| r.likes))
    }

    pub fn resources_by_category(&self, category: &str) -> Result<Vec<Resource>> {
        Ok(self
            .get_all_resources()?
            .into_iter()
            .filter(|r| r.category.eq_ignore_ascii_case(category))
            .collect())
    }

    pub fn resource_categories(&self) -> Result<Vec<String>> {
        Ok(distinct(self.get_all_resources()?.into_iter().map(|r| r.category)))
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    pub fn get_all_reviews(&self) -> Result<Vec<Review>> {
        self.load_all()
    }

    pub fn get_review_by_id(&self, id: &str) -> Result<Option<Review>> {
        self.find(id)
    }

    pub fn add_review(&self, review: Review) -> Result<Review> {
        self.insert(review)
    }

    pub fn update_review(&self, id: &str, update: ReviewUpdate) -> Result<Option<Review>> {
        self.modify(id, |r: &mut Review| update.apply(r))
    }

    pub fn delete_review(&self, id: &str) -> Result<bool> {
        self.remove::<Review>(id)
    }

    /// Mean rating across all reviews, `None` when there are none.
    pub fn average_rating(&self) -> Result<Option<f64>> {
        let reviews = self.get_all_reviews()?;
        if reviews.is_empty() {
            return Ok(None);
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        Ok(Some(f64::from(total) / reviews.len() as f64))
    }

    // ------------------------------------------------------------------
    // User details
    // ------------------------------------------------------------------

    pub fn get_all_user_details(&self) -> Result<Vec<UserDetails>> {
        self.load_all()
    }

    pub fn get_user_details_by_id(&self, id: &str) -> Result<Option<UserDetails>> {
        self.find(id)
    }

    pub fn add_user_details(&self, details: UserDetails) -> Result<UserDetails> {
        self.insert(details)
    }

    pub fn update_user_details(
        &self,
        id: &str,
        update: UserDetailsUpdate,
    ) -> Result<Option<UserDetails>> {
        self.modify(id, |u: &mut UserDetails| update.apply(u))
    }

    pub fn delete_user_details(&self, id: &str) -> Result<bool> {
        self.remove::<UserDetails>(id)
    }

    // ------------------------------------------------------------------
    // Singletons (not logged)
    // ------------------------------------------------------------------

    pub fn get_about_content(&self) -> Result<AboutContent> {
        self.store.load(keys::ABOUT_CONTENT)
    }

    pub fn update_about_content(&self, content: AboutContent) -> Result<AboutContent> {
        content.validate()?;
        self.store.save(keys::ABOUT_CONTENT, &content)?;
        tracing::debug!("about content replaced");
        Ok(content)
    }

    /// Stored admin credentials, or the configured seed pair when none are stored.
    pub fn get_admin_credentials(&self) -> Result<AdminCredentials> {
        let stored: Option<AdminCredentials> = self.store.load(keys::ADMIN_CREDENTIALS)?;
        Ok(stored.unwrap_or_else(|| self.admin_seed.clone()))
    }

    pub fn update_admin_credentials(&self, credentials: AdminCredentials) -> Result<()> {
        crate::entity::require("userId", &credentials.user_id)?;
        crate::entity::require("password", &credentials.password)?;
        self.store.save(keys::ADMIN_CREDENTIALS, &credentials)?;
        tracing::info!("admin credentials replaced");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Change log
    // ------------------------------------------------------------------

    pub fn get_database_changes(&self) -> Result<Vec<DatabaseChange>> {
        self.store.load(keys::DATABASE_CHANGES)
    }

    /// Change log entries for one entity type, oldest first.
    pub fn changes_for(&self, entity_type: EntityType) -> Result<Vec<DatabaseChange>> {
        Ok(self
            .get_database_changes()?
            .into_iter()
            .filter(|c| c.entity_type == entity_type)
            .collect())
    }

    fn log_change(&self, action: ChangeAction, entity_type: EntityType, entity_id: &str) -> Result<()> {
        let mut changes = self.get_database_changes()?;
        changes.push(DatabaseChange::new(action, entity_type, entity_id.to_string()));
        self.store.save(keys::DATABASE_CHANGES, &changes)
    }
}

/// Non-empty values in first-seen order.
fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
