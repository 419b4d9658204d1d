//! Key-value persistence: the local-storage contract, its backends, and the
//! JSON collection adapter layered on top.

mod file_storage;
mod json_store;
mod memory;

pub use file_storage::{FileStorage, GALAXY_DIR};
pub use json_store::JsonStore;
pub use memory::MemoryStorage;

use crate::error::Result;

/// Fixed storage keys, one JSON value per key.
pub mod keys {
    pub const PROJECTS: &str = "projects";
    pub const RESOURCES: &str = "resources";
    pub const REVIEWS: &str = "reviews";
    pub const USER_DETAILS: &str = "userDetails";
    pub const ABOUT_CONTENT: &str = "aboutContent";
    pub const ADMIN_CREDENTIALS: &str = "adminCredentials";
    pub const DATABASE_CHANGES: &str = "databaseChanges";

    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const USER_ROLE: &str = "userRole";
    pub const CURRENT_USER_DETAILS_ID: &str = "currentUserDetailsId";
}

/// Synchronous string key-value storage.
///
/// Every write replaces the whole value stored under the key. There is no
/// atomicity across keys and no concurrency control between processes.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
