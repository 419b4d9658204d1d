//! Session and identity: who is using the site and in what role.
//!
//! The authentication flag, the role and the current-user pointer are each
//! persisted under their own key. They are read back exactly as stored, so a
//! partially cleared store can resurrect an inconsistent combination. A value
//! that no longer decodes reads as absent.

mod prompt;

pub use prompt::{display_name_or_anonymous, NamePrompts, ANONYMOUS};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::entity::UserDetails;
use crate::error::{GalaxyError, Result};
use crate::service::DataService;
use crate::storage::{keys, KeyValueStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// The pointer may be missing when the stored keys disagree.
    User { user_id: Option<String> },
    Admin,
}

pub struct Session<'a, S> {
    service: &'a DataService<S>,
    state: SessionState,
}

impl<'a, S: KeyValueStorage> Session<'a, S> {
    /// Rebuild the session from the persisted keys.
    pub fn restore(service: &'a DataService<S>) -> Result<Self> {
        let authenticated: Option<bool> = load_lenient(service, keys::IS_AUTHENTICATED)?;
        let role: Option<Role> = load_lenient(service, keys::USER_ROLE)?;
        let user_id: Option<String> = load_lenient(service, keys::CURRENT_USER_DETAILS_ID)?;

        let state = match (authenticated.unwrap_or(false), role) {
            (false, _) | (true, None) => SessionState::Anonymous,
            (true, Some(Role::Admin)) => SessionState::Admin,
            (true, Some(Role::User)) => SessionState::User { user_id },
        };

        Ok(Self { service, state })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state != SessionState::Anonymous
    }

    pub fn role(&self) -> Option<Role> {
        match self.state {
            SessionState::Anonymous => None,
            SessionState::User { .. } => Some(Role::User),
            SessionState::Admin => Some(Role::Admin),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.state == SessionState::Admin
    }

    /// Fail with `PermissionDenied` unless the admin is logged in.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(GalaxyError::PermissionDenied(format!(
                "{} requires admin login",
                action
            )))
        }
    }

    /// Check the admin pair. A mismatch leaves the session untouched.
    pub fn login(&mut self, user_id: &str, password: &str) -> Result<bool> {
        let expected = self.service.get_admin_credentials()?;

        let id_ok = constant_time_compare(user_id, &expected.user_id);
        let password_ok = constant_time_compare(password, &expected.password);
        if !(id_ok && password_ok) {
            tracing::warn!(user_id, "admin login rejected");
            return Ok(false);
        }

        let store = self.service.store();
        store.save(keys::IS_AUTHENTICATED, &true)?;
        store.save(keys::USER_ROLE, &Role::Admin)?;
        self.state = SessionState::Admin;

        tracing::info!(user_id, "admin logged in");
        Ok(true)
    }

    /// Become a regular user by filling in a profile. An existing record with
    /// the same id is replaced; otherwise a new one is created.
    pub fn set_user_details(&mut self, details: UserDetails) -> Result<UserDetails> {
        let stored = match self.service.get_user_details_by_id(&details.id)? {
            Some(_) => match self.service.replace(details.clone())? {
                Some(updated) => updated,
                None => self.service.add_user_details(details)?,
            },
            None => self.service.add_user_details(details)?,
        };

        let store = self.service.store();
        store.save(keys::IS_AUTHENTICATED, &true)?;
        store.save(keys::USER_ROLE, &Role::User)?;
        store.save(keys::CURRENT_USER_DETAILS_ID, &stored.id)?;
        self.state = SessionState::User {
            user_id: Some(stored.id.clone()),
        };

        tracing::info!(user = %stored.id, "user details set");
        Ok(stored)
    }

    /// The profile the session points at, if it still exists.
    pub fn current_user(&self) -> Result<Option<UserDetails>> {
        match &self.state {
            SessionState::User {
                user_id: Some(id),
            } => self.service.get_user_details_by_id(id),
            _ => Ok(None),
        }
    }

    /// Clear every session key.
    pub fn logout(&mut self) -> Result<()> {
        Self::clear(self.service)?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Clear every session key without reading them first.
    pub fn clear(service: &DataService<S>) -> Result<()> {
        let store = service.store();
        store.remove(keys::IS_AUTHENTICATED)?;
        store.remove(keys::USER_ROLE)?;
        store.remove(keys::CURRENT_USER_DETAILS_ID)?;

        tracing::info!("logged out");
        Ok(())
    }
}

/// Decode a session key, treating a value that no longer parses as absent.
fn load_lenient<S: KeyValueStorage, T: DeserializeOwned>(
    service: &DataService<S>,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = service.store().storage().get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable session key");
            Ok(None)
        }
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AdminCredentials;
    use crate::storage::MemoryStorage;

    fn service() -> DataService<MemoryStorage> {
        DataService::new(MemoryStorage::new())
    }

    #[test]
    fn test_fresh_session_is_anonymous() {
        let svc = service();
        let session = Session::restore(&svc).unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn test_admin_login_succeeds_and_persists() {
        let svc = service();
        let mut session = Session::restore(&svc).unwrap();

        assert!(session.login("sunnysoni", "*SunnyGalaxyAdmin").unwrap());
        assert_eq!(session.role(), Some(Role::Admin));
        assert!(session.require_admin("edit").is_ok());

        let restored = Session::restore(&svc).unwrap();
        assert!(restored.is_admin());
    }

    #[test]
    fn test_wrong_login_leaves_role_unchanged() {
        let svc = service();
        let mut session = Session::restore(&svc).unwrap();

        assert!(!session.login("wrong", "wrong").unwrap());
        assert_eq!(session.role(), None);

        session
            .set_user_details(UserDetails::new("Visitor".into()))
            .unwrap();
        assert!(!session.login("sunnysoni", "nope").unwrap());
        assert_eq!(session.role(), Some(Role::User));
        assert!(matches!(
            session.require_admin("edit"),
            Err(GalaxyError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_login_uses_stored_credentials() {
        let svc = service();
        svc.update_admin_credentials(AdminCredentials {
            user_id: "captain".into(),
            password: "orbit".into(),
        })
        .unwrap();

        let mut session = Session::restore(&svc).unwrap();
        assert!(!session.login("sunnysoni", "*SunnyGalaxyAdmin").unwrap());
        assert!(session.login("captain", "orbit").unwrap());
    }

    #[test]
    fn test_set_user_details_creates_then_replaces() {
        let svc = service();
        let mut session = Session::restore(&svc).unwrap();

        let created = session
            .set_user_details(UserDetails::new("Nova".into()))
            .unwrap();
        assert_eq!(svc.get_all_user_details().unwrap().len(), 1);
        assert_eq!(session.current_user().unwrap(), Some(created.clone()));

        let mut edited = created.clone();
        edited.occupation = Some("Astronomer".into());
        let replaced = session.set_user_details(edited).unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(svc.get_all_user_details().unwrap().len(), 1);
        assert_eq!(
            svc.get_user_details_by_id(&created.id)
                .unwrap()
                .unwrap()
                .occupation
                .as_deref(),
            Some("Astronomer")
        );
    }

    #[test]
    fn test_logout_clears_everything() {
        let svc = service();
        let mut session = Session::restore(&svc).unwrap();
        session
            .set_user_details(UserDetails::new("Nova".into()))
            .unwrap();

        session.logout().unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);

        let restored = Session::restore(&svc).unwrap();
        assert_eq!(restored.state(), &SessionState::Anonymous);
        assert!(svc.store().storage().get_item(keys::USER_ROLE).unwrap().is_none());
    }

    #[test]
    fn test_inconsistent_keys_are_restored_as_stored() {
        let svc = service();
        svc.store().save(keys::IS_AUTHENTICATED, &true).unwrap();
        svc.store().save(keys::USER_ROLE, &Role::User).unwrap();

        let session = Session::restore(&svc).unwrap();
        assert_eq!(session.state(), &SessionState::User { user_id: None });
        assert_eq!(session.current_user().unwrap(), None);
    }

    #[test]
    fn test_unknown_role_restores_as_anonymous() {
        let svc = service();
        svc.store().save(keys::IS_AUTHENTICATED, &true).unwrap();
        svc.store().save(keys::USER_ROLE, "guest").unwrap();

        let mut session = Session::restore(&svc).unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);

        session.logout().unwrap();
        assert!(svc.store().storage().get_item(keys::USER_ROLE).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_flags_are_ignored() {
        let svc = service();
        let storage = svc.store().storage();
        storage.set_item(keys::IS_AUTHENTICATED, "not json").unwrap();
        storage.set_item(keys::USER_ROLE, "\"admin\"").unwrap();

        let session = Session::restore(&svc).unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);
    }

    #[test]
    fn test_clear_without_restoring() {
        let svc = service();
        svc.store().save(keys::USER_ROLE, "guest").unwrap();
        svc.store().save(keys::CURRENT_USER_DETAILS_ID, "u1").unwrap();

        Session::clear(&svc).unwrap();
        let storage = svc.store().storage();
        assert!(storage.get_item(keys::USER_ROLE).unwrap().is_none());
        assert!(storage.get_item(keys::CURRENT_USER_DETAILS_ID).unwrap().is_none());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("short", "much-longer"));
    }
}
