use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataService;
use crate::entity::{DatabaseChange, Project, Resource, Review, UserDetails};
use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Everything the "download database" button hands to the visitor.
///
/// There is no import path; this is an export-only convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseExport {
    pub projects: Vec<Project>,
    pub resources: Vec<Resource>,
    pub reviews: Vec<Review>,
    pub user_details: Vec<UserDetails>,
    pub database_changes: Vec<DatabaseChange>,
}

/// `cosmic_dreamscape_db_<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("cosmic_dreamscape_db_{}.json", date.format("%Y-%m-%d"))
}

impl<S: KeyValueStorage> DataService<S> {
    pub fn download_database(&self) -> Result<DatabaseExport> {
        Ok(DatabaseExport {
            projects: self.get_all_projects()?,
            resources: self.get_all_resources()?,
            reviews: self.get_all_reviews()?,
            user_details: self.get_all_user_details()?,
            database_changes: self.get_database_changes()?,
        })
    }

    /// Write the export blob into `dir`, returning the file path.
    pub fn write_export(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        let export = self.download_database()?;
        let path = dir.join(export_file_name(date));
        fs::write(&path, serde_json::to_string_pretty(&export)?)?;
        tracing::info!(path = %path.display(), "database exported");
        Ok(path)
    }
}
