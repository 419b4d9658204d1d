pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod service;
pub mod session;
pub mod storage;

pub use config::GalaxyConfig;
pub use error::{GalaxyError, Result};
pub use service::DataService;
pub use session::{NamePrompts, Role, Session, SessionState};
pub use storage::{FileStorage, JsonStore, KeyValueStorage, MemoryStorage};
