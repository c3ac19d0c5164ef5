//! Stable user identifiers for feedback correlation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{MindCareError, Result};

/// Supplies the identifier attached to feedback submissions.
pub trait UserIdProvider: Send + Sync {
    fn user_id(&self) -> String;
}

/// A fixed identifier, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticUserId(pub String);

impl UserIdProvider for StaticUserId {
    fn user_id(&self) -> String {
        self.0.clone()
    }
}

/// Identifier persisted in a small text file, created on first use.
#[derive(Debug, Clone)]
pub struct FileUserIdProvider {
    path: PathBuf,
    id: String,
}

impl FileUserIdProvider {
    /// Read the id stored at `path`, or generate and store a new one.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(existing) if !existing.trim().is_empty() => {
                return Ok(Self {
                    path: path.to_path_buf(),
                    id: existing.trim().to_string(),
                });
            }
            Ok(_) => warn!("User id file {:?} is blank, regenerating", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(MindCareError::UserId(format!(
                    "Failed to read user id from {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MindCareError::UserId(format!("Failed to create data dir: {}", e)))?;
        }

        let id = generate_user_id();
        std::fs::write(path, &id)
            .map_err(|e| MindCareError::UserId(format!("Failed to store user id: {}", e)))?;
        info!("Generated new user id at {:?}", path);

        Ok(Self {
            path: path.to_path_buf(),
            id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserIdProvider for FileUserIdProvider {
    fn user_id(&self) -> String {
        self.id.clone()
    }
}

/// `user_<unix millis>_<9 random base-36 chars>`
pub fn generate_user_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .filter_map(|_| std::char::from_digit(rng.random_range(0..36), 36))
        .collect();
    format!("user_{}_{}", Utc::now().timestamp_millis(), suffix)
}
