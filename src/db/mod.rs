mod collections;
mod migrate;

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// The seven independently persisted record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKey {
    StrengthSets,
    Sleep,
    NutrientLogs,
    Nutrients,
    CardioSessions,
    CardioTypes,
    Routines,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 7] = [
        Self::StrengthSets,
        Self::Sleep,
        Self::NutrientLogs,
        Self::Nutrients,
        Self::CardioSessions,
        Self::CardioTypes,
        Self::Routines,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrengthSets => "strength_sets",
            Self::Sleep => "sleep",
            Self::NutrientLogs => "nutrient_logs",
            Self::Nutrients => "nutrients",
            Self::CardioSessions => "cardio_sessions",
            Self::CardioTypes => "cardio_types",
            Self::Routines => "routines",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown collection: {}", s))
    }
}

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .mode(0o600)
                    .open(path)?;
            } else {
                let mut perms = fs::metadata(path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        debug!(path = %path.display(), "record store opened");
        Ok(db)
    }
}
