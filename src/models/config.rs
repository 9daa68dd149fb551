use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub coach: CoachSettings,
    #[serde(default)]
    pub confirm: ConfirmSettings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub body_weight_kg: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Where CSV files land; current directory when unset.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoachSettings {
    /// External program that reads a prompt on stdin and answers on stdout.
    pub command: Option<String>,
    #[serde(default = "default_context_days")]
    pub context_days: u32,
}

fn default_context_days() -> u32 {
    30
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            command: None,
            context_days: default_context_days(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ConfirmSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        write_private(&Self::path(), contents.as_bytes())
    }

    /// Apply a `config set` key. Unknown keys are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "name" => self.profile.name = Some(value.to_string()),
            "weight" | "body_weight_kg" => {
                let w: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid weight: {}", value))?;
                if !w.is_finite() || w <= 0.0 {
                    anyhow::bail!("weight must be positive");
                }
                self.profile.body_weight_kg = Some(w);
            }
            "export.directory" => self.export.directory = Some(PathBuf::from(value)),
            "coach.command" => self.coach.command = Some(value.to_string()),
            "coach.context_days" => self.coach.context_days = value.parse()?,
            "confirm.timeout_secs" => self.confirm.timeout_secs = value.parse()?,
            _ => anyhow::bail!("unknown config key: {}", key),
        }
        Ok(())
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("LIFTLOG_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftlog")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Write a file readable only by the owner, creating the data dir if needed.
pub fn write_private(path: &std::path::Path, contents: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
        }
    }

    #[cfg(unix)]
    {
        use std::fs::{self, OpenOptions};
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true).mode(0o600);
        let mut file = options.open(path)?;
        file.write_all(contents)?;

        // Set after writing so a failure here never leaves an empty file.
        let mut perms = file.metadata()?.permissions();
        if perms.mode() & 0o777 != 0o600 {
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }
    }
    #[cfg(not(unix))]
    {
        std::fs::write(path, contents)?;
    }

    Ok(())
}
