use crate::core::business_day::{BusinessClock, DEFAULT_UTC_OFFSET_HOURS};
use crate::core::calendar::WeekdayCalendar;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// A signature line printed at the bottom of the monthly matrix PDF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    pub name: String,
    pub role: String,
}

/// Labels printed on report headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_organization")]
    pub organization: String,
    #[serde(default = "default_zone")]
    pub zone: String,
    #[serde(default = "default_signatures")]
    pub signatures: Vec<Signature>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            zone: default_zone(),
            signatures: default_signatures(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Signed hours east of UTC that define the business day (-5 = Peru time).
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    /// Weekdays on which the group meets (`mon`..`sun`).
    #[serde(default = "default_meeting_days")]
    pub meeting_days: Vec<String>,
    #[serde(default = "default_busy_timeout")]
    pub db_busy_timeout_ms: u64,
    /// Spreadsheet sync endpoint notified after each check-in.
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout_ms: u64,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_utc_offset() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}
fn default_meeting_days() -> Vec<String> {
    vec!["tue".to_string(), "sat".to_string()]
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_notify_timeout() -> u64 {
    3000
}
fn default_organization() -> String {
    "COMUNIDAD CATOLICA BODAS DE CANA".to_string()
}
fn default_zone() -> String {
    "ZONA 28 LAMBAYEQUE".to_string()
}
fn default_signatures() -> Vec<Signature> {
    vec![
        Signature {
            name: "JORGE Y GLADYS SAMAME CHOZO".to_string(),
            role: "RESPONSABLES ZONAL".to_string(),
        },
        Signature {
            name: "WILMER Y ESTHER MEDINA FLORES".to_string(),
            role: "RESPONSABLES SECRETARIA".to_string(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    /// Defaults for everything except the database path.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            utc_offset_hours: default_utc_offset(),
            meeting_days: default_meeting_days(),
            db_busy_timeout_ms: default_busy_timeout(),
            notify_url: None,
            notify_timeout_ms: default_notify_timeout(),
            report: ReportConfig::default(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("qrattend")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".qrattend")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("qrattend.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("qrattend.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Build the business-day clock described by this configuration.
    pub fn clock(&self) -> AppResult<BusinessClock> {
        BusinessClock::new(self.utc_offset_hours)
    }

    /// Build the meeting calendar described by this configuration.
    pub fn calendar(&self) -> AppResult<WeekdayCalendar> {
        WeekdayCalendar::from_names(&self.meeting_days)
    }

    /// Report which optional keys are absent from the file on disk.
    pub fn missing_fields() -> AppResult<Vec<&'static str>> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;

        let keys = [
            "database",
            "utc_offset_hours",
            "meeting_days",
            "db_busy_timeout_ms",
            "notify_url",
            "notify_timeout_ms",
            "report",
        ];

        Ok(keys
            .into_iter()
            .filter(|k| value.get(*k).is_none())
            .collect())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Self::with_database(db_path.to_string_lossy().to_string());

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
