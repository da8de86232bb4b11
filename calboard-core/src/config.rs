//! Calboard configuration.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::drag::DropPolicy;
use crate::error::{CalboardError, CalboardResult};
use crate::event::{DEFAULT_PALETTE, Palette};
use crate::grid::GridView;
use crate::logging;

static ENV_PREFIX: &str = "CALBOARD";

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration at ~/.config/calboard/config.toml
///
/// Every field is optional; `CALBOARD_*` environment variables override the
/// file (e.g. `CALBOARD_DEFAULT_VIEW=week`). The palette takes a
/// comma-separated list: `CALBOARD_PALETTE=#112233,#445566`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalboardConfig {
    /// View shown on startup
    #[serde(default)]
    pub default_view: GridView,

    /// Whether the event form opens in full-day mode
    #[serde(default = "default_true")]
    pub full_day_default: bool,

    /// Colors offered by the event form, as `#RRGGBB`
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// IANA time zone used to decide what "today" is. System local time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Keep an event's time of day when it is dropped on another day
    #[serde(default)]
    pub preserve_time_on_drop: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CalboardConfig {
    fn default() -> Self {
        CalboardConfig {
            default_view: GridView::default(),
            full_day_default: true,
            palette: default_palette(),
            timezone: None,
            preserve_time_on_drop: false,
            log_level: default_log_level(),
        }
    }
}

impl CalboardConfig {
    pub fn config_path() -> CalboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalboardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location.
    pub fn load() -> CalboardResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (which may be missing) plus environment overrides.
    pub fn load_from(path: &Path) -> CalboardResult<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given.
    fn load_with_env(path: &Path, env: Option<Map<String, String>>) -> CalboardResult<Self> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("palette")
            .source(env);

        let config: CalboardConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()
            .map_err(|e| CalboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalboardError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> CalboardResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CalboardError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalboardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# View shown on startup (\"month\" or \"week\"):
# default_view = \"month\"

# Open the event form in full-day mode:
# full_day_default = true

# Colors offered by the event form:
# palette = [{}]

# Time zone used to decide what today is (defaults to system local time):
# timezone = \"Europe/Berlin\"

# Keep an event's time of day when dragging it to another day:
# preserve_time_on_drop = false

# One of off, error, warn, info, debug, trace:
# log_level = \"info\"
",
            DEFAULT_PALETTE
                .iter()
                .map(|c| format!("\"{}\"", c))
                .collect::<Vec<_>>()
                .join(", ")
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn validate(&self) -> CalboardResult<()> {
        self.palette()?;
        self.timezone()?;
        self.log_level()?;
        Ok(())
    }

    pub fn palette(&self) -> CalboardResult<Palette> {
        if self.palette.is_empty() {
            return Err(CalboardError::Config("Palette must not be empty".into()));
        }
        Palette::new(self.palette.clone())
    }

    pub fn timezone(&self) -> CalboardResult<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| CalboardError::Config(format!("Unknown time zone '{}'", name)))
            })
            .transpose()
    }

    /// The configured level, spelled the way [`logging::init_logging`] expects.
    pub fn log_level(&self) -> CalboardResult<&'static str> {
        logging::normalize_level(&self.log_level)
    }

    pub fn drop_policy(&self) -> DropPolicy {
        if self.preserve_time_on_drop {
            DropPolicy::PreserveTimeOfDay
        } else {
            DropPolicy::ResetToDate
        }
    }

    /// Today's date in the configured time zone.
    pub fn today(&self) -> CalboardResult<NaiveDate> {
        Ok(match self.timezone()? {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        })
    }
}
