use crate::wheel::color::Palette;
use crate::wheel::ingest::{Column, ColumnLayout, DuplicatePolicy};
use crate::wheel::spin::Deceleration;
use directories::ProjectDirs;
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Spreadsheet export the wheel is read from.
    pub path: Option<PathBuf>,
    pub column: Column,
    #[serde_as(as = "NoneAsEmptyString")]
    pub sub_column: Option<Column>,
    pub extra_columns: Vec<Column>,
    /// First data row, 1-based.
    pub row: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            column: Column::from_index(0),
            sub_column: None,
            extra_columns: Vec::new(),
            row: 1,
        }
    }
}

impl SourceConfig {
    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            name: self.column,
            sub: self.sub_column,
            extras: self.extra_columns.clone(),
            first_row: self.row,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    #[serde(deserialize_with = "deserialize_palette")]
    pub colors: Palette,
    pub font: String,
    pub remove_dupes: bool,
    pub combine_dupes: bool,
    /// Skip the finish sound and winner banner. Result files are still written.
    pub suppress_win: bool,
    /// Where the first slice starts, in degrees.
    pub start_angle: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            colors: Palette::default(),
            font: "Sans".to_string(),
            remove_dupes: true,
            combine_dupes: false,
            suppress_win: false,
            start_angle: 0.0,
        }
    }
}

impl WheelConfig {
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::from_flags(self.remove_dupes, self.combine_dupes)
    }
}

fn deserialize_palette<'de, D>(deserializer: D) -> Result<Palette, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<[u8; 3]>::deserialize(deserializer)?;
    Palette::try_from(raw).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub base_velocity: f64,
    pub extra_min: u32,
    pub extra_max: u32,
    /// Percent of speed lost per frame with exponential deceleration.
    pub decel_rate: f64,
    pub deceleration: Deceleration,
    /// Drift of a wheel that has not been spun yet, degrees per frame.
    pub idle_velocity: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            base_velocity: 25.0,
            extra_min: 25,
            extra_max: 100,
            decel_rate: 1.0,
            deceleration: Deceleration::Exponential,
            idle_velocity: 0.02,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Directory holding the trigger markers and result files.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    pub file: Option<PathBuf>,
    pub scale: f64,
    pub rotate: bool,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            file: None,
            scale: 1.0,
            rotate: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub file: Option<PathBuf>,
    pub x_pos: f64,
    pub y_pos: f64,
    pub scale: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            file: None,
            x_pos: 1040.0,
            y_pos: 500.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub file: Option<PathBuf>,
    pub volume: f64,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            file: None,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub nearest_neighbour: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub wheel: WheelConfig,
    pub spin: SpinConfig,
    pub control: ControlConfig,
    pub center: CenterConfig,
    pub pointer: PointerConfig,
    pub tick: SoundConfig,
    pub finished: SoundConfig,
    pub window: WindowConfig,
    /// Directory relative paths in the file are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("No spreadsheet export configured, set source.path")]
    MissingSource,
    #[error("spin.decel_rate must be between 0 and 100 (exclusive), got {0}")]
    DecelRate(f64),
    #[error("spin.extra_min ({0}) is larger than spin.extra_max ({1})")]
    ExtraRange(u32, u32),
    #[error("spin.base_velocity must be positive, got {0}")]
    BaseVelocity(f64),
    #[error("source.row is 1-based, got 0")]
    FirstRow,
}

impl Config {
    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.path.is_none() {
            return Err(ConfigError::MissingSource);
        }
        if self.source.row == 0 {
            return Err(ConfigError::FirstRow);
        }
        let rate = self.spin.decel_rate;
        if self.spin.deceleration == Deceleration::Exponential && !(rate > 0.0 && rate < 100.0) {
            return Err(ConfigError::DecelRate(rate));
        }
        if self.spin.extra_min > self.spin.extra_max {
            return Err(ConfigError::ExtraRange(
                self.spin.extra_min,
                self.spin.extra_max,
            ));
        }
        if self.spin.base_velocity <= 0.0 {
            return Err(ConfigError::BaseVelocity(self.spin.base_velocity));
        }
        Ok(())
    }

    /// Joins relative paths onto the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn source_path(&self) -> Option<PathBuf> {
        self.source.path.as_deref().map(|p| self.resolve(p))
    }

    pub fn control_dir(&self) -> PathBuf {
        self.control
            .dir
            .as_deref()
            .map(|p| self.resolve(p))
            .unwrap_or_else(|| self.base_dir.clone())
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "sorcle", "sorcle").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Reads the TOML file (optional) layered with `SORCLE_*` environment
/// variables, e.g. `SORCLE_SPIN__DECEL_RATE=2`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    let s = config::Config::builder()
        .add_source(config::File::from(config_path.clone()).required(path.is_some()))
        .add_source(
            config::Environment::with_prefix("SORCLE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("source.extra_columns")
                .try_parsing(true),
        )
        .build()?;

    let mut config: Config = s.try_deserialize()?;
    config.base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    config.validate()?;
    Ok(config)
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
