//! Run configuration for the record patcher.
//!
//! A `PatcherConfig` names where record files are read from and written to,
//! plus the schema build and locale handed to the storage provider when a
//! file is opened. Configs are usually kept next to the patch documents as
//! a small TOML file.

use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Schema build used when the config does not name one.
pub const DEFAULT_BUILD: &str = "9.2.7.45745";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// PatcherConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatcherConfig {
    /// Directory record files are opened from.
    pub input_dir: PathBuf,

    /// Directory modified record files are written to.
    pub output_dir: PathBuf,

    #[serde(default = "default_build")]
    pub build: String,

    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub debug: bool,
}

impl PatcherConfig {
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            build: default_build(),
            locale: Locale::default(),
            debug: false,
        }
    }

    #[must_use]
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = build.into();
        self
    }

    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("input_dir must not be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".to_string()));
        }
        if self.build.trim().is_empty() {
            return Err(ConfigError::Invalid("build must not be empty".to_string()));
        }

        Ok(())
    }
}

fn default_build() -> String {
    DEFAULT_BUILD.to_string()
}

///
/// Locale
///
/// Client locale a record file was built for.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "enUS")]
    EnUs,
    #[serde(rename = "koKR")]
    KoKr,
    #[serde(rename = "frFR")]
    FrFr,
    #[serde(rename = "deDE")]
    DeDe,
    #[serde(rename = "zhCN")]
    ZhCn,
    #[serde(rename = "esES")]
    EsEs,
    #[serde(rename = "zhTW")]
    ZhTw,
    #[serde(rename = "enGB")]
    EnGb,
    #[serde(rename = "esMX")]
    EsMx,
    #[serde(rename = "ruRU")]
    RuRu,
    #[serde(rename = "ptBR")]
    PtBr,
    #[serde(rename = "itIT")]
    ItIt,
}

impl Locale {
    /// Stable locale code as it appears in config files.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EnUs => "enUS",
            Self::KoKr => "koKR",
            Self::FrFr => "frFR",
            Self::DeDe => "deDE",
            Self::ZhCn => "zhCN",
            Self::EsEs => "esES",
            Self::ZhTw => "zhTW",
            Self::EnGb => "enGB",
            Self::EsMx => "esMX",
            Self::RuRu => "ruRU",
            Self::PtBr => "ptBR",
            Self::ItIt => "itIT",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

///
/// TESTS
///
