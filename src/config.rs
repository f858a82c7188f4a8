//! TOML configuration for the classifier.
//!
//! Every field is optional. An empty file, or no file at all, gives the
//! built-in IRS registry, the default scored types and the default clip
//! region.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::form_identifier::{FormPattern, FormRegistry};
use crate::core::geometry::ClipRegion;
use crate::core::scoring::DesiredTypes;
use crate::error::{Result, TaxsegError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Form types kept in output and scored. Defaults to the built-in list.
    #[serde(default)]
    pub desired_types: Option<Vec<String>>,
    /// Region of each page searched for the form title.
    #[serde(default)]
    pub clip: ClipRegion,
    /// Replaces the built-in registry when present. Order is match order.
    #[serde(default)]
    pub patterns: Option<Vec<PatternConfig>>,
}

/// One registry entry. Exactly one of `title` or `regex` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    pub label: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
}

impl PatternConfig {
    fn build(&self) -> Result<FormPattern> {
        match (&self.title, &self.regex) {
            (Some(title), None) => FormPattern::from_title(self.label.as_str(), title),
            (None, Some(regex)) => FormPattern::from_regex(self.label.as_str(), regex),
            _ => Err(TaxsegError::InvalidConfig(format!(
                "pattern '{}' needs exactly one of `title` or `regex`",
                self.label
            ))),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TaxsegError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            TaxsegError::InvalidConfig(msg) => {
                TaxsegError::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(s).map_err(|err| TaxsegError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every setting and returns the registry it describes.
    pub fn validate(&self) -> Result<FormRegistry> {
        self.clip.validate()?;
        if let Some(types) = &self.desired_types {
            if types.iter().any(|t| t.trim().is_empty()) {
                return Err(TaxsegError::InvalidConfig(
                    "desired_types contains an empty entry".into(),
                ));
            }
        }
        self.registry()
    }

    pub fn registry(&self) -> Result<FormRegistry> {
        match &self.patterns {
            None => Ok(FormRegistry::irs_default()),
            Some(entries) => {
                let patterns = entries
                    .iter()
                    .map(PatternConfig::build)
                    .collect::<Result<Vec<_>>>()?;
                FormRegistry::new(patterns)
            }
        }
    }

    pub fn desired_types(&self) -> DesiredTypes {
        match &self.desired_types {
            Some(types) => DesiredTypes::new(types.iter().map(String::as_str)),
            None => DesiredTypes::default(),
        }
    }
}
