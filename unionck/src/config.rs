//! `unionck.toml` configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::TypeRef;
use crate::diagnostics::Severity;
use crate::error::Result;

/// File looked up next to a snapshot when no config is given
pub const CONFIG_FILE_NAME: &str = "unionck.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub unions: UnionsConfig,
    pub types: TypesConfig,
    pub diagnostics: DiagnosticsConfig,
    pub fix: FixConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnionsConfig {
    /// Generic union constructors, e.g. `OneOf` for `OneOf<A, B>`
    pub generic: Vec<String>,
}

impl Default for UnionsConfig {
    fn default() -> Self {
        Self {
            generic: vec!["OneOf".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypesConfig {
    pub ignore_nullability: bool,
    pub aliases: BTreeMap<String, TypeRef>,
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            ignore_nullability: true,
            aliases: BTreeMap::new(),
        }
    }
}

/// Reporting level of one diagnostic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Off,
    Warning,
    Error,
}

impl Level {
    pub fn severity(self) -> Option<Severity> {
        match self {
            Level::Off => None,
            Level::Warning => Some(Severity::Warning),
            Level::Error => Some(Severity::Error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    pub missing_cases: Level,
    pub unreachable_arm: Level,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            missing_cases: Level::Error,
            unreachable_arm: Level::Warning,
        }
    }
}

/// Which fix to offer for a non-exhaustive match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixPreference {
    /// One arm per missing variant
    Arms,
    /// A single discard arm
    Discard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixConfig {
    pub prefer: FixPreference,
    /// Arm text; `{type}` and `{binding}` are substituted
    pub arm_template: String,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            prefer: FixPreference::Arms,
            arm_template: "{type} {binding} => todo".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// `unionck.toml` in `dir` if present, defaults otherwise
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Config aliases as (name, target) pairs
    pub fn aliases(&self) -> impl Iterator<Item = (String, TypeRef)> + '_ {
        self.types
            .aliases
            .iter()
            .map(|(name, target)| (name.clone(), target.clone()))
    }
}
