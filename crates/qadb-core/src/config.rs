//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_RESOLVER__MAX_DISTANCE`).
//! Typed sections fall back to their defaults when absent.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CORPUS_PATH: &str = "data/qa.json";
pub const DEFAULT_FALLBACK_ANSWER: &str = "Sorry, I could not find a suitable answer.";

pub struct Config {
    figment: Figment,
}

/// Where the question/answer corpus is read from: a JSON file or a directory of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self { path: DEFAULT_CORPUS_PATH.to_string() }
    }
}

/// Tokenisation policy shared by fit and transform.
///
/// Lengths are counted in characters after lower-casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    pub min_token_len: usize,
    pub max_token_len: usize,
    pub stop_words: Vec<String>,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self { min_token_len: 2, max_token_len: 40, stop_words: Vec::new() }
    }
}

impl TokenizerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_token_len == 0 {
            return Err(Error::InvalidConfig("tokenizer.min_token_len must be at least 1".into()));
        }
        if self.min_token_len > self.max_token_len {
            return Err(Error::InvalidConfig(format!(
                "tokenizer.min_token_len ({}) exceeds tokenizer.max_token_len ({})",
                self.min_token_len, self.max_token_len
            )));
        }
        Ok(())
    }
}

/// Answer selection policy.
///
/// With `max_distance` unset every query resolves to its nearest question, however far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub max_distance: Option<f32>,
    pub fallback_answer: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { max_distance: None, fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string() }
    }
}

impl ResolverSettings {
    pub fn validate(&self) -> Result<()> {
        match self.max_distance {
            Some(d) if !d.is_finite() || d < 0.0 => Err(Error::InvalidConfig(format!(
                "resolver.max_distance must be a finite non-negative number, got {d}"
            ))),
            _ => Ok(()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    /// Wraps an already assembled figment, validating it as a `test` environment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment };
        config.validate_for_env("test")?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn get_or_default<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.contains(key) { self.get(key) } else { Ok(T::default()) }
    }

    pub fn corpus(&self) -> Result<CorpusSettings> {
        self.get_or_default("corpus")
    }

    pub fn tokenizer(&self) -> Result<TokenizerSettings> {
        self.get_or_default("tokenizer")
    }

    pub fn resolver(&self) -> Result<ResolverSettings> {
        self.get_or_default("resolver")
    }

    fn validate_for_env(&self, env: &str) -> Result<()> {
        self.tokenizer()?.validate()?;
        self.resolver()?.validate()?;
        if matches!(env, "prod" | "production") && !self.figment.contains("corpus.path") {
            return Err(Error::InvalidConfig("corpus.path must be set explicitly in production".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
