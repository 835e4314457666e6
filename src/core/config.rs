//! Application configuration management
//!
//! Handles loading, validating and saving settings for:
//! - Branch naming (length limit, type prefixes, slug options)
//! - Commit message generation (Ollama connection, commit types, prompt)
//! - Pull request description generation (base branch, prompt)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::ai::prompts::{DEFAULT_COMMIT_PROMPT, DEFAULT_PR_PROMPT};
use crate::error::{Result, WeaveError};
use crate::naming::SanitizationOptions;

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "WEAVE_CONFIG";

/// Header written at the top of freshly created configuration files
const CONFIG_HEADER: &str = "# Weave configuration file\n\n";

/// Characters a separator may not contain: path and shell metacharacters,
/// the characters git refuses in ref names, and `.`
const PROBLEMATIC_SEPARATOR_CHARS: &[char] = &[
    '/', '\\', ':', '*', '?', '"', '<', '>', '|', '~', '^', '[', '.',
];

/// Maximum separator length in characters
const MAX_SEPARATOR_LENGTH: usize = 5;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub branch: BranchConfig,
    pub commit: CommitConfig,
    pub pr: PrConfig,
}

/// Branch naming settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Maximum branch name length
    pub max_length: usize,
    /// Type key used when none (or an unknown one) is given
    pub default_type: String,
    /// Type key to branch prefix mapping
    pub types: BTreeMap<String, String>,
    pub sanitization: SanitizationConfig,
}

impl Default for BranchConfig {
    fn default() -> Self {
        let types = ["feature", "hotfix", "refactor", "support"]
            .iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect();

        Self {
            max_length: 60,
            default_type: "feature".to_string(),
            types,
            sanitization: SanitizationConfig::default(),
        }
    }
}

impl BranchConfig {
    /// Slug options for a title with the given length budget
    pub fn sanitization_options(&self, max_length: usize) -> SanitizationOptions {
        SanitizationOptions {
            separator: self.sanitization.effective_separator().to_string(),
            lowercase: self.sanitization.lowercase,
            transliterate: self.sanitization.transliterate,
            max_length,
        }
    }

    /// Type keys in sorted order
    pub fn type_keys(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }
}

/// Slug normalization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizationConfig {
    pub separator: String,
    pub lowercase: bool,
    /// Replace diacritics with ASCII spellings
    #[serde(alias = "remove_umlauts")]
    pub transliterate: bool,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            lowercase: true,
            transliterate: false,
        }
    }
}

impl SanitizationConfig {
    /// Configured separator, or `-` when unset or unusable in a ref
    pub fn effective_separator(&self) -> &str {
        if check_separator(&self.separator).is_ok() {
            &self.separator
        } else {
            "-"
        }
    }
}

/// Commit message generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Allowed conventional commit types
    pub types: Vec<String>,
    pub prompt: String,
    pub ollama: OllamaConfig,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            types: [
                "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "ci", "build",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            prompt: DEFAULT_COMMIT_PROMPT.to_string(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Local Ollama server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub model: String,
    pub host: String,
    pub temperature: f64,
    pub top_p: f64,
    /// Diff bytes passed to the model for commit messages
    pub max_diff: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            host: "http://localhost:11434".to_string(),
            temperature: 0.3,
            top_p: 0.9,
            max_diff: 4000,
        }
    }
}

/// Pull request description settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrConfig {
    /// Base branch; detected from the repository when empty
    pub default_base: String,
    pub default_remote: String,
    /// Diff bytes passed to the model for PR descriptions
    pub max_diff: usize,
    pub prompt: String,
}

impl Default for PrConfig {
    fn default() -> Self {
        Self {
            default_base: String::new(),
            default_remote: "origin".to_string(),
            max_diff: 8000,
            prompt: DEFAULT_PR_PROMPT.to_string(),
        }
    }
}

/// Outcome of [`validate_and_fix`]
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Problems that could not be repaired
    pub errors: Vec<WeaveError>,
    /// Repairs that were applied
    pub warnings: Vec<String>,
    /// Whether any field was changed
    pub fixed: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn fix(&mut self, warning: String) {
        self.warnings.push(warning);
        self.fixed = true;
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults first if it is missing.
    ///
    /// Out-of-range values are replaced with defaults and reported through
    /// `tracing`; unrepairable problems fail the load.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::ensure_exists(path)?;

        let mut config = Self::read_raw(path)?;
        let report = validate_and_fix(&mut config);

        if let Some(error) = report.errors.into_iter().next() {
            return Err(error);
        }

        for warning in &report.warnings {
            tracing::warn!("config: {}", warning);
        }

        Ok(config)
    }

    /// Parse `path` without validation
    pub fn read_raw(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write a default configuration file if none exists at `path`
    pub fn ensure_exists(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }

        tracing::debug!("Creating default configuration at {}", path.display());
        Config::default().save_to(path)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = format!("{}{}", CONFIG_HEADER, toml::to_string_pretty(self)?);
        fs::write(path, contents)?;

        Ok(())
    }

    /// Resolve the configuration file path.
    ///
    /// `WEAVE_CONFIG` wins over the platform configuration directory.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the platform configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "weave", "weave")
            .ok_or_else(|| WeaveError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().to_path_buf())
    }
}

/// Replace invalid values with defaults, recording a warning for each repair
pub fn validate_and_fix(config: &mut Config) -> ValidationReport {
    let mut report = ValidationReport::default();
    let defaults = Config::default();

    // branch.max_length
    if !(10..=200).contains(&config.branch.max_length) {
        report.fix(format!(
            "branch.max_length {} is out of range (10-200), using default {}",
            config.branch.max_length, defaults.branch.max_length
        ));
        config.branch.max_length = defaults.branch.max_length;
    }

    // branch.types
    if config.branch.types.is_empty() {
        report.fix("branch.types is empty, using defaults".to_string());
        config.branch.types = defaults.branch.types.clone();
    } else {
        if config.branch.types.contains_key("") {
            report
                .errors
                .push(WeaveError::Config("branch.types key cannot be empty".into()));
        }

        let empty_keys: Vec<String> = config
            .branch
            .types
            .iter()
            .filter(|(key, value)| !key.is_empty() && value.is_empty())
            .map(|(key, _)| key.clone())
            .collect();

        for key in empty_keys {
            report.fix(format!(
                "branch.types value for key '{}' is empty, using key as value",
                key
            ));
            config.branch.types.insert(key.clone(), key);
        }
    }

    // branch.default_type
    if config.branch.default_type.is_empty() {
        report.fix(format!(
            "branch.default_type is empty, using default '{}'",
            defaults.branch.default_type
        ));
        config.branch.default_type = defaults.branch.default_type.clone();
    } else if !config.branch.types.contains_key(&config.branch.default_type) {
        report.fix(format!(
            "branch.default_type '{}' does not exist in branch.types, using default '{}'",
            config.branch.default_type, defaults.branch.default_type
        ));
        config.branch.default_type = defaults.branch.default_type.clone();
    }

    // branch.sanitization.separator
    if let Err(problem) = check_separator(&config.branch.sanitization.separator) {
        report.fix(format!(
            "branch.sanitization.separator {}, using default '{}'",
            problem, defaults.branch.sanitization.separator
        ));
        config.branch.sanitization.separator = defaults.branch.sanitization.separator.clone();
    }

    // commit.ollama
    let ollama = &mut config.commit.ollama;
    if ollama.model.is_empty() {
        report.fix(format!(
            "commit.ollama.model is empty, using default '{}'",
            defaults.commit.ollama.model
        ));
        ollama.model = defaults.commit.ollama.model.clone();
    }
    if ollama.host.is_empty() {
        report.fix(format!(
            "commit.ollama.host is empty, using default '{}'",
            defaults.commit.ollama.host
        ));
        ollama.host = defaults.commit.ollama.host.clone();
    }
    if !(0.0..=2.0).contains(&ollama.temperature) {
        report.fix(format!(
            "commit.ollama.temperature {:.2} is out of range (0-2), using default {:.2}",
            ollama.temperature, defaults.commit.ollama.temperature
        ));
        ollama.temperature = defaults.commit.ollama.temperature;
    }
    if !(0.0..=1.0).contains(&ollama.top_p) {
        report.fix(format!(
            "commit.ollama.top_p {:.2} is out of range (0-1), using default {:.2}",
            ollama.top_p, defaults.commit.ollama.top_p
        ));
        ollama.top_p = defaults.commit.ollama.top_p;
    }
    if !(100..=100_000).contains(&ollama.max_diff) {
        report.fix(format!(
            "commit.ollama.max_diff {} is out of range (100-100000), using default {}",
            ollama.max_diff, defaults.commit.ollama.max_diff
        ));
        ollama.max_diff = defaults.commit.ollama.max_diff;
    }

    // commit.types / commit.prompt
    if config.commit.types.is_empty() {
        report.fix("commit.types is empty, using defaults".to_string());
        config.commit.types = defaults.commit.types.clone();
    }
    if config.commit.prompt.trim().is_empty() {
        report.fix("commit.prompt is empty, using default".to_string());
        config.commit.prompt = defaults.commit.prompt.clone();
    }

    // pr
    if !(100..=100_000).contains(&config.pr.max_diff) {
        report.fix(format!(
            "pr.max_diff {} is out of range (100-100000), using default {}",
            config.pr.max_diff, defaults.pr.max_diff
        ));
        config.pr.max_diff = defaults.pr.max_diff;
    }
    if config.pr.prompt.trim().is_empty() {
        report.fix("pr.prompt is empty, using default".to_string());
        config.pr.prompt = defaults.pr.prompt.clone();
    }

    report
}

/// Check every rule, failing on the first violation without repairing anything
pub fn validate_strict(config: &Config) -> Result<()> {
    let invalid = |msg: String| Err(WeaveError::Config(msg));

    if !(10..=200).contains(&config.branch.max_length) {
        return invalid("branch.max_length must be between 10 and 200".into());
    }

    if config.branch.types.is_empty() {
        return invalid("branch.types cannot be empty".into());
    }
    for (key, value) in &config.branch.types {
        if key.is_empty() {
            return invalid("branch.types key cannot be empty".into());
        }
        if value.is_empty() {
            return invalid(format!(
                "branch.types value for key '{}' cannot be empty",
                key
            ));
        }
    }

    if config.branch.default_type.is_empty() {
        return invalid("branch.default_type cannot be empty".into());
    }
    if !config.branch.types.contains_key(&config.branch.default_type) {
        return invalid(format!(
            "branch.default_type '{}' must exist in branch.types",
            config.branch.default_type
        ));
    }

    if let Err(problem) = check_separator(&config.branch.sanitization.separator) {
        return invalid(format!("branch.sanitization.separator {}", problem));
    }

    let ollama = &config.commit.ollama;
    if ollama.model.is_empty() {
        return invalid("commit.ollama.model cannot be empty".into());
    }
    if ollama.host.is_empty() {
        return invalid("commit.ollama.host cannot be empty".into());
    }
    if !(0.0..=2.0).contains(&ollama.temperature) {
        return invalid("commit.ollama.temperature must be between 0 and 2".into());
    }
    if !(0.0..=1.0).contains(&ollama.top_p) {
        return invalid("commit.ollama.top_p must be between 0 and 1".into());
    }
    if !(100..=100_000).contains(&ollama.max_diff) {
        return invalid("commit.ollama.max_diff must be between 100 and 100000".into());
    }
    if config.commit.types.is_empty() {
        return invalid("commit.types cannot be empty".into());
    }
    if config.commit.prompt.trim().is_empty() {
        return invalid("commit.prompt cannot be empty".into());
    }

    if !(100..=100_000).contains(&config.pr.max_diff) {
        return invalid("pr.max_diff must be between 100 and 100000".into());
    }
    if config.pr.prompt.trim().is_empty() {
        return invalid("pr.prompt cannot be empty".into());
    }

    Ok(())
}

/// Describe what is wrong with a separator, if anything
fn check_separator(separator: &str) -> std::result::Result<(), String> {
    if separator.is_empty() {
        return Err("is empty".to_string());
    }
    if separator.chars().count() > MAX_SEPARATOR_LENGTH {
        return Err(format!(
            "'{}' is too long (>{} chars)",
            separator, MAX_SEPARATOR_LENGTH
        ));
    }
    if let Some(c) = separator
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || PROBLEMATIC_SEPARATOR_CHARS.contains(c))
    {
        return Err(format!(
            "'{}' contains problematic character {:?}",
            separator, c
        ));
    }
    Ok(())
}
