use std::{env, error::Error, fmt, fs, io, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;

use crate::{
    dataset::Mode,
    error::PerceptronErr,
    model::DEFAULT_SIGMA,
    training::{DEFAULT_EPOCH_LIMIT, DEFAULT_LEARNING_RATE, TrainerConfig},
};

pub const DEFAULT_INTERVAL_MS: u64 = 400;

/// The settings of a demo run.
///
/// Layered in order: defaults, a JSON file, then `PERCEPTRON_*` environment variables.
/// Missing keys in the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub mode: Mode,
    pub learning_rate: f64,
    pub epoch_limit: usize,
    pub interval_ms: u64,
    pub sigma: f64,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            learning_rate: DEFAULT_LEARNING_RATE,
            epoch_limit: DEFAULT_EPOCH_LIMIT.get(),
            interval_ms: DEFAULT_INTERVAL_MS,
            sigma: DEFAULT_SIGMA,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads the settings from a JSON file.
    ///
    /// # Errors
    /// Returns a `SettingsErr` if the file can't be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsErr> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides the settings with the process' `PERCEPTRON_*` environment variables.
    pub fn merge_env(self) -> Result<Self, SettingsErr> {
        self.merge_vars(|key| env::var(key).ok())
    }

    /// Overrides the settings with the variables `lookup` finds.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable given its name.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self, SettingsErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = parse_var(&lookup, "PERCEPTRON_MODE")? {
            self.mode = mode;
        }
        if let Some(lr) = parse_var(&lookup, "PERCEPTRON_LR")? {
            self.learning_rate = lr;
        }
        if let Some(epochs) = parse_var(&lookup, "PERCEPTRON_EPOCHS")? {
            self.epoch_limit = epochs;
        }
        if let Some(ms) = parse_var(&lookup, "PERCEPTRON_INTERVAL_MS")? {
            self.interval_ms = ms;
        }
        if let Some(sigma) = parse_var(&lookup, "PERCEPTRON_SIGMA")? {
            self.sigma = sigma;
        }
        if let Some(seed) = parse_var(&lookup, "PERCEPTRON_SEED")? {
            self.seed = Some(seed);
        }

        Ok(self)
    }

    /// Validates the hyperparameters and builds the trainer configuration.
    pub fn trainer_config(&self) -> Result<TrainerConfig, SettingsErr> {
        Ok(TrainerConfig::new(self.learning_rate, self.epoch_limit)?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, SettingsErr>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    let parsed = value.trim().parse::<T>();
    parsed
        .map(Some)
        .map_err(|_| SettingsErr::InvalidVar { key, value })
}

/// Failures while loading the settings.
#[derive(Debug)]
pub enum SettingsErr {
    Io(io::Error),
    Json(serde_json::Error),
    InvalidVar { key: &'static str, value: String },
    Invalid(PerceptronErr),
}

impl fmt::Display for SettingsErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsErr::Io(e) => write!(f, "cannot read settings: {e}"),
            SettingsErr::Json(e) => write!(f, "invalid settings JSON: {e}"),
            SettingsErr::InvalidVar { key, value } => {
                write!(f, "invalid value for {key}: '{value}'")
            }
            SettingsErr::Invalid(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl Error for SettingsErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsErr::Io(e) => Some(e),
            SettingsErr::Json(e) => Some(e),
            SettingsErr::Invalid(e) => Some(e),
            SettingsErr::InvalidVar { .. } => None,
        }
    }
}

impl From<io::Error> for SettingsErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<PerceptronErr> for SettingsErr {
    fn from(value: PerceptronErr) -> Self {
        Self::Invalid(value)
    }
}
