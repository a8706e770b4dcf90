use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::strips::SearchLimits;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub domain: String,
    pub problem: String,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub limits: SearchLimits,
    #[serde(default)]
    pub logs: EnvFilterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvFilterConfig {
    pub default_level: String,
    #[serde(default)]
    pub filters: Vec<String>,
}

impl Default for EnvFilterConfig {
    fn default() -> Self {
        Self { default_level: "warn".to_owned(), filters: Vec::new() }
    }
}

impl TryInto<EnvFilter> for EnvFilterConfig {
    type Error = tracing_subscriber::filter::ParseError;

    fn try_into(self) -> Result<EnvFilter, Self::Error> {
        EnvFilter::builder()
            .with_default_directive(self.default_level.parse()?)
            .parse(self.filters.join(","))
    }
}

impl Settings {
    /// `planner.toml` if present, then `PLANNER__*` variables, then the command line.
    pub fn new(args: &[String]) -> Result<Self, ConfigError> {
        Self::load("planner", args)
    }

    /// Command line: `[domain] [problem] [--json]`.
    pub fn load(file: &str, args: &[String]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("PLANNER").separator("__").try_parsing(true));

        let mut positional = args.iter().filter(|a| !a.starts_with("--"));
        if let Some(domain) = positional.next() {
            builder = builder.set_override("domain", domain.as_str())?;
        }
        if let Some(problem) = positional.next() {
            builder = builder.set_override("problem", problem.as_str())?;
        }
        if let Some(extra) = positional.next() {
            return Err(ConfigError::Message(format!("Unexpected argument {}", extra)));
        }
        for flag in args.iter().filter(|a| a.starts_with("--")) {
            match flag.as_str() {
                "--json" => builder = builder.set_override("format", "json")?,
                "--text" => builder = builder.set_override("format", "text")?,
                _ => return Err(ConfigError::Message(format!("Unknown option {}", flag))),
            }
        }

        builder.build()?.try_deserialize()
    }
}
