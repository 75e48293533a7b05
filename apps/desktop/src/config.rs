use std::{fs, path::Path, str::FromStr};

use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_id: i64,
    pub project_name: String,
    /// Whether the signed-in user turns out to back the project once logged in.
    pub backing: bool,
    pub comment_count: u32,
    pub latency_ms: u64,
    pub log_filter: String,
    pub script: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id: factories::id::PROJECT_ID,
            project_name: "Some Project Name".into(),
            backing: true,
            comment_count: 3,
            latency_ms: 150,
            log_filter: "info".into(),
            script: vec![
                "login_click".into(),
                "login".into(),
                "text:Great project!".into(),
                "submit:Great project!".into(),
                "back".into(),
            ],
        }
    }
}

impl Settings {
    pub fn steps(&self) -> anyhow::Result<Vec<DemoStep>> {
        self.script
            .iter()
            .map(|raw| raw.parse::<DemoStep>())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoStep {
    ComposeText(String),
    Submit(String),
    LoginClick,
    Login,
    Back,
}

impl FromStr for DemoStep {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (raw, None),
        };
        let step = match (name, arg) {
            ("text", Some(text)) => DemoStep::ComposeText(text.to_string()),
            ("text", None) => DemoStep::ComposeText(String::new()),
            ("submit", Some(body)) => DemoStep::Submit(body.to_string()),
            ("login_click", None) => DemoStep::LoginClick,
            ("login", None) => DemoStep::Login,
            ("back", None) => DemoStep::Back,
            ("submit", None) => bail!("submit step needs a body, e.g. 'submit:hello'"),
            _ => bail!("unknown demo step '{raw}'"),
        };
        Ok(step)
    }
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("APP__PROJECT_ID") {
        settings.project_id = v
            .parse()
            .with_context(|| format!("APP__PROJECT_ID is not an integer: '{v}'"))?;
    }
    if let Some(v) = var("APP__PROJECT_NAME") {
        settings.project_name = v;
    }
    if let Some(v) = var("APP__BACKING") {
        settings.backing = v
            .parse()
            .with_context(|| format!("APP__BACKING must be true or false: '{v}'"))?;
    }
    if let Some(v) = var("APP__COMMENT_COUNT") {
        settings.comment_count = v
            .parse()
            .with_context(|| format!("APP__COMMENT_COUNT is not a count: '{v}'"))?;
    }
    if let Some(v) = var("APP__LATENCY_MS") {
        settings.latency_ms = v
            .parse()
            .with_context(|| format!("APP__LATENCY_MS is not a duration in ms: '{v}'"))?;
    }
    if let Some(v) = var("RUST_LOG").or_else(|| var("APP__LOG_FILTER")) {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__SCRIPT") {
        settings.script = v
            .split(',')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(str::to_string)
            .collect();
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
