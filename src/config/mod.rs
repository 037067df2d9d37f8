pub mod ini;

use crate::error::{Error, Result};
use std::{fs, path::Path};

pub const GAC_DIR_NAME: &str = ".gac";
pub const PROFILE_FILE_NAME: &str = "profile";
pub const PROMPTS_DIR_NAME: &str = "prompts";
pub const DEFAULT_PROFILE_NAME: &str = "default";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-1106";

/// A profile key, the environment variable backing it and its fallback.
pub struct Setting {
    pub profile_key: &'static str,
    pub env_var: &'static str,
    pub default: Option<&'static str>,
}

pub const JIRA_EMAIL: Setting = Setting {
    profile_key: "jiraEmail",
    env_var: "JIRA_EMAIL",
    default: None,
};
pub const JIRA_API_KEY: Setting = Setting {
    profile_key: "jiraApiKey",
    env_var: "JIRA_API_KEY",
    default: None,
};
pub const JIRA_DOMAIN: Setting = Setting {
    profile_key: "jiraDomain",
    env_var: "JIRA_DOMAIN",
    default: None,
};
pub const GITHUB_ACCESS_TOKEN: Setting = Setting {
    profile_key: "githubAccessToken",
    env_var: "GITHUB_ACCESS_TOKEN",
    default: None,
};
pub const OPENAI_API_KEY: Setting = Setting {
    profile_key: "openaiApiKey",
    env_var: "OPENAI_API_KEY",
    default: None,
};
pub const OPENAI_MODEL: Setting = Setting {
    profile_key: "openaiModel",
    env_var: "OPENAI_MODEL",
    default: Some(DEFAULT_OPENAI_MODEL),
};

/// Every setting in profile file order.
pub const SETTINGS: [&Setting; 6] = [
    &JIRA_EMAIL,
    &JIRA_API_KEY,
    &JIRA_DOMAIN,
    &GITHUB_ACCESS_TOKEN,
    &OPENAI_API_KEY,
    &OPENAI_MODEL,
];

/// Settings resolved once at startup.
pub struct Config {
    jira_email: Option<String>,
    jira_api_key: Option<String>,
    jira_domain: Option<String>,
    github_access_token: Option<String>,
    openai_api_key: Option<String>,
    openai_model: String,
}

pub struct JiraSettings<'a> {
    pub domain: &'a str,
    pub email: &'a str,
    pub api_key: &'a str,
}

impl Config {
    /// Resolves every setting from the profile file, then the environment,
    /// then its default. A non-default profile is layered over `default`.
    pub fn load<F>(profile_path: &Path, profile_name: &str, env: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let sections = match fs::read_to_string(profile_path) {
            Ok(data) => ini::parse(&data),
            Err(err) => {
                log::error!(
                    "Error loading profile configuration from {}: {}",
                    profile_path.display(),
                    err
                );
                Default::default()
            }
        };

        let mut layers = vec![];
        let mut names = vec![DEFAULT_PROFILE_NAME];
        if profile_name != DEFAULT_PROFILE_NAME {
            names.push(profile_name);
        }

        for name in names {
            match sections.get(name) {
                Some(section) => {
                    log::info!(
                        "Profile configuration for '{}' loaded from {}.",
                        name,
                        profile_path.display()
                    );
                    layers.push(section);
                }
                None if sections.is_empty() => {}
                None => log::error!(
                    "Profile '{}' not found in {}.",
                    name,
                    profile_path.display()
                ),
            }
        }

        let resolve = |setting: &Setting| -> Option<String> {
            layers
                .iter()
                .rev()
                .find_map(|section| non_empty(section.get(setting.profile_key).cloned()))
                .or_else(|| non_empty(env(setting.env_var)))
                .or_else(|| setting.default.map(str::to_owned))
        };

        Config {
            jira_email: resolve(&JIRA_EMAIL),
            jira_api_key: resolve(&JIRA_API_KEY),
            jira_domain: resolve(&JIRA_DOMAIN),
            github_access_token: resolve(&GITHUB_ACCESS_TOKEN),
            openai_api_key: resolve(&OPENAI_API_KEY),
            openai_model: resolve(&OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_owned()),
        }
    }

    pub fn openai_api_key(&self) -> Result<&str> {
        required(&self.openai_api_key, "No OpenAI API key")
    }

    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }

    pub fn github_access_token(&self) -> Result<&str> {
        required(&self.github_access_token, "No GitHub access token")
    }

    pub fn jira(&self) -> Result<JiraSettings<'_>> {
        Ok(JiraSettings {
            domain: required(&self.jira_domain, "No Jira domain")?,
            email: required(&self.jira_email, "No Jira email")?,
            api_key: required(&self.jira_api_key, "No Jira API key")?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::configuration(message))
}
