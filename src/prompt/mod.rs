use crate::error::Result;
use handlebars::Handlebars;
use serde::Serialize;
use std::{fs, path::Path};

pub const COMMIT_MESSAGE_TEMPLATE: &str = "commitMessage";
pub const PULL_REQUEST_DESCRIPTION_TEMPLATE: &str = "pullRequestDescription";
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Templates shipped with the binary, by name.
pub const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (COMMIT_MESSAGE_TEMPLATE, include_str!("./commitMessage.hbs")),
    (
        PULL_REQUEST_DESCRIPTION_TEMPLATE,
        include_str!("./pullRequestDescription.hbs"),
    ),
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptContext<'a> {
    diff: &'a str,
    jira_content: &'a str,
}

pub struct Prompts<'hb> {
    hb: Handlebars<'hb>,
}

impl<'hb> Prompts<'hb> {
    /// Registers the built-in templates, preferring `<name>.hbs` files
    /// found in `overrides`.
    pub fn load(overrides: Option<&Path>) -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);

        for (name, builtin) in BUILTIN_TEMPLATES {
            let custom = overrides
                .map(|dir| dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION)))
                .filter(|path| path.is_file());

            match custom {
                Some(path) => {
                    log::debug!("using prompt template {}", path.display());
                    hb.register_template_string(name, fs::read_to_string(&path)?)?;
                }
                None => hb.register_template_string(name, builtin)?,
            }
        }

        Ok(Prompts { hb })
    }

    pub fn commit_message(&self, diff: &str, jira_content: &str) -> Result<String> {
        self.render(COMMIT_MESSAGE_TEMPLATE, diff, jira_content)
    }

    pub fn pull_request_description(&self, diff: &str, jira_content: &str) -> Result<String> {
        self.render(PULL_REQUEST_DESCRIPTION_TEMPLATE, diff, jira_content)
    }

    fn render(&self, name: &str, diff: &str, jira_content: &str) -> Result<String> {
        let context = PromptContext { diff, jira_content };
        Ok(self.hb.render(name, &context)?)
    }
}
