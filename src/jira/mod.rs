use crate::{
    config::JiraSettings,
    error::{Error, Result},
    http::{HttpClient, USER_AGENT_NAME},
};
use base64::{prelude::BASE64_STANDARD, Engine};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;

/// Source of ticket context fed into the prompts.
pub trait IssueTracker {
    async fn issue_context(&self, key: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub description: Option<String>,
}

pub struct JiraClient {
    http: HttpClient,
    domain: String,
    authorization: String,
    base_url: String,
}

impl JiraClient {
    pub fn new(settings: &JiraSettings) -> Self {
        let credentials = BASE64_STANDARD.encode(format!("{}:{}", settings.email, settings.api_key));

        JiraClient {
            http: HttpClient::new(),
            domain: settings.domain.to_owned(),
            authorization: format!("Basic {}", credentials),
            base_url: site_url(settings.domain),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn fetch_issue(&self, key: &str) -> Result<Issue> {
        let uri = format!(
            "{}/rest/api/2/issue/{}",
            self.base_url.trim_end_matches('/'),
            key
        );
        log::debug!("fetching issue {}", uri);

        let response = self
            .http
            .get(&uri)
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_NAME)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        if status > 299 {
            return Err(Error::remote(
                status,
                format!("Failed getting jira issue: {}", text),
            ));
        }

        Ok(serde_json::from_str::<Issue>(&text)?)
    }

    /// Link to the issue on the site it was fetched from.
    pub fn browse_link(&self, key: &str) -> String {
        format!("{}/browse/{}", site_url(&self.domain), key)
    }
}

impl IssueTracker for JiraClient {
    async fn issue_context(&self, key: &str) -> Result<String> {
        let issue = self.fetch_issue(key).await?;

        Ok(format!(
            "Jira Ticket ID: {}\n{}\n{}, link: {}",
            key,
            issue.fields.summary,
            issue.fields.description.unwrap_or_default(),
            self.browse_link(key)
        ))
    }
}

fn site_url(domain: &str) -> String {
    format!("https://{}.atlassian.net", domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn settings() -> JiraSettings<'static> {
        JiraSettings {
            domain: "acme",
            email: "dev@acme.io",
            api_key: "secret",
        }
    }

    #[tokio::test]
    async fn should_format_issue_context() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/rest/api/2/issue/PROJ-42")
            .match_header(
                "authorization",
                format!("Basic {}", BASE64_STANDARD.encode("dev@acme.io:secret")).as_str(),
            )
            .match_header("accept", "application/json")
            .with_body(
                json!({
                    "key": "PROJ-42",
                    "fields": {"summary": "Widgets are slow", "description": "Cache them."}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = JiraClient::new(&settings()).with_base_url(server.url());
        let context = client.issue_context("PROJ-42").await?;

        m.assert_async().await;
        assert_eq!(
            context,
            "Jira Ticket ID: PROJ-42\nWidgets are slow\nCache them., link: https://acme.atlassian.net/browse/PROJ-42"
        );

        Ok(())
    }

    #[tokio::test]
    async fn should_render_missing_description_as_empty() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/api/2/issue/PROJ-1")
            .with_body(json!({"fields": {"summary": "Title", "description": null}}).to_string())
            .create_async()
            .await;

        let client = JiraClient::new(&settings()).with_base_url(server.url());
        let context = client.issue_context("PROJ-1").await?;

        assert!(context.starts_with("Jira Ticket ID: PROJ-1\nTitle\n, link:"));

        Ok(())
    }

    #[tokio::test]
    async fn should_fail_on_error_status() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/api/2/issue/PROJ-404")
            .with_status(404)
            .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
            .create_async()
            .await;

        let client = JiraClient::new(&settings()).with_base_url(server.url());
        let result = client.issue_context("PROJ-404").await;

        match result {
            Err(Error::Remote { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("Issue does not exist"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        Ok(())
    }
}
