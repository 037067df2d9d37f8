use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use std::ops::Deref;

pub const USER_AGENT_NAME: &str = "gac";

#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        HttpClient {
            client: Client::new(),
        }
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Turns a raw response into its body text, mapping unexpected statuses
/// into [`Error::Remote`] with the body as the message.
pub trait ResponseHandler {
    /// Accepts any 2xx status.
    async fn handle(self) -> Result<String>;

    /// Accepts exactly `expected`.
    async fn expect_status(self, expected: StatusCode) -> Result<String>;
}

impl ResponseHandler for reqwest::Response {
    async fn handle(self) -> Result<String> {
        let status = self.status();
        let text = self.text().await?;

        if !status.is_success() {
            return Err(Error::remote(status.as_u16(), text));
        }

        Ok(text)
    }

    async fn expect_status(self, expected: StatusCode) -> Result<String> {
        let status = self.status();
        let text = self.text().await?;

        if status != expected {
            log::debug!("expected status {} but got {}", expected, status);
            return Err(Error::remote(status.as_u16(), text));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn handle_returns_body_on_success() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let response = HttpClient::new().get(server.url()).send().await?;
        let body = response.handle().await?;

        m.assert_async().await;
        assert_eq!(body, "ok");

        Ok(())
    }

    #[tokio::test]
    async fn handle_accepts_no_content() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PATCH", "/")
            .with_status(204)
            .create_async()
            .await;

        let response = HttpClient::new().patch(server.url()).send().await?;

        assert_eq!(response.handle().await?, "");

        Ok(())
    }

    #[tokio::test]
    async fn handle_maps_failure_status_to_remote_error() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let response = HttpClient::new().get(server.url()).send().await?;
        let err = response.handle().await.unwrap_err();

        match err {
            Error::Remote { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn expect_status_rejects_other_success_codes() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let response = HttpClient::new().post(server.url()).send().await?;
        let err = response.expect_status(StatusCode::CREATED).await.unwrap_err();

        assert!(matches!(err, Error::Remote { status: 200, .. }));

        Ok(())
    }
}
