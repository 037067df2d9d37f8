use super::{
    headers::Headers,
    request::{CreatePullRequestRequest, UpdatePullRequestRequest},
    response::PullRequestResponse,
    ChangeDescription, PullRequestRef, PullRequestService, RepositoryCoordinates,
};
use crate::{
    error::Result,
    http::{HttpClient, ResponseHandler},
};
use reqwest::StatusCode;

/// GitHub REST client for the pull request endpoints.
pub struct GithubClient {
    http: HttpClient,
    token: String,
    api_base: Option<String>,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        GithubClient {
            http: HttpClient::new(),
            token: token.into(),
            api_base: None,
        }
    }

    /// Overrides the api base derived from the repository host.
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    fn pulls_uri(&self, coordinates: &RepositoryCoordinates) -> String {
        let api_base = self
            .api_base
            .to_owned()
            .unwrap_or_else(|| coordinates.api_base());

        format!(
            "{}/repos/{}/{}/pulls",
            api_base.trim_end_matches('/'),
            coordinates.owner,
            coordinates.name
        )
    }
}

impl PullRequestService for GithubClient {
    async fn find_open(
        &self,
        coordinates: &RepositoryCoordinates,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequestRef>> {
        let uri = self.pulls_uri(coordinates);
        let head_filter = format!("{}:{}", coordinates.owner, head);
        log::debug!("looking up open pull requests for {} into {}", head_filter, base);

        let response = self
            .http
            .get(&uri)
            .github_headers(&self.token)
            .query(&[("state", "open"), ("head", head_filter.as_str()), ("base", base)])
            .send()
            .await?
            .handle()
            .await?;

        let pull_requests = serde_json::from_str::<Vec<PullRequestResponse>>(&response)?;

        Ok(pull_requests
            .into_iter()
            .map(|pr| PullRequestRef {
                number: pr.number,
                source_branch: pr.head.map(|h| h.name).unwrap_or_else(|| head.to_owned()),
                target_branch: pr.base.map(|b| b.name).unwrap_or_else(|| base.to_owned()),
            })
            .collect())
    }

    async fn create(
        &self,
        coordinates: &RepositoryCoordinates,
        head: &str,
        base: &str,
        description: &ChangeDescription,
    ) -> Result<u64> {
        log::debug!("Creating pull request");
        let uri = self.pulls_uri(coordinates);

        let request = CreatePullRequestRequest::new(
            &description.title,
            &description.body,
            head,
            base,
        );
        let body = serde_json::to_string(&request)?;

        let response = self
            .http
            .post(&uri)
            .github_headers(&self.token)
            .body(body)
            .send()
            .await?
            .expect_status(StatusCode::CREATED)
            .await?;

        let pr = serde_json::from_str::<PullRequestResponse>(&response)?;

        Ok(pr.number)
    }

    async fn update(
        &self,
        coordinates: &RepositoryCoordinates,
        number: u64,
        description: &ChangeDescription,
    ) -> Result<()> {
        log::debug!("Updating pull request #{}", number);
        let uri = format!("{}/{}", self.pulls_uri(coordinates), number);

        let request = UpdatePullRequestRequest::new(&description.title, &description.body);
        let body = serde_json::to_string(&request)?;

        self.http
            .patch(&uri)
            .github_headers(&self.token)
            .body(body)
            .send()
            .await?
            .expect_status(StatusCode::OK)
            .await?;

        Ok(())
    }
}
