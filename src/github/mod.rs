pub mod coordinates;
pub mod github_client;
mod headers;
pub mod reconciler;
mod request;
mod response;

pub use coordinates::RepositoryCoordinates;
pub use github_client::GithubClient;
pub use reconciler::PullRequestReconciler;

use crate::error::Result;
use serde::Deserialize;

/// Title and body of a pull request, as generated from the branch diff.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeDescription {
    pub title: String,
    pub body: String,
}

#[cfg(test)]
impl ChangeDescription {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        ChangeDescription {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// An open pull request found on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub source_branch: String,
    pub target_branch: String,
}

/// Pull request operations of a hosting service.
pub trait PullRequestService {
    /// Open pull requests from `head` into `base`, in the order the service returns them.
    async fn find_open(
        &self,
        coordinates: &RepositoryCoordinates,
        head: &str,
        base: &str,
    ) -> Result<Vec<PullRequestRef>>;

    /// Returns the number of the created pull request.
    async fn create(
        &self,
        coordinates: &RepositoryCoordinates,
        head: &str,
        base: &str,
        description: &ChangeDescription,
    ) -> Result<u64>;

    async fn update(
        &self,
        coordinates: &RepositoryCoordinates,
        number: u64,
        description: &ChangeDescription,
    ) -> Result<()>;
}
