use super::{ChangeDescription, PullRequestService, RepositoryCoordinates};
use crate::error::{Error, Result};

/// Creates a pull request from a branch, or updates the one already open.
pub struct PullRequestReconciler<S> {
    coordinates: RepositoryCoordinates,
    service: S,
}

impl<S> PullRequestReconciler<S>
where
    S: PullRequestService,
{
    pub fn new(coordinates: RepositoryCoordinates, service: S) -> Self {
        PullRequestReconciler {
            coordinates,
            service,
        }
    }

    /// Returns the link of the created or updated pull request.
    ///
    /// The lookup always happens before a create, so a run never opens a
    /// second pull request for the same pair of branches.
    pub async fn reconcile(
        &self,
        source_branch: &str,
        description: &ChangeDescription,
        target_branch: &str,
    ) -> Result<String> {
        if source_branch == target_branch {
            return Err(Error::InvalidRequest(format!(
                "can't open a pull request from '{}' into itself",
                source_branch
            )));
        }

        let existing = self
            .service
            .find_open(&self.coordinates, source_branch, target_branch)
            .await?;

        let number = match existing.first() {
            Some(pr) => {
                log::debug!(
                    "found open pull request #{} ({} -> {})",
                    pr.number,
                    pr.source_branch,
                    pr.target_branch
                );
                self.service
                    .update(&self.coordinates, pr.number, description)
                    .await?;
                log::info!("Pull request updated successfully!");
                pr.number
            }
            None => {
                log::debug!("no open pull request found");
                let number = self
                    .service
                    .create(&self.coordinates, source_branch, target_branch, description)
                    .await?;
                log::info!("Pull request created successfully!");
                number
            }
        };

        Ok(self.coordinates.pull_request_link(number))
    }
}
