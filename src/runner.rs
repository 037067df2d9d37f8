use crate::{
    config::Config,
    error::{Error, Result},
    git::VersionControlPort,
    github::{
        ChangeDescription, GithubClient, PullRequestReconciler, PullRequestService,
        RepositoryCoordinates,
    },
    jira::{IssueTracker, JiraClient},
    openai::{generate_json, OpenAiClient, TextGenerator},
    prompt::Prompts,
    version::{self, VersionBump},
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub issue: Option<String>,
    pub update_pr: bool,
    pub version_bump: Option<VersionBump>,
    pub branch: Option<String>,
    pub force: bool,
}

#[derive(Debug, Deserialize)]
struct CommitMessage {
    message: String,
}

/// Remote clients of a run. Building them checks every credential the
/// options call for, so a missing one fails before any request is sent.
pub struct Clients {
    pub generator: OpenAiClient,
    pub issue_tracker: Option<JiraClient>,
    pub reconciler: Option<PullRequestReconciler<GithubClient>>,
}

impl Clients {
    pub fn from_config<V>(config: &Config, options: &RunOptions, vcs: &V) -> Result<Self>
    where
        V: VersionControlPort,
    {
        let generator = OpenAiClient::new(config.openai_api_key()?, config.openai_model());

        let issue_tracker = match options.issue {
            Some(_) => Some(JiraClient::new(&config.jira()?)),
            None => None,
        };

        let reconciler = if options.update_pr {
            let token = config.github_access_token()?;
            let coordinates = RepositoryCoordinates::from_remote_url(&vcs.remote_url()?)?;
            log::debug!(
                "resolved repository {}/{} on {}",
                coordinates.owner,
                coordinates.name,
                coordinates.host
            );
            Some(PullRequestReconciler::new(coordinates, GithubClient::new(token)))
        } else {
            None
        };

        Ok(Clients {
            generator,
            issue_tracker,
            reconciler,
        })
    }
}

/// One run: optional issue context, optional branch switch and version bump,
/// commit, then optionally reconcile the pull request.
pub struct Runner<'a, V, G, I, S> {
    vcs: &'a V,
    generator: &'a G,
    prompts: &'a Prompts<'static>,
    issue_tracker: Option<&'a I>,
    reconciler: Option<&'a PullRequestReconciler<S>>,
    workdir: &'a Path,
}

impl<'a, V, G, I, S> Runner<'a, V, G, I, S>
where
    V: VersionControlPort,
    G: TextGenerator,
    I: IssueTracker,
    S: PullRequestService,
{
    pub fn new(
        vcs: &'a V,
        generator: &'a G,
        prompts: &'a Prompts<'static>,
        workdir: &'a Path,
    ) -> Self {
        Runner {
            vcs,
            generator,
            prompts,
            issue_tracker: None,
            reconciler: None,
            workdir,
        }
    }

    pub fn issue_tracker(mut self, issue_tracker: Option<&'a I>) -> Self {
        self.issue_tracker = issue_tracker;
        self
    }

    pub fn reconciler(mut self, reconciler: Option<&'a PullRequestReconciler<S>>) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub async fn run(&self, options: &RunOptions) -> Result<()> {
        let default_branch = self.vcs.default_branch().await?;
        let current_branch = self.vcs.current_branch().await?;

        let new_branch = options.branch.clone().or_else(|| {
            options
                .issue
                .clone()
                .filter(|_| current_branch == default_branch)
        });

        log::info!(
            "Running for Jira Issue: {}",
            options.issue.as_deref().unwrap_or("N/A")
        );
        log::info!(
            "Should create/update a PR: {}",
            if options.update_pr { "Yes" } else { "No" }
        );
        log::info!(
            "Should bump to version: {}",
            options
                .version_bump
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "No".to_owned())
        );
        log::info!(
            "Switching to a new branch: {}",
            new_branch.as_deref().unwrap_or("No")
        );

        let issue_context = match &options.issue {
            Some(key) => self.issue_context(key).await?,
            None => String::new(),
        };

        if let Some(branch) = &new_branch {
            self.vcs.checkout_new_branch(branch).await?;
        }

        if let Some(bump) = &options.version_bump {
            version::bump(self.workdir, bump).await?;
        }

        self.commit_changes_if_needed(&issue_context, options.force)
            .await?;

        if options.update_pr {
            let link = self
                .update_pull_request(&default_branch, &issue_context)
                .await?;
            log::info!("Link to the PR -> {}", link);
        }

        Ok(())
    }

    async fn issue_context(&self, key: &str) -> Result<String> {
        let tracker = self
            .issue_tracker
            .ok_or_else(|| Error::configuration("No Jira credentials"))?;

        tracker.issue_context(key).await
    }

    async fn commit_changes_if_needed(&self, issue_context: &str, force: bool) -> Result<()> {
        let diff = self.vcs.diff_head().await?;

        if diff.trim().is_empty() {
            self.vcs.push(force).await?;
            log::info!("No changes to commit.");
            return Ok(());
        }

        let prompt = self.prompts.commit_message(&diff, issue_context)?;
        let commit: CommitMessage = generate_json(self.generator, &prompt).await?;

        match self.commit_and_push(&commit.message, force).await {
            Ok(()) => log::info!("Changes committed and pushed successfully!"),
            Err(err) => log::error!("Failed to commit changes - {}", err),
        }

        Ok(())
    }

    async fn commit_and_push(&self, message: &str, force: bool) -> Result<()> {
        self.vcs.commit_all(message).await?;
        self.vcs.push(force).await
    }

    async fn update_pull_request(&self, default_branch: &str, issue_context: &str) -> Result<String> {
        let reconciler = self
            .reconciler
            .ok_or_else(|| Error::configuration("No GitHub access token"))?;

        let current_branch = self.vcs.current_branch().await?;
        if current_branch == default_branch {
            return Err(Error::InvalidRequest(format!(
                "can't open a pull request from '{}' into itself",
                current_branch
            )));
        }

        let diff = self.vcs.diff(default_branch, &current_branch).await?;
        let prompt = self.prompts.pull_request_description(&diff, issue_context)?;
        let description: ChangeDescription = generate_json(self.generator, &prompt).await?;

        reconciler
            .reconcile(&current_branch, &description, default_branch)
            .await
    }
}
