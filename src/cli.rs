use crate::{
    config::DEFAULT_PROFILE_NAME, error::Result, runner::RunOptions, version::VersionBump,
};
use clap::Parser;

const DEFAULT_VERSION_BUMP: &str = "patch";

/// Commit pending changes with a generated message and optionally open or
/// update the pull request of the branch.
#[derive(Parser, Debug)]
#[command(author, about, disable_version_flag = true)]
pub struct Cli {
    /// Jira issue key used as context for the generated texts
    pub issue: Option<String>,

    /// Create or update the pull request of the current branch
    #[arg(long)]
    pub update_pr: bool,

    /// Bump the package version before committing (major, minor, patch, ... or an exact version)
    #[arg(
        long = "version",
        value_name = "BUMP",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_VERSION_BUMP
    )]
    pub version_bump: Option<String>,

    /// Switch to a new branch before committing
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Profile of ~/.gac/profile to load
    #[arg(long, default_value = DEFAULT_PROFILE_NAME)]
    pub profile: String,

    /// Force push
    #[arg(long)]
    pub force: bool,

    /// Create ~/.gac with a default profile and the prompt templates, then exit
    #[arg(long)]
    pub init: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::Level {
        match self.verbose {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }

    pub fn run_options(&self) -> Result<RunOptions> {
        let version_bump = self
            .version_bump
            .as_deref()
            .map(|bump| match bump.trim() {
                "" => DEFAULT_VERSION_BUMP,
                bump => bump,
            })
            .map(str::parse::<VersionBump>)
            .transpose()?;

        Ok(RunOptions {
            issue: self.issue.clone().filter(|issue| !issue.is_empty()),
            update_pr: self.update_pr,
            version_bump,
            branch: self.branch.clone(),
            force: self.force,
        })
    }
}
