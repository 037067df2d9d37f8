use crate::error::{Error, Result};
use git2::Repository;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const GIT_BIN_NAME: &str = "git";
const DEFAULT_REMOTE_NAME: &str = "origin";
const DIFF_EXCLUDES: &[&str] = &[":(exclude)package-lock.json"];

/// The git operations a run needs, kept behind a trait so the orchestration
/// can be driven without a real repository.
pub trait VersionControlPort {
    async fn current_branch(&self) -> Result<String>;

    /// Branch `origin/HEAD` points to.
    async fn default_branch(&self) -> Result<String>;

    /// Uncommitted changes against `HEAD`.
    async fn diff_head(&self) -> Result<String>;

    /// Changes between two refs, lock files excluded.
    async fn diff(&self, base: &str, head: &str) -> Result<String>;

    async fn checkout_new_branch(&self, name: &str) -> Result<()>;

    /// Stages tracked files and commits them.
    async fn commit_all(&self, message: &str) -> Result<()>;

    async fn push(&self, force: bool) -> Result<()>;

    fn remote_url(&self) -> Result<String>;
}

/// [`VersionControlPort`] backed by the git executable and libgit2.
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl AsRef<Path>) -> Result<Self> {
        which::which(GIT_BIN_NAME)
            .map_err(|err| Error::Git(format!("git executable not found: {}", err)))?;

        Ok(GitCli {
            workdir: workdir.as_ref().to_path_buf(),
        })
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        log::trace!("git {}", args.join(" "));
        let output = Command::new(GIT_BIN_NAME)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "git {} exited with {}: {}",
                args.first().unwrap_or(&""),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControlPort for GitCli {
    async fn current_branch(&self) -> Result<String> {
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(branch.trim().to_owned())
    }

    async fn default_branch(&self) -> Result<String> {
        let output = self.run(&["remote", "show", DEFAULT_REMOTE_NAME]).await?;
        parse_head_branch(&output).ok_or_else(|| {
            Error::Git(format!(
                "cannot determine the default branch of '{}'",
                DEFAULT_REMOTE_NAME
            ))
        })
    }

    async fn diff_head(&self) -> Result<String> {
        self.run(&["diff", "HEAD"]).await
    }

    async fn diff(&self, base: &str, head: &str) -> Result<String> {
        let mut args = vec!["diff", base, head, "--", "."];
        args.extend_from_slice(DIFF_EXCLUDES);
        self.run(&args).await
    }

    async fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name]).await?;
        Ok(())
    }

    async fn commit_all(&self, message: &str) -> Result<()> {
        self.run(&["add", "-u"]).await?;
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push(&self, force: bool) -> Result<()> {
        let mut args = vec!["push", DEFAULT_REMOTE_NAME, "HEAD"];
        if force {
            args.push("-f");
        }
        self.run(&args).await?;
        Ok(())
    }

    fn remote_url(&self) -> Result<String> {
        let repo = Repository::discover(&self.workdir)?;
        let remote = repo.find_remote(DEFAULT_REMOTE_NAME).map_err(|_| {
            Error::configuration(format!("remote '{}' is not configured", DEFAULT_REMOTE_NAME))
        })?;

        remote.url().map(str::to_owned).ok_or_else(|| {
            Error::configuration(format!("remote '{}' has no valid url", DEFAULT_REMOTE_NAME))
        })
    }
}

/// Reads the `HEAD branch: <name>` line of `git remote show`.
fn parse_head_branch(output: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("HEAD branch:"))
        .map(str::trim)
        .find(|branch| !branch.is_empty() && *branch != "(unknown)")
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn init_repo(dir: &Path) -> Result<Repository> {
        let repo = Repository::init(dir)?;
        {
            let mut config = repo.config()?;
            config.set_str("user.name", "Test User")?;
            config.set_str("user.email", "test@example.com")?;
            config.set_bool("commit.gpgsign", false)?;
        }

        fs::write(dir.join("test.txt"), "Hello, world!")?;

        let mut index = repo.index()?;
        index.add_path(Path::new("test.txt"))?;
        index.write()?;
        let oid = index.write_tree()?;
        let signature = repo.signature()?;
        {
            let tree = repo.find_tree(oid)?;
            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                "Initial commit",
                &tree,
                &[],
            )?;
        }

        Ok(repo)
    }

    #[test]
    fn should_parse_head_branch() {
        let output = "* remote origin\n  Fetch URL: git@github.com:acme/widgets.git\n  Push  URL: git@github.com:acme/widgets.git\n  HEAD branch: main\n  Remote branches:\n";

        assert_eq!(parse_head_branch(output), Some("main".to_owned()));
    }

    #[test]
    fn should_not_parse_unknown_head_branch() {
        assert_eq!(parse_head_branch("  HEAD branch: (unknown)\n"), None);
        assert_eq!(parse_head_branch("* remote origin\n"), None);
    }

    #[test]
    fn should_read_origin_url() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        let repo = init_repo(dir.path())?;
        repo.remote("origin", "git@github.com:acme/widgets.git")?;

        let git = GitCli::new(dir.path())?;

        assert_eq!(git.remote_url()?, "git@github.com:acme/widgets.git");

        Ok(())
    }

    #[test]
    fn should_fail_without_origin() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        init_repo(dir.path())?;

        let git = GitCli::new(dir.path())?;

        assert!(matches!(git.remote_url(), Err(Error::Configuration(_))));

        Ok(())
    }

    #[tokio::test]
    async fn should_report_no_changes_on_fresh_commit() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        init_repo(dir.path())?;
        let git = GitCli::new(dir.path())?;

        assert_eq!(git.diff_head().await?, "");

        Ok(())
    }

    #[tokio::test]
    async fn should_commit_tracked_changes() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        init_repo(dir.path())?;
        let git = GitCli::new(dir.path())?;

        assert!(git.diff_head().await?.trim().is_empty());

        fs::write(dir.path().join("test.txt"), "Hello, gac!")?;
        let diff = git.diff_head().await?;
        assert!(diff.contains("+Hello, gac!"));

        git.commit_all("feat: greet gac").await?;

        assert!(git.diff_head().await?.trim().is_empty());
        let repo = Repository::open(dir.path())?;
        let head = repo.head()?.peel_to_commit()?;
        assert_eq!(head.message(), Some("feat: greet gac\n"));

        Ok(())
    }

    #[tokio::test]
    async fn should_switch_to_new_branch() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        init_repo(dir.path())?;
        let git = GitCli::new(dir.path())?;

        git.checkout_new_branch("PROJ-123").await?;

        assert_eq!(git.current_branch().await?, "PROJ-123");

        Ok(())
    }

    #[tokio::test]
    async fn should_diff_between_refs() -> anyhow::Result<()> {
        let dir = TempDir::new("gac")?;
        init_repo(dir.path())?;
        let git = GitCli::new(dir.path())?;
        let base = git.current_branch().await?;

        git.checkout_new_branch("feature").await?;
        fs::write(dir.path().join("test.txt"), "changed")?;
        fs::write(dir.path().join("package-lock.json"), "{}")?;
        git.run(&["add", "."]).await?;
        git.commit_all("change").await?;

        let diff = git.diff(&base, "feature").await?;

        assert!(diff.contains("+changed"));
        assert!(!diff.contains("package-lock.json"));

        Ok(())
    }
}
