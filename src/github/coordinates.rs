use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

const GITHUB_HOST: &str = "github.com";
const GITHUB_API_BASE: &str = "https://api.github.com";

fn remote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[a-z+]+://)?(?:[^@/]+@)?([^/:]+)(?::\d+)?[:/]([^/]+)/([^/]+?)(?:\.git)?/?$")
            .expect("remote url pattern is valid")
    })
}

/// Where the repository lives on its hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCoordinates {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepositoryCoordinates {
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        RepositoryCoordinates {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses scp-like (`git@host:owner/repo.git`) and url-like
    /// (`https://host/owner/repo`, `ssh://git@host/owner/repo.git`) remotes.
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let captures = remote_pattern().captures(url).ok_or_else(|| {
            Error::configuration(format!("failed to parse remote url '{}'", url))
        })?;

        Ok(RepositoryCoordinates::new(
            &captures[1],
            &captures[2],
            &captures[3],
        ))
    }

    pub fn api_base(&self) -> String {
        if self.host == GITHUB_HOST {
            GITHUB_API_BASE.to_owned()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }

    pub fn pull_request_link(&self, number: u64) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            self.host, self.owner, self.name, number
        )
    }
}
