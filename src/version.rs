use crate::error::{Error, Result};
use std::{fmt, path::Path, str::FromStr};
use tokio::process::Command;

const NPM_BIN_NAME: &str = "npm";
const RELEASE_TYPES: [&str; 7] = [
    "major",
    "minor",
    "patch",
    "premajor",
    "preminor",
    "prepatch",
    "prerelease",
];

/// Argument handed to `npm version`: a release type or an exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionBump {
    Release(String),
    Exact(semver::Version),
}

impl FromStr for VersionBump {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();

        if RELEASE_TYPES.contains(&value) {
            return Ok(VersionBump::Release(value.to_owned()));
        }

        semver::Version::parse(value.trim_start_matches('v'))
            .map(VersionBump::Exact)
            .map_err(|_| {
                Error::InvalidRequest(format!(
                    "'{}' is neither a release type ({}) nor a version",
                    value,
                    RELEASE_TYPES.join(", ")
                ))
            })
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Release(release) => write!(f, "{}", release),
            VersionBump::Exact(version) => write!(f, "{}", version),
        }
    }
}

/// Bumps `package.json` in `workdir` without tagging.
pub async fn bump(workdir: &Path, bump: &VersionBump) -> Result<()> {
    which::which(NPM_BIN_NAME)
        .map_err(|err| Error::configuration(format!("npm executable not found: {}", err)))?;

    let bump = bump.to_string();
    let output = Command::new(NPM_BIN_NAME)
        .args(["--no-git-tag-version", "version", &bump])
        .current_dir(workdir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(Error::InvalidRequest(format!(
            "npm version {} failed: {}",
            bump,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    log::info!(
        "Bumped version to {}",
        String::from_utf8_lossy(&output.stdout).trim()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_release_types() {
        for release in RELEASE_TYPES {
            assert_eq!(
                release.parse::<VersionBump>().unwrap(),
                VersionBump::Release(release.to_owned())
            );
        }
    }

    #[test]
    fn should_accept_exact_versions() {
        let bump = "v2.1.0-rc.1".parse::<VersionBump>().unwrap();

        assert_eq!(bump.to_string(), "2.1.0-rc.1");
    }

    #[test]
    fn should_reject_anything_else() {
        for value in ["", "huge", "1.2"] {
            assert!(matches!(
                value.parse::<VersionBump>(),
                Err(Error::InvalidRequest(_))
            ));
        }
    }
}
