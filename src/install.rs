use crate::{
    config::{DEFAULT_PROFILE_NAME, PROFILE_FILE_NAME, PROMPTS_DIR_NAME, SETTINGS},
    error::Result,
    prompt::{BUILTIN_TEMPLATES, TEMPLATE_EXTENSION},
};
use std::{fs, path::Path};

/// Seeds `gac_dir` with a default profile and editable copies of the
/// built-in prompts. Existing files are left alone.
pub fn install<F>(gac_dir: &Path, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    ensure_dir(gac_dir)?;
    write_default_profile(&gac_dir.join(PROFILE_FILE_NAME), env)?;
    copy_prompts(&gac_dir.join(PROMPTS_DIR_NAME))?;

    Ok(())
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        log::info!("Created directory: {}", path.display());
    }

    Ok(())
}

fn write_default_profile<F>(path: &Path, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if path.exists() {
        log::info!("Profile already exists at {}", path.display());
        return Ok(());
    }

    let mut content = format!("[{}]\n", DEFAULT_PROFILE_NAME);
    for setting in SETTINGS {
        let value = env(setting.env_var)
            .filter(|value| !value.is_empty())
            .or_else(|| setting.default.map(str::to_owned))
            .unwrap_or_default();
        let line = format!("{:<17} = {}", setting.profile_key, value);
        content.push_str(line.trim_end());
        content.push('\n');
    }

    fs::write(path, content)?;
    log::info!("Created default profile at {}", path.display());

    Ok(())
}

fn copy_prompts(dir: &Path) -> Result<()> {
    ensure_dir(dir)?;

    for (name, template) in BUILTIN_TEMPLATES {
        let file_name = format!("{}.{}", name, TEMPLATE_EXTENSION);
        let dest = dir.join(&file_name);

        if dest.exists() {
            log::info!("Skipped existing prompt: {}", file_name);
        } else {
            fs::write(&dest, template)?;
            log::info!("Copied prompt: {}", file_name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DEFAULT_OPENAI_MODEL};
    use tempdir::TempDir;

    fn env(key: &str) -> Option<String> {
        match key {
            "GITHUB_ACCESS_TOKEN" => Some("ghp_seed".to_owned()),
            "JIRA_DOMAIN" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn should_seed_profile_and_prompts() {
        let home = TempDir::new("home").unwrap();
        let gac_dir = home.path().join(".gac");

        install(&gac_dir, env).unwrap();

        let profile = fs::read_to_string(gac_dir.join("profile")).unwrap();
        assert!(profile.starts_with("[default]\n"));
        assert!(profile.contains("githubAccessToken = ghp_seed\n"));
        assert!(profile.contains("jiraDomain        =\n"));
        assert!(profile.contains(&format!("openaiModel       = {}\n", DEFAULT_OPENAI_MODEL)));

        for (name, template) in BUILTIN_TEMPLATES {
            let copied = fs::read_to_string(gac_dir.join("prompts").join(format!("{name}.hbs")))
                .unwrap();
            assert_eq!(copied, template);
        }
    }

    #[test]
    fn should_produce_a_profile_config_can_load() {
        let home = TempDir::new("home").unwrap();
        let gac_dir = home.path().join(".gac");

        install(&gac_dir, env).unwrap();
        let config = Config::load(&gac_dir.join("profile"), "default", |_| None);

        assert_eq!(config.github_access_token().unwrap(), "ghp_seed");
        assert_eq!(config.openai_model(), DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn should_keep_existing_files() {
        let home = TempDir::new("home").unwrap();
        let gac_dir = home.path().join(".gac");
        fs::create_dir_all(gac_dir.join("prompts")).unwrap();
        fs::write(gac_dir.join("profile"), "[default]\nopenaiApiKey = mine\n").unwrap();
        fs::write(gac_dir.join("prompts").join("commitMessage.hbs"), "custom").unwrap();

        install(&gac_dir, env).unwrap();

        assert_eq!(
            fs::read_to_string(gac_dir.join("profile")).unwrap(),
            "[default]\nopenaiApiKey = mine\n"
        );
        assert_eq!(
            fs::read_to_string(gac_dir.join("prompts").join("commitMessage.hbs")).unwrap(),
            "custom"
        );
        assert!(gac_dir
            .join("prompts")
            .join("pullRequestDescription.hbs")
            .is_file());
    }
}
