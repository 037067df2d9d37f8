mod cli;
mod config;
mod error;
mod git;
mod github;
mod http;
mod install;
mod jira;
mod logger;
mod openai;
mod prompt;
mod runner;
mod version;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::{Config, GAC_DIR_NAME, PROFILE_FILE_NAME, PROMPTS_DIR_NAME};
use git::GitCli;
use prompt::Prompts;
use runner::{Clients, Runner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level())?;

    let home = dirs::home_dir().context("Cannot locate the home directory")?;
    let gac_dir = home.join(GAC_DIR_NAME);
    let env = |key: &str| std::env::var(key).ok();

    if cli.init {
        install::install(&gac_dir, env).context("Cannot set up the gac directory")?;
        return Ok(());
    }

    let options = cli.run_options().context("Invalid arguments")?;
    let config = Config::load(&gac_dir.join(PROFILE_FILE_NAME), &cli.profile, env);

    let workdir = std::env::current_dir()?;
    let git = GitCli::new(&workdir).context("Cannot use git")?;
    let clients =
        Clients::from_config(&config, &options, &git).context("Cannot set up the clients")?;
    let prompts_dir = gac_dir.join(PROMPTS_DIR_NAME);
    let prompts = Prompts::load(Some(prompts_dir.as_path()))
        .context("Cannot load the prompt templates")?;

    Runner::new(&git, &clients.generator, &prompts, &workdir)
        .issue_tracker(clients.issue_tracker.as_ref())
        .reconciler(clients.reconciler.as_ref())
        .run(&options)
        .await
        .context("Run failed")?;

    Ok(())
}
