//! CLI for the org-sweep tool.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use org_sweep::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "org-sweep")]
#[command(author, version, about = "Batch maintenance across a GitHub organization", long_about = None)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOptions {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Organization to sweep
    #[arg(long, global = true)]
    org: Option<String>,

    /// Repositories requested per page (1-100)
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// First page to request
    #[arg(long, global = true)]
    start_page: Option<u32>,

    /// Only visit public repositories
    #[arg(long, global = true)]
    public_only: bool,

    /// Only visit repositories whose name matches this glob
    #[arg(long, global = true)]
    only: Option<String>,

    /// Process every repository without asking
    #[arg(short, long, global = true)]
    yes: bool,

    /// Log intended changes without writing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log request details and diffs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the repositories a sweep would visit
    List {
        /// Apply the default branch filter used by install-workflow
        #[arg(long)]
        workflow: bool,
    },

    /// Replace outdated security notices in readmes
    Notice,

    /// Rewrite the support section of readmes
    SupportSection,

    /// Remove per-repository community health files
    RemoveFiles,

    /// Add the CI workflow file where it is missing
    InstallWorkflow,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.options.verbose);

    let config = load_config(&cli.options)?;
    let client = connect(&cli.options)?;

    match cli.command {
        Commands::List { workflow } => cmd_list(&client, &config, workflow),
        Commands::Notice => cmd_sweep(&client, &config, &cli.options, Box::new(config.notice.to_task()), false),
        Commands::SupportSection => cmd_sweep(
            &client,
            &config,
            &cli.options,
            Box::new(config.support_section.to_task()),
            false,
        ),
        Commands::RemoveFiles => cmd_sweep(
            &client,
            &config,
            &cli.options,
            Box::new(config.remove_files.to_task()),
            false,
        ),
        Commands::InstallWorkflow => {
            let task = config.workflow.to_task().context("Failed to prepare workflow")?;
            cmd_sweep(&client, &config, &cli.options, Box::new(task), true)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_level(false)
        .try_init();
}

fn load_config(options: &GlobalOptions) -> Result<SweepConfig> {
    let mut config = match &options.config {
        Some(path) => SweepConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SweepConfig::default(),
    };

    if let Some(ref org) = options.org {
        config.org = org.clone();
    }
    if let Some(page_size) = options.page_size {
        config.page_size = page_size;
    }
    if let Some(start_page) = options.start_page {
        config.start_page = start_page;
    }
    if options.public_only {
        config.public_only = true;
    }
    if let Some(ref only) = options.only {
        config.only = Some(only.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn connect(options: &GlobalOptions) -> Result<GitHubClient> {
    let token = org_sweep::github::token_from_env().context("No GitHub token available")?;
    match &options.api_url {
        Some(url) => GitHubClient::with_enterprise(token, url.as_str()).context("Invalid --api-url"),
        None => Ok(GitHubClient::new(token)),
    }
}

fn list_repos(client: &GitHubClient, config: &SweepConfig, for_workflow: bool) -> Result<Vec<RepositoryRef>> {
    let filter = config.list_filter(for_workflow).context("Invalid repository filter")?;
    client
        .list_org_repos(&config.org, config.paging(), &filter)
        .with_context(|| format!("Failed to list repositories of {}", config.org))
}

fn cmd_list(client: &GitHubClient, config: &SweepConfig, for_workflow: bool) -> Result<()> {
    let repos = list_repos(client, config, for_workflow)?;
    for repo in &repos {
        println!("{}\t{}", repo.name, repo.url);
    }
    println!("\n{} repositories", repos.len());
    Ok(())
}

fn cmd_sweep(
    client: &GitHubClient,
    config: &SweepConfig,
    options: &GlobalOptions,
    task: Box<dyn Task>,
    for_workflow: bool,
) -> Result<()> {
    let repos = list_repos(client, config, for_workflow)?;
    tracing::info!("found {} repositories in {}", repos.len(), config.org);

    let mut sweep = Sweep::boxed(task);
    if options.yes {
        sweep = sweep.approve_all();
    }
    if options.dry_run {
        sweep = sweep.dry_run();
    }

    let result = sweep
        .execute(client, &repos, &mut Gate::terminal())
        .context("Sweep failed")?;

    println!("\n{}", result.summary);
    Ok(())
}
