mod output;
mod repl;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::assistant::{Orchestrator, TurnConfig};
use crate::core::citation::CitationStyle;
use crate::core::config::{load_config, AppConfig};
use crate::core::session::{Session, DEFAULT_SESSION_TITLE};
use crate::providers::create_provider;
use crate::search::{ArxivClient, PaperSearch};
use crate::storage::Database;

#[derive(Parser, Debug)]
#[command(name = "refscout", version, about = "Research paper assistant for the terminal")]
struct Cli {
    /// Non-interactive mode: run a single research query and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Working directory
    #[arg(short = 'c', long = "cwd")]
    working_dir: Option<PathBuf>,

    /// Resume a previous session by ID
    #[arg(long)]
    session: Option<String>,

    /// Model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Papers covered per reply (overrides config)
    #[arg(long)]
    papers: Option<usize>,

    /// Citation style: domain label or keyword (apa, mla, chicago, ieee, ama)
    #[arg(long)]
    style: Option<CitationStyle>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

pub struct App {
    pub orchestrator: Orchestrator,
    pub db: Database,
    pub config: AppConfig,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.working_dir.clone())?;

    if !config.has_api_key() {
        anyhow::bail!(
            "No API key found. Set REFSCOUT_API_KEY (or OPENAI_API_KEY), or add it to a config file."
        );
    }

    let db = Database::open(&config).await?;
    db.run_migrations().await?;

    let provider = create_provider(&config, cli.model.as_deref())?;
    let search = PaperSearch::new(Arc::new(ArxivClient::new(config.search.base_url.clone())));
    let orchestrator = Orchestrator::new(
        provider,
        search,
        db.clone(),
        config.chat.reply_language.clone(),
    );

    let turn_config = TurnConfig {
        paper_count: cli.papers.unwrap_or(config.search.paper_count),
        citation_style: cli.style.unwrap_or(config.chat.citation_style),
    };

    let app = App {
        orchestrator,
        db,
        config,
    };

    if let Some(prompt) = cli.prompt {
        run_once(app, prompt, cli.session, turn_config).await
    } else {
        repl::run(app, cli.session, turn_config).await
    }
}

async fn run_once(
    app: App,
    prompt: String,
    resume_session: Option<String>,
    turn_config: TurnConfig,
) -> Result<()> {
    let session = resolve_session(&app, resume_session).await?;

    let outcome = app
        .orchestrator
        .handle_turn(&session.id, &prompt, &turn_config)
        .await?;

    output::print_keywords(&outcome);
    println!("{}", outcome.reply);
    Ok(())
}

pub(crate) async fn resolve_session(app: &App, resume: Option<String>) -> Result<Session> {
    match resume {
        Some(id) => Ok(app.db.sessions().get(&id).await?),
        None => {
            let s = Session::new(DEFAULT_SESSION_TITLE.into());
            app.db.sessions().create(&s).await?;
            Ok(s)
        }
    }
}
