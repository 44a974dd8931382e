mod display;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use surveysensei_core::answers::{AnswerIssue, MAX_ANSWER_CHARS};
use surveysensei_core::chain::BNB_TESTNET_ID;
use surveysensei_core::link::share_url;
use surveysensei_core::{ChainConfig, Network};
use surveysensei_flow::dashboard::RECENT_LIMIT;
use surveysensei_flow::{
    AnswerSession, AnswerState, CreateSurveyFlow, Dashboard, RunOutcome, SurveyPage,
    WalletIdentity, WalletSession,
};
use surveysensei_store::{FileSlot, LatestSurveySlot};
use surveysensei_sync::api::DEFAULT_API_URL;
use surveysensei_sync::{ReadOutcome, RetryPolicy, RpcWalletSubmitter, SurveyApi, SurveyClient};

const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";

/// SurveySensei: AI-planned surveys with on-chain rewards.
#[derive(Parser)]
#[command(name = "surveysensei", version, about = "AI-planned surveys with on-chain rewards")]
struct Cli {
    /// Survey agent base URL
    #[arg(long, global = true, env = "SURVEYSENSEI_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Chain id (56 = BNB mainnet, anything else = BNB testnet)
    #[arg(long, global = true, env = "SURVEYSENSEI_CHAIN_ID", default_value_t = BNB_TESTNET_ID)]
    chain_id: u64,

    /// Survey contract address
    #[arg(long, global = true, env = "SURVEYSENSEI_CONTRACT")]
    contract: Option<String>,

    /// Wallet JSON-RPC endpoint (defaults to the chain's public RPC)
    #[arg(long, global = true, env = "SURVEYSENSEI_RPC_URL")]
    rpc_url: Option<String>,

    /// Connected wallet address
    #[arg(long, global = true, env = "SURVEYSENSEI_WALLET")]
    wallet: Option<String>,

    /// Directory for local client state
    #[arg(long, global = true, env = "SURVEYSENSEI_STATE_DIR", default_value = ".surveysensei")]
    state_dir: PathBuf,

    /// Origin used to build share links
    #[arg(long, global = true, env = "SURVEYSENSEI_APP_ORIGIN", default_value = DEFAULT_APP_ORIGIN)]
    app_origin: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a survey plan from a description and register it on chain
    Create {
        /// What the survey is about, its reward, and how many responses it needs
        description: String,
    },

    /// List surveys created by the connected wallet, newest first
    Surveys {
        #[arg(long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// Show a survey
    Show {
        survey_id: String,
        /// Reload every N seconds until interrupted
        #[arg(long)]
        watch: Option<u64>,
    },

    /// Answer a survey, one --answer per question in order
    Answer {
        survey_id: String,
        #[arg(long = "answer", required = true)]
        answers: Vec<String>,
    },

    /// Show the most recently created survey
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("surveysensei v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match &cli.command {
        Commands::Create { description } => cmd_create(&cli, description).await,
        Commands::Surveys { limit } => cmd_surveys(&cli, *limit).await,
        Commands::Show { survey_id, watch } => cmd_show(&cli, survey_id, *watch).await,
        Commands::Answer { survey_id, answers } => cmd_answer(&cli, survey_id, answers).await,
        Commands::Latest => cmd_latest(&cli).await,
    }
}

// ── Wiring ──

fn chain_config(cli: &Cli) -> ChainConfig {
    let mut chain = ChainConfig::from_chain_id(cli.chain_id);
    if let Some(contract) = &cli.contract {
        chain = chain.with_contract(contract.clone());
    }
    if let Some(rpc) = &cli.rpc_url {
        chain = chain.with_rpc_url(rpc.clone());
    }
    chain
}

fn wallet_session(cli: &Cli) -> WalletSession {
    match &cli.wallet {
        Some(address) => WalletSession::connected(address.clone()),
        None => WalletSession::disconnected(),
    }
}

fn require_wallet(wallet: &WalletSession) -> anyhow::Result<String> {
    wallet
        .address()
        .context("Connect wallet first (--wallet or SURVEYSENSEI_WALLET)")
}

fn api(cli: &Cli) -> Arc<dyn SurveyApi> {
    Arc::new(SurveyClient::new(cli.api_url.clone()))
}

// ── Commands ──

async fn cmd_create(cli: &Cli, description: &str) -> anyhow::Result<()> {
    let wallet = wallet_session(cli);
    require_wallet(&wallet)?;
    if description.trim().is_empty() {
        bail!("Describe the survey first");
    }

    let chain = chain_config(cli);
    let network = chain.network;
    let submitter = Arc::new(RpcWalletSubmitter::new(chain.rpc_url.clone()));
    let slot = Arc::new(FileSlot::new(cli.state_dir.clone()));
    let mut flow = CreateSurveyFlow::new(api(cli), submitter, slot, chain);
    flow.set_observer(move |entry| display::print_entry(entry, network));

    match flow.run(description, &wallet).await {
        RunOutcome::Created { plan, .. } => {
            println!();
            println!("Share link: {}", share_url(&cli.app_origin, &plan.survey_id));
            Ok(())
        }
        RunOutcome::Failed { message, .. } => bail!("{message}"),
        RunOutcome::NotStarted | RunOutcome::Abandoned => Ok(()),
    }
}

async fn cmd_surveys(cli: &Cli, limit: usize) -> anyhow::Result<()> {
    let wallet = require_wallet(&wallet_session(cli))?;
    let mut dashboard = Dashboard::new(api(cli), RetryPolicy::default());

    let outcome = dashboard.load(&wallet).await;
    if let ReadOutcome::Empty { error } = &outcome {
        bail!("{error}");
    }
    display::print_survey_list(dashboard.recent(limit), &cli.app_origin);
    if let Some(error) = outcome.error() {
        eprintln!("Refresh failed: {error}");
    }
    Ok(())
}

async fn cmd_show(cli: &Cli, survey_id: &str, watch: Option<u64>) -> anyhow::Result<()> {
    let viewer = cli.wallet.as_deref();
    let mut page = SurveyPage::new(api(cli), RetryPolicy::default());

    if let ReadOutcome::Empty { error } = page.open(survey_id, viewer).await {
        bail!("{error}");
    }
    display::print_survey_card(&page, &cli.app_origin);

    let Some(secs) = watch else {
        return Ok(());
    };
    let interval = Duration::from_secs(secs.max(1));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable, stopping watch");
        }
    };
    page.watch(viewer, interval, shutdown, |page, outcome| match outcome {
        ReadOutcome::Fresh => {
            println!();
            display::print_survey_card(page, &cli.app_origin);
        }
        outcome => {
            if let Some(error) = outcome.error() {
                eprintln!("Reload failed, showing last loaded data: {error}");
            }
        }
    })
    .await;
    Ok(())
}

async fn cmd_answer(cli: &Cli, survey_id: &str, answers: &[String]) -> anyhow::Result<()> {
    let network = Network::from_chain_id(cli.chain_id);
    let wallet = wallet_session(cli);
    require_wallet(&wallet)?;

    // Retrying a scored write could double-submit.
    let mut session = AnswerSession::new(
        api(cli),
        survey_id,
        RetryPolicy::default(),
        RetryPolicy::once(),
    );
    session.load().await;
    if let AnswerState::Unavailable(error) = session.state() {
        bail!("{error}");
    }

    let questions = session.questions().len();
    if questions == 0 {
        bail!("This survey has no questions yet");
    }
    if answers.len() != questions {
        bail!("This survey has {questions} questions, got {} answers", answers.len());
    }
    for (i, answer) in answers.iter().enumerate() {
        session.set_answer(i, answer.clone());
    }
    if let Some((i, issue)) = session.first_issue() {
        match issue {
            AnswerIssue::Blank => bail!("Answer {} is empty", i + 1),
            AnswerIssue::TooLong { chars } => {
                bail!("Answer {} is {chars} characters, the limit is {MAX_ANSWER_CHARS}", i + 1)
            }
        }
    }

    let state = session.submit(&wallet).await.clone();
    match state {
        AnswerState::Submitted(verdict) | AnswerState::Rejected(verdict) => {
            display::print_verdict(&verdict, network);
            Ok(())
        }
        _ => bail!("{}", session.error().unwrap_or("Unknown error")),
    }
}

async fn cmd_latest(cli: &Cli) -> anyhow::Result<()> {
    let slot = FileSlot::new(cli.state_dir.clone());
    match slot.recall().await {
        Some(id) => {
            println!("Latest survey: {id}");
            println!("Share link: {}", share_url(&cli.app_origin, &id));
        }
        None => println!("No survey created yet."),
    }
    Ok(())
}
