use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use chrono::Duration;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom::auth::TokenGenerator;
use stockroom::config::ServerConfig;
use stockroom::server::{AppState, create_router};
use stockroom::service::CategoryService;
use stockroom::store::{SqliteStore, Store};

const NOT_INITIALIZED: &str =
    "Server not initialized. Run 'stockroom admin init' first to create the database.";

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "A multi-tenant inventory catalog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// TOML config file; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Owner id of the shared default categories
        #[arg(long, env = "STOCKROOM_SYSTEM_USER_ID")]
        system_user_id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and default categories)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        /// Owner id of the shared default categories
        #[arg(long, env = "STOCKROOM_SYSTEM_USER_ID")]
        system_user_id: i64,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage user bearer tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue a new token for a user id
    Create {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        user_id: i64,

        /// Owner id of the shared default categories; never given a token
        #[arg(long, env = "STOCKROOM_SYSTEM_USER_ID")]
        system_user_id: i64,

        /// Token lifetime in days; never expires if omitted
        #[arg(long)]
        expires_in_days: Option<i64>,
    },

    /// List the tokens issued to a user id
    List {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        user_id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revoke a token by id
    Revoke {
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        id: String,
    },
}

fn open_store(data_dir: &Path) -> anyhow::Result<SqliteStore> {
    let db_path = data_dir.join("stockroom.db");
    if !db_path.exists() {
        bail!(NOT_INITIALIZED);
    }
    Ok(SqliteStore::new(db_path)?)
}

fn print_token(user_id: i64, raw_token: &str) {
    println!();
    println!("========================================");
    println!("Token for user {user_id} (save this, it won't be shown again):");
    println!();
    println!("  {raw_token}");
    println!();
    println!("========================================");
    println!();
}

fn issue_token(
    store: &SqliteStore,
    user_id: i64,
    system_user_id: i64,
    expires_in_days: Option<i64>,
) -> anyhow::Result<String> {
    if user_id == system_user_id {
        bail!("Cannot issue a token for the system user {system_user_id}");
    }
    let generator = TokenGenerator::new();
    let (token, raw_token) = generator.issue(user_id, expires_in_days.map(Duration::days))?;
    store.create_token(&token)?;
    Ok(raw_token)
}

fn run_init(data_dir: PathBuf, system_user_id: i64, non_interactive: bool) -> anyhow::Result<()> {
    fs::create_dir_all(&data_dir)?;

    let store = Arc::new(SqliteStore::new(data_dir.join("stockroom.db"))?);
    store.initialize()?;

    let seeded = CategoryService::new(store.clone(), system_user_id).seed_default_categories()?;

    println!(
        "Initialized {} (system user {system_user_id}, {seeded} default categories created)",
        data_dir.display()
    );

    if !non_interactive {
        issue_token_prompt(&store, system_user_id)?;
    }

    Ok(())
}

fn issue_token_prompt(store: &SqliteStore, system_user_id: i64) -> anyhow::Result<()> {
    let issue = inquire::Confirm::new("Would you like to issue a token for a user?")
        .with_default(false)
        .prompt()?;

    if !issue {
        return Ok(());
    }

    let user_id = inquire::CustomType::<i64>::new("User id:")
        .with_error_message("Please enter an integer user id")
        .prompt()?;

    let raw_token = issue_token(store, user_id, system_user_id, None)?;
    print_token(user_id, &raw_token);

    Ok(())
}

fn run_token(command: TokenCommands) -> anyhow::Result<()> {
    match command {
        TokenCommands::Create {
            data_dir,
            user_id,
            system_user_id,
            expires_in_days,
        } => {
            if expires_in_days.is_some_and(|days| days <= 0) {
                bail!("--expires-in-days must be positive");
            }
            let store = open_store(&data_dir)?;
            let raw_token = issue_token(&store, user_id, system_user_id, expires_in_days)?;
            print_token(user_id, &raw_token);
        }
        TokenCommands::List {
            data_dir,
            user_id,
            json,
        } => {
            let store = open_store(&data_dir)?;
            let tokens = store.list_user_tokens(user_id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else if tokens.is_empty() {
                println!("No tokens for user {user_id}");
            } else {
                for token in tokens {
                    let expires = token
                        .expires_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string());
                    println!("{}  created {}  expires {expires}", token.id, token.created_at.to_rfc3339());
                }
            }
        }
        TokenCommands::Revoke { data_dir, id } => {
            let store = open_store(&data_dir)?;
            if !store.delete_token(&id)? {
                bail!("Token not found: {id}");
            }
            println!("Revoked token {id}");
        }
    }

    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let system_user_id = config.system_user_id()?;

    if !config.db_path().exists() {
        bail!(NOT_INITIALIZED);
    }

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let state = Arc::new(AppState::new(Arc::new(store), system_user_id));
    state.categories.seed_default_categories()?;

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {} (system user {})", addr, system_user_id);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stockroom=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                system_user_id,
                non_interactive,
            } => {
                run_init(data_dir, system_user_id, non_interactive)?;
            }
            AdminCommands::Token { command } => {
                run_token(command)?;
            }
        },
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            system_user_id,
        } => {
            let mut server_config = match config {
                Some(path) => ServerConfig::from_file(&path)?,
                None => ServerConfig::default(),
            };

            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            if let Some(data_dir) = data_dir {
                server_config.data_dir = data_dir;
            }
            if system_user_id.is_some() {
                server_config.system_user_id = system_user_id;
            }

            run_serve(server_config).await?;
        }
    }

    Ok(())
}
