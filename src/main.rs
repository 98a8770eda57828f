use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_desk::{api, auth, config::AppConfig};

#[derive(Parser)]
#[command(name = "tdesk")]
#[command(about = "Ticket tracking demo with locally persisted accounts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Delay applied to login and signup, in milliseconds
        #[arg(long)]
        latency_ms: Option<u64>,

        /// Keep accounts in memory instead of on disk
        #[arg(long)]
        memory: bool,
    },
    /// List stored accounts
    Accounts,
    /// Show the signed-in account
    Whoami,
    /// End the stored session
    Logout,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ticket_desk=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let auth = auth::SessionManager::new(config.open_storage()?, config.latency);
    let state = api::AppState::new(auth).with_cors_origins(config.cors_origins.clone());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("Ticket desk listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::from_env();

    match cli.command {
        Some(Commands::Serve {
            port,
            latency_ms,
            memory,
        }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(ms) = latency_ms {
                config.latency = auth::Latency::from_millis(ms);
            }
            config.in_memory = memory;
            serve(config).await?;
        }
        Some(Commands::Accounts) => {
            let auth = auth::SessionManager::new(config.open_storage()?, auth::Latency::None);
            for account in auth.accounts() {
                let marker = if account.session_active { "*" } else { " " };
                println!("{} {}  {} <{}>", marker, account.id, account.name, account.email);
            }
        }
        Some(Commands::Whoami) => {
            let auth = auth::SessionManager::new(config.open_storage()?, auth::Latency::None);
            match auth.current_user() {
                Some(user) => println!("{} <{}>", user.name, user.email),
                None => println!("Not signed in"),
            }
        }
        Some(Commands::Logout) => {
            let auth = auth::SessionManager::new(config.open_storage()?, auth::Latency::None);
            auth.logout();
            println!("Signed out");
        }
        None => serve(config).await?,
    }

    Ok(())
}
