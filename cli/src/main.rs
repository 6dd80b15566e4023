// SeaBlock command line shell entry point

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::catch::CatchCommand;
use commands::certificates::CertificateCommand;
use commands::ledger::LedgerArgs;
use commands::notifications::NotificationArgs;
use commands::process::ProcessCommand;
use commands::recall::RecallCommand;
use commands::transactions::TxCommand;
use commands::users::UserCommand;
use commands::Context;
use config::ShellConfig;

/// SeaBlock seafood traceability shell
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a role and log in (customers need no credentials)
    Login {
        /// Supplier, Company, Distributor, Regulatory, Customer or Admin
        role: String,
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for without echo when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the current user, home route and navigation
    Whoami,
    /// Catch records
    #[command(subcommand)]
    Catch(CatchCommand),
    /// Process records
    #[command(subcommand)]
    Process(ProcessCommand),
    /// Product transactions
    #[command(subcommand)]
    Tx(TxCommand),
    /// Shared ledger and distributed database views
    Ledger(LedgerArgs),
    /// Track & recall: transactions and feedback
    #[command(subcommand)]
    Recall(RecallCommand),
    /// Notification bell
    Notifications(NotificationArgs),
    /// Admin user management
    #[command(subcommand)]
    Users(UserCommand),
    /// Trade certificates
    #[command(subcommand)]
    Certificates(CertificateCommand),
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    // Keep logs quiet by default so tables stay readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ShellConfig::from_env().assume_yes(cli.yes);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("{}: {}", e.title(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ShellConfig) -> Result<(), error::CliError> {
    let ctx = Context::new(config)?;
    match command {
        Commands::Login {
            role,
            username,
            password,
        } => commands::auth::login(&ctx, &role, username, password).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Catch(cmd) => commands::catch::execute(&ctx, cmd).await,
        Commands::Process(cmd) => commands::process::execute(&ctx, cmd).await,
        Commands::Tx(cmd) => commands::transactions::execute(&ctx, cmd).await,
        Commands::Ledger(args) => commands::ledger::execute(&ctx, args).await,
        Commands::Recall(cmd) => commands::recall::execute(&ctx, cmd).await,
        Commands::Notifications(args) => commands::notifications::execute(&ctx, args).await,
        Commands::Users(cmd) => commands::users::execute(&ctx, cmd).await,
        Commands::Certificates(cmd) => commands::certificates::execute(&ctx, cmd).await,
    }
}
