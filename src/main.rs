mod client;
mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::fields::EventArgs;

#[derive(Parser)]
#[command(name = "spotlive")]
#[command(about = "Discover live music events and publish your own")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events, optionally narrowed to one category
    Events {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the categories of the loaded events
    Categories,
    /// Show one event in full
    Show {
        id: String,

        /// Open the event image in the browser
        #[arg(long)]
        open_image: bool,
    },
    /// Create a new event
    Create {
        #[command(flatten)]
        fields: EventArgs,
    },
    /// Edit an event you own
    Edit {
        id: String,

        #[command(flatten)]
        fields: EventArgs,
    },
    /// Delete an event you own
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Sign in with email and password
    Signin {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the saved session
    Signout,
    /// Show who is signed in
    Whoami,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotlive=warn,spotlive_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("{}", format!("{e:#}").red());
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Events { category } => commands::events::run(category).await,
        Commands::Categories => commands::categories::run().await,
        Commands::Show { id, open_image } => commands::show::run(&id, open_image).await,
        Commands::Create { fields } => commands::create::run(fields).await,
        Commands::Edit { id, fields } => commands::edit::run(&id, fields).await,
        Commands::Delete { id, force } => commands::delete::run(&id, force).await,
        Commands::Signup { name, email } => commands::signup::run(name, email).await,
        Commands::Signin { email } => commands::signin::run(email).await,
        Commands::Signout => commands::signout::run().await,
        Commands::Whoami => commands::whoami::run().await,
    }
}
