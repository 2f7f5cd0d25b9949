use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "myra",
    about = "MyRA range-agreement service — API server, migrations, and reference seeds",
    version,
    propagate_version = true
)]
struct Cli {
    /// Postgres connection string
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Apply pending schema migrations
    Migrate,

    /// Seed the reference tables (delete-then-insert, safe to re-run)
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set (flag or environment)"))?;

    let pool = myra_core::db::connect(&database_url).await?;

    match cli.command {
        Commands::Serve { port } => {
            myra_core::db::migrate(&pool).await?;
            myra_server::serve(pool, port).await?;
        }
        Commands::Migrate => {
            myra_core::db::migrate(&pool).await?;
        }
        Commands::Seed => {
            myra_core::db::migrate(&pool).await?;
            myra_core::seed::seed_reference_data(&pool).await?;
        }
    }

    Ok(())
}
