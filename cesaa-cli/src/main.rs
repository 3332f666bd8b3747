//! cesaa CLI: create recorder tables and query chat history by send target. Config from env and
//! optional CLI args.

use std::io;

use anyhow::{Context, Result};
use cesaa::{MessageHistory, SessionClassifier, TargetClassifier, UninfoClassifier};
use cesaa_cli::{load_config, output, Cli, Commands, QueryArgs};
use clap::Parser;
use storage::{MessageRepository, SchemaGeneration, SqlitePoolManager};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    cesaa_core::init_tracing(&config.log_file)?;

    if let Commands::Init = cli.command {
        MessageRepository::new(&config.database_url, config.schema)
            .await
            .with_context(|| format!("Create recorder tables in {}", config.database_url))?;
        info!(schema = %config.schema, database_url = %config.database_url, "Recorder tables ready");
        return Ok(());
    }

    let pool_manager = SqlitePoolManager::open_read_only(&config.database_url)
        .await
        .with_context(|| format!("Open recorder database {}", config.database_url))?;

    match config.schema {
        SchemaGeneration::Session => run_query::<SessionClassifier>(pool_manager, cli.command).await,
        SchemaGeneration::Uninfo => run_query::<UninfoClassifier>(pool_manager, cli.command).await,
    }
}

async fn run_query<C>(pool_manager: SqlitePoolManager, command: Commands) -> Result<()>
where
    C: TargetClassifier + Default,
{
    let history = MessageHistory::<C>::open(pool_manager, C::default()).await?;

    match command {
        Commands::Init => Ok(()),
        Commands::Records(args) => {
            let (target, filter) = decode::<C>(&args)?;
            let records = history.get_message_records(target.as_ref(), &filter).await?;
            output::write_records(&mut io::stdout().lock(), &records)
        }
        Commands::Messages(args) => {
            let (target, filter) = decode::<C>(&args)?;
            let messages = history.get_messages(target.as_ref(), &filter).await?;
            output::write_messages(&mut io::stdout().lock(), &messages)
        }
        Commands::PlainText(args) => {
            let (target, filter) = decode::<C>(&args)?;
            let texts = history
                .get_messages_plain_text(target.as_ref(), &filter)
                .await?;
            output::write_plain_text(&mut io::stdout().lock(), &texts)
        }
    }
}

fn decode<C: TargetClassifier>(
    args: &QueryArgs,
) -> Result<(Option<cesaa::PlatformTarget>, cesaa::FilterOf<C>)> {
    Ok((args.target()?, args.filter::<C>()?))
}
