//! CLI parser and argument decoding.

use anyhow::{Context, Result};
use cesaa::{FilterOf, HistoryConfig, PlatformTarget, TargetClassifier};
use clap::{Args, Parser, Subcommand};
use storage::SchemaGeneration;

#[derive(Parser, Debug)]
#[command(name = "cesaa")]
#[command(about = "Chat history by send target", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Overrides DATABASE_URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Overrides CHATRECORDER_SCHEMA (`uninfo` or `session`).
    #[arg(long, global = true)]
    pub schema: Option<SchemaGeneration>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the recorder tables of the configured schema if missing.
    Init,
    /// Print matching records as JSON lines.
    Records(QueryArgs),
    /// Print matching messages with their adapter.
    Messages(QueryArgs),
    /// Print the plain text of matching messages, one per line.
    PlainText(QueryArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Send target as JSON, e.g. '{"platform_type":"QQ Group","group_id":10000}'.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Filter as JSON, e.g. '{"types":["message"]}'. Fields depend on the schema.
    #[arg(short, long)]
    pub filter: Option<String>,
}

impl QueryArgs {
    pub fn target(&self) -> Result<Option<PlatformTarget>> {
        self.target
            .as_deref()
            .map(|json| serde_json::from_str(json).context("Invalid --target JSON"))
            .transpose()
    }

    pub fn filter<C: TargetClassifier>(&self) -> Result<FilterOf<C>> {
        match self.filter.as_deref() {
            Some(json) => serde_json::from_str(json).context("Invalid --filter JSON"),
            None => Ok(<FilterOf<C> as Default>::default()),
        }
    }
}

/// Loads HistoryConfig from env and applies the command-line overrides.
pub fn load_config(cli: &Cli) -> Result<HistoryConfig> {
    let mut config = HistoryConfig::load()?;
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }
    if let Some(schema) = cli.schema {
        config.schema = schema;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cesaa::{SessionClassifier, UninfoClassifier};
    use storage::MessageType;

    #[test]
    fn test_parse_plain_text_with_target_and_filter() {
        let cli = Cli::try_parse_from([
            "cesaa",
            "--schema",
            "session",
            "plain-text",
            "--target",
            r#"{"platform_type":"QQ Group","group_id":10000}"#,
            "--filter",
            r#"{"types":["message"]}"#,
        ])
        .unwrap();

        assert_eq!(cli.schema, Some(SchemaGeneration::Session));
        let Commands::PlainText(args) = cli.command else {
            panic!("expected plain-text");
        };
        assert_eq!(
            args.target().unwrap(),
            Some(PlatformTarget::QqGroup { group_id: 10000 })
        );
        let filter = args.filter::<SessionClassifier>().unwrap();
        assert_eq!(filter.types, Some(vec![MessageType::Message]));
    }

    #[test]
    fn test_missing_filter_is_unconstrained() {
        let args = QueryArgs::default();
        assert_eq!(args.target().unwrap(), None);
        assert_eq!(
            args.filter::<UninfoClassifier>().unwrap(),
            cesaa::UninfoFilter::default()
        );
    }

    #[test]
    fn test_invalid_target_json_is_reported() {
        let args = QueryArgs {
            target: Some(r#"{"platform_type":"Fax"}"#.to_string()),
            filter: None,
        };
        let err = args.target().unwrap_err();
        assert!(err.to_string().contains("--target"));
    }
}
