mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nre-cli")]
#[command(about = "Narrative risk engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List tick categories and their example counts.
    Ticks,
    /// Score one text by mean similarity and rank the top ticks.
    Score {
        /// Text to score.
        text: String,
    },
    /// Score a batch of samples by best pairwise similarity.
    Batch {
        /// Text samples; an empty list yields empty scores.
        samples: Vec<String>,
    },
    /// Run the external scraper for a company/topic and score its output.
    Scrape { company: String, topic: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = nre_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = commands::run(&config, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_with_no_samples() {
        let cli = Cli::try_parse_from(["nre-cli", "batch"]).expect("parse");
        assert!(matches!(cli.command, Commands::Batch { ref samples } if samples.is_empty()));
    }

    #[test]
    fn parses_scrape_positionals() {
        let cli = Cli::try_parse_from(["nre-cli", "scrape", "Acme", "layoffs"]).expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Scrape { ref company, ref topic } if company == "Acme" && topic == "layoffs"
        ));
    }

    #[test]
    fn score_requires_text() {
        assert!(Cli::try_parse_from(["nre-cli", "score"]).is_err());
    }
}
