use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verbatim::{Config, SourceAggregator, Topic};

/// Gather article text on a topic from the configured content site and print
/// it as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Topic, phrase or quote to search for
    topic: String,

    /// Extra page to include (repeatable); must be an allowed content page
    #[arg(short, long = "url")]
    urls: Vec<String>,

    /// Quote or passage to include verbatim (repeatable)
    #[arg(short, long = "text")]
    texts: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "VERBATIM_JSON_LOGS")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::from_env().context("failed to load configuration")?;
    let topic = Topic::new(&cli.topic)?;
    let aggregator = SourceAggregator::new(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing with partial results");
            interrupt.cancel();
        }
    });

    let mut sources = aggregator.aggregate_until(&topic, &cancel).await;
    info!(count = sources.len(), "automatic search finished");

    for url in &cli.urls {
        if cancel.is_cancelled() {
            break;
        }
        match aggregator.add_manual_source(&mut sources, url).await {
            Ok(added) => info!(url = %added, "added"),
            Err(e) => warn!(%url, error = %e, "not added"),
        }
    }
    for text in &cli.texts {
        if sources.add_custom_text(text).is_none() {
            warn!("empty text ignored");
        }
    }

    println!("{}", serde_json::to_string_pretty(&sources)?);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "verbatim",
            "faith in Jesus Christ",
            "--url",
            "https://www.churchofjesuschrist.org/study/manual/gospel-topics/faith",
            "-u",
            "https://www.churchofjesuschrist.org/study/scriptures/bofm/alma/32",
            "--text",
            "Faith is not to have a perfect knowledge of things",
        ]);

        assert_eq!(cli.topic, "faith in Jesus Christ");
        assert_eq!(cli.urls.len(), 2);
        assert_eq!(cli.texts, vec!["Faith is not to have a perfect knowledge of things"]);
        assert!(!cli.json_logs);
    }

    #[test]
    fn test_cli_requires_topic() {
        assert!(Cli::try_parse_from(["verbatim"]).is_err());
    }
}
