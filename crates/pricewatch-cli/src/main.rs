use clap::{Parser, Subcommand};
use pricewatch_core::Source;
use pricewatch_scraper::{Aggregator, Transport, UrlVerifier};

#[derive(Debug, Parser)]
#[command(name = "pricewatch-cli")]
#[command(about = "Multi-source product price search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every configured retailer and print the aggregated JSON.
    Search {
        query: String,
        /// Maximum records per source.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Start with the mobile site variants instead of desktop.
        #[arg(long)]
        mobile: bool,
    },
    /// Check whether a product URL still resolves to a live page.
    Verify {
        url: String,
        /// Retailer the URL belongs to.
        #[arg(long)]
        source: Source,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            query,
            limit,
            mobile,
        } => {
            let transport = Transport::with_defaults()?;
            let aggregator = Aggregator::new(&transport.clone().mobile(mobile));

            let mut result = aggregator.search(&query, limit, mobile).await;
            // Desktop markup blocked everywhere? The mobile variants sit
            // behind softer defenses, so retry there once.
            if result.is_empty() && !mobile {
                tracing::info!(query, "desktop search empty, retrying mobile variants");
                let mobile_aggregator = Aggregator::new(&transport.mobile(true));
                result = mobile_aggregator.search(&query, limit, true).await;
            }

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Verify { url, source } => {
            let verifier = UrlVerifier::new()?;
            let live = verifier.verify(&url, source).await;
            println!(
                "{}",
                serde_json::json!({ "url": url, "source": source, "live": live })
            );
            if !live {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
