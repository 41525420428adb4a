pub mod cascade;
pub mod error;
pub mod identity;
pub mod render;
mod retry;
pub mod scrape;
pub mod search;
pub mod sources;
pub mod transport;
pub mod verify;

pub use error::ScrapeError;
pub use render::Renderer;
pub use scrape::SourceScraper;
pub use search::Aggregator;
pub use sources::{SourceSpec, Tier};
pub use transport::Transport;
pub use verify::UrlVerifier;
