use collection_crawler::{Crawler, CrawlerConfig, logging};
use tracing::{Level, error};

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logging(Level::INFO) {
        eprintln!("Warning: {:#}", e);
    }

    // Per-collection failures are only reported through the log; the exit
    // status is always success.
    match Crawler::new(CrawlerConfig::default()) {
        Ok(crawler) => {
            crawler.run().await;
        }
        Err(e) => error!("Failed to initialize crawler: {}", e),
    }
}
