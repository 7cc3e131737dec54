use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bookswap::api::exchange::ExchangeClient;
use bookswap::services::ExchangeCoordinator;
use bookswap::session::Session;

/// Smoke binary: logs in with credentials from the environment and prints
/// both request lists.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("bookswap=debug".parse().expect("valid directive")),
        )
        .with_target(true)
        .init();

    let base_url = std::env::var("BOOKSWAP_API_URL").expect("BOOKSWAP_API_URL not set");
    let token = std::env::var("BOOKSWAP_API_TOKEN").expect("BOOKSWAP_API_TOKEN not set");
    let user_id = std::env::var("BOOKSWAP_USER_ID").expect("BOOKSWAP_USER_ID not set");

    info!("Starting bookswap client against {}", base_url);

    let session = Session::new(user_id, token);
    let client = ExchangeClient::new(base_url);
    let coordinator = ExchangeCoordinator::new(client, session);

    match coordinator.requests_made().await {
        Ok(cards) => {
            info!("{} requests made", cards.len());
            for card in &cards {
                info!(
                    "  [{}] {} for {} - {}",
                    card.request_id,
                    card.offered_book_title,
                    card.requested_book_title,
                    card.status_label
                );
            }
        }
        Err(e) => error!("Failed to fetch requests made: {}", e),
    }

    match coordinator.requests_received().await {
        Ok(cards) => {
            info!("{} requests received", cards.len());
            for card in &cards {
                info!(
                    "  [{}] {} offered for {} - {}",
                    card.request_id,
                    card.offered_book_title,
                    card.requested_book_title,
                    card.status_label
                );
            }
        }
        Err(e) => error!("Failed to fetch requests received: {}", e),
    }
}
