use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use restaurant_assist::config::Config;
use restaurant_assist::dialog::RestaurantDialog;
use restaurant_assist::input::{Trigger, Turn};
use restaurant_assist::location::MemoryLocationResolver;
use restaurant_assist::search::YelpClient;
use restaurant_assist::session::ConversationManager;

const LOCAL_USER: &str = "local-user";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().map_err(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export YELP_API_KEY=...");
        e
    })?;

    eprintln!("🍽  Restaurant Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Search: {}", config.search.endpoint);
    eprintln!(
        "   Default location: {}",
        config.default_location.as_deref().unwrap_or("(ask)")
    );
    eprintln!(
        "   Follow-ups scan: {}",
        if config.dialog.scan_user_reply {
            "user reply"
        } else {
            "prior response"
        }
    );
    eprintln!("   Try \"find tacos\". /quit to exit.\n");

    tracing::info!(plugin = %config.name, "Configuration loaded");

    let locations = Arc::new(MemoryLocationResolver::new(config.default_location.clone()));
    let search = Arc::new(YelpClient::new(&config.search));
    let dialog = RestaurantDialog::new(locations, search, config.dialog.clone());
    let trigger = Trigger::default();
    let manager = ConversationManager::new(dialog, trigger.clone(), config.dialog.session_idle_timeout);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }

        let turn = Turn::new(LOCAL_USER, line, trigger.extract(line));
        match manager.handle(&turn).await {
            Ok(Some(response)) => println!("\n{response}\n"),
            Ok(None) => tracing::debug!("No response this turn"),
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                manager.end(LOCAL_USER).await;
            }
        }
        eprint!("> ");
    }

    Ok(())
}
