use std::time::Duration;

use mongodb::{Client, options::ClientOptions};
use roster_config::Settings;
use tracing::{info, warn};

/// Builds a client from the database settings and waits until the server
/// answers a ping.
pub async fn connect(settings: &Settings) -> Result<Client, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.database.url).await?;

    if let Some(max_pool) = settings.database.max_pool_size {
        client_options.max_pool_size = Some(max_pool);
    }
    if let Some(min_pool) = settings.database.min_pool_size {
        client_options.min_pool_size = Some(min_pool);
    }
    let timeout = Duration::from_secs(settings.database.timeout_secs);
    client_options.connect_timeout = Some(timeout);
    client_options.server_selection_timeout = Some(timeout);

    let client = Client::with_options(client_options)?;

    // Verify connection, retrying while the server starts up
    let attempts = settings.database.connect_attempts.max(1);
    let delay = Duration::from_millis(settings.database.connect_retry_delay_ms);
    let mut attempt = 1;
    loop {
        match client
            .database("admin")
            .run_command(bson::doc! { "ping": 1 })
            .await
        {
            Ok(_) => break,
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, "MongoDB ping failed, retrying");
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    info!(db = %settings.database.name, "Connected to MongoDB");

    Ok(client)
}
