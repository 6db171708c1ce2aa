/// The scoreboard's entry-point.
///
/// If the result store cannot be reached, this function will
/// periodically try to connect. Subscriptions that fail later on are
/// reflected on their boards, but not retried.
#[tokio::main]
async fn main() {
    use std::sync::Arc;
    use std::time::Duration;

    use dotenv::dotenv;
    use tokio::sync::mpsc;
    use tokio::time::delay_for;

    use veloboard::config::Config;
    use veloboard::controller::Controller;
    use veloboard::source::{EventMap, RestStore, ResultStore};

    // Read environment variables from an '.env' file in the working directory.
    // We use these env vars:
    //  - RUST_LOG
    //  - VELOBOARD_CONFIG
    let using_env_file = dotenv().is_ok();

    env_logger::init(); // Use log::* to write to stderr

    if using_env_file {
        log::info!("using .env file")
    }

    let config = Config::read_from_env();

    let event_map = EventMap::read_from_file(&config.event_map_file)
        .expect("failed to read event map");

    let retry_after = Duration::from_secs(1);

    log::info!("waiting for result store connection...");
    let store = loop {
        match RestStore::connect(&config.store_url).await {
            None => {
                delay_for(retry_after).await;
                log::debug!("waiting for result store connection...");
            }
            Some(store) => break store,
        }
    };
    log::info!("got result store connection");

    let store = Arc::new(store) as Arc<dyn ResultStore>;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let controller = Controller::init(&config, event_map);
    controller
        .subscribe_all(&store, &events_tx)
        .await
        .expect("failed to subscribe to result store");

    log::info!("running event loop...");
    loop {
        let next_event = events_rx
            .recv()
            .await
            .expect("event receiver disconnected");
        controller.on_source_event(next_event).await;
    }
}
