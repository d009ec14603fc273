/// evdash HTTP/WebSocket Server
///
/// Serves EV registration aggregates, facet lists and table pages to the
/// browser dashboard.

use clap::Parser;
use evdash::config::ServerConfig;
use evdash::server::run_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Flags first, then environment, then defaults
    let config = ServerConfig::parse();

    run_server(config).await
}
