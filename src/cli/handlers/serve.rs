//! API server handler

use crate::api::serve_api;
use crate::config::AppConfig;
use crate::Result;

pub async fn handle_serve_command(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let enable_cors = cors || config.server.enable_cors;

    serve_api(config, host, port, enable_cors).await
}
