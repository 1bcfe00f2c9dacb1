use dotenvy::dotenv;
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use trustseal::{handlers, logging, AppState, Config, ThorClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init();

    let config = Config::from_env()?;
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }
    tracing::info!(?config, "configuration loaded");

    let ledger = Arc::new(ThorClient::new(&config.node_url));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState::new(config, ledger)?);

    let make_svc = make_service_fn(move |conn: &AddrStream| {
        let state = state.clone();
        let remote = conn.remote_addr();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                tracing::trace!(%remote, "connection");
                handlers::route(state.clone(), req)
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    tracing::info!(%addr, "trustseal listening");

    server.with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown requested");
}
