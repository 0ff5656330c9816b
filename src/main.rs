use tokio::net::TcpListener;

use job_proxy::config;
use job_proxy::http::JobServer;
use job_proxy::lifecycle::{self, signals, Shutdown};
use job_proxy::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    logging::init(&config.observability);

    tracing::info!("job-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        backend_host = %config.backend.host,
        backend_port = config.backend.port,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Blocks until the backend is ready or probing gives up.
    let worker = lifecycle::initialize(&config).await?;
    let mut process = worker.process;

    if !worker.handler.gate().is_open() {
        tracing::error!("Cannot start job handler because backend server is not ready");
        process.stop().await?;
        return Err("backend server failed to start".into());
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = JobServer::new(worker.handler.clone(), &config.listener);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let server_done = tokio::select! {
        _ = signals::wait_for_signal() => false,
        status = process.wait() => {
            tracing::error!(status = ?status, "Backend server exited unexpectedly");
            false
        }
        result = &mut server_task => {
            if let Ok(Err(e)) = result {
                tracing::error!(error = %e, "Job API failed");
            }
            true
        }
    };

    shutdown.trigger();
    if !server_done {
        if let Ok(Err(e)) = server_task.await {
            tracing::error!(error = %e, "Job API failed during shutdown");
        }
    }
    process.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
