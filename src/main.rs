use devserve::logger::{self, AccessLogFormat};
use devserve::{server, Config, Server, ServerError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg).map_err(ServerError::Logger)?;

    if AccessLogFormat::from_name(&cfg.logging.access_log_format).is_none() {
        logger::log_warning(&format!(
            "Unknown access log format '{}', using 'common'",
            cfg.logging.access_log_format
        ));
    }

    // Worker thread count follows the config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::bind(cfg)?;
    logger::log_startup(&server.local_addr()?);

    server.run_until(server::shutdown_signal()).await;
    Ok(())
}
