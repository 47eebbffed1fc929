use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // load .env first so CONFIG_PATH / RUST_LOG / SERVER_* take effect
    dotenv().ok();

    let (cfg, config_error) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(e) => (configs::AppConfig::default(), Some(e)),
    };

    let filter = common::utils::logging::default_filter(cfg.server.debug);
    if cfg.server.log_json {
        common::utils::logging::init_logging_json(filter);
    } else {
        common::utils::logging::init_logging_with(filter);
    }
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
    if let Some(e) = config_error {
        error!(service = "server", event = "config_invalid", error = %e, "cannot load configuration");
        return std::process::ExitCode::FAILURE;
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    if cfg.server.debug {
        warn!(service = "server", event = "debug_mode", "verbose diagnostics enabled; not meant for production exposure");
    }
    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "product server starting"
    );

    // run returns once Ctrl+C has drained in-flight requests
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
