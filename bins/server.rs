use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info};

fn main() -> ExitCode {
    // .env 先于日志加载，RUST_LOG / LOG_FORMAT 才能生效
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    // 配置只加载一次：线程数和服务本身用同一份
    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %format!("{e:#}"), "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        version = env!("CARGO_PKG_VERSION"),
        backend = ?cfg.storage.backend,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "customer api starting"
    );

    match rt.block_on(server::run(cfg, server::startup::shutdown_signal())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "run_failed", error = %format!("{e:#}"), "customer api exited with error");
            ExitCode::FAILURE
        }
    }
}
