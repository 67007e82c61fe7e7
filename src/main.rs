#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Crozz ledger node entrypoint (systemd-friendly).
//! Loads config, resumes from the last snapshot and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crozz_ledger::api::http;
use crozz_ledger::core::clock::{Clock, MonotonicClock, SystemClock};
use crozz_ledger::core::runtime::executor::Ledger;
use crozz_ledger::core::state::persistent_state::PersistentState;
use crozz_ledger::core::types::{Address, LogConfig, NodeConfig};
use crozz_ledger::monitoring::metrics::Metrics;

/// `CROZZ_CONFIG`, else the first CLI argument.
fn config_path() -> Option<String> {
    std::env::var("CROZZ_CONFIG")
        .ok()
        .or_else(|| std::env::args().nth(1))
}

fn init_tracing(cfg: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.level.as_str()));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);
    let _ = if cfg.json {
        fmt.json().try_init()
    } else {
        fmt.compact().try_init()
    };
}

fn save<C: Clock>(ledger: &Ledger<C>, store: &PersistentState) -> anyhow::Result<String> {
    let state = ledger.snapshot()?;
    let root = store.save_snapshot(&state)?;
    Ok(hex::encode(root))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler failed; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match config_path() {
        Some(path) => NodeConfig::load(&path).with_context(|| format!("config {path}"))?,
        None => NodeConfig::default(),
    };
    init_tracing(&cfg.log);

    if cfg.ledger.bootstrap_super_admin == Address::from_bytes([0u8; 32]) {
        warn!("bootstrap_super_admin is the zero address; set [ledger].bootstrap_super_admin");
    }

    let store = PersistentState::open(&cfg.node.data_dir)
        .with_context(|| format!("open store at {}", cfg.node.data_dir))?;
    let clock = MonotonicClock::new(SystemClock);

    let ledger = match store.load_snapshot()? {
        Some(state) => {
            info!(
                data_dir = %cfg.node.data_dir,
                bootstrap = %state.admins.bootstrap_admin(),
                quorum = ?state.governance.quorum_policy(),
                direct_param_updates = state.admins.direct_param_updates_enabled(),
                "resuming ledger from snapshot"
            );
            for key in state.config_drift(&cfg.ledger) {
                warn!(key, "[ledger] config differs from snapshot; snapshot value kept");
            }
            Ledger::from_state(state, clock)
        }
        None => {
            info!(
                data_dir = %cfg.node.data_dir,
                bootstrap = %cfg.ledger.bootstrap_super_admin,
                "initializing new ledger"
            );
            Ledger::new(&cfg.ledger, cfg.params.clone(), clock)
        }
    };
    let ledger = Arc::new(ledger);
    let metrics = Arc::new(Metrics::new()?);
    metrics.observe(&ledger.stats()?);

    // periodic snapshots
    let snap_ledger = ledger.clone();
    let snap_store = store.clone();
    let every = Duration::from_secs(cfg.ledger.snapshot_interval_secs);
    let snapshot_task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tick.tick().await;
        loop {
            tick.tick().await;
            match save(&snap_ledger, &snap_store) {
                Ok(root) => info!(%root, "snapshot saved"),
                Err(e) => warn!(error = %e, "snapshot failed"),
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(&cfg.http.listen_addr)
        .await
        .with_context(|| format!("bind {}", cfg.http.listen_addr))?;
    info!(node = %cfg.node.name, addr = %cfg.http.listen_addr, "crozz ledger node starting");

    axum::serve(listener, http::router(ledger.clone(), metrics))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    snapshot_task.abort();
    let root = save(&ledger, &store)?;
    info!(%root, "final snapshot saved");
    Ok(())
}
