//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `collector_core` linkage and read the default collection.
//! - Keep output deterministic for quick local sanity checks.
//! - Write store events to `collector_logs/` under the working directory.

use collector_core::{default_log_level, init_logging, resolve_log_dir, RecordStore, StoreConfig};
use std::process::ExitCode;

const LOG_DIR: &str = "collector_logs";

fn main() -> ExitCode {
    println!("collector_core version={}", collector_core::core_version());

    let log_dir = match std::env::current_dir() {
        Ok(cwd) => resolve_log_dir(&cwd, LOG_DIR),
        Err(err) => {
            eprintln!("collector_core working directory error={err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = log_dir.and_then(|dir| init_logging(default_log_level(), dir)) {
        eprintln!("collector_core logging error={err}");
        return ExitCode::FAILURE;
    }

    let store = RecordStore::new(StoreConfig::default());
    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("collector_core load error={err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(warning) = &loaded.warning {
        println!("collector_core warning={warning}");
    }

    let photos = match collector_core::gallery(store.photo_dir(), &loaded.collection) {
        Ok(items) => items.len(),
        Err(err) => {
            eprintln!("collector_core photo scan error={err}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "collector_core records={} photos={} last_id={}",
        loaded.collection.len(),
        photos,
        loaded.collection.last_allocated()
    );
    ExitCode::SUCCESS
}
