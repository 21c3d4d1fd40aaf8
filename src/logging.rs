//! Logger initialization.
//!
//! All modules log through the [`log`] facade. Native builds print through
//! `env_logger`, which honours `RUST_LOG`:
//!
//! ```sh
//! $> RUST_LOG=evotree=debug evotree data.json
//! ```
//!
//! In the browser, records go to the Javascript console via `console_log`.
//! The default level is [`Info`](log::Level::Info) in debug builds and
//! [`Warn`](log::Level::Warn) in release builds.

use std::sync::Once;

static INIT: Once = Once::new();

fn default_level() -> log::LevelFilter {
    if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

/// Install the platform logger. Only the first call has any effect.
pub fn init() {
    init_with_level(default_level());
}

pub fn init_with_level(level: log::LevelFilter) {
    INIT.call_once(|| platform_init(level));
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_init(level: log::LevelFilter) {
    let filter = format!("{}={}", env!("CARGO_PKG_NAME"), level.as_str().to_lowercase());
    // try_init: the host application may have installed its own logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn platform_init(level: log::LevelFilter) {
    console_error_panic_hook::set_once();
    if let Some(level) = level.to_level() {
        let _ = console_log::init_with_level(level);
    }
}
