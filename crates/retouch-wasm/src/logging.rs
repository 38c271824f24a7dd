//! Routes `log` records from the core to the browser console.

use log::Level;

/// Most verbose level forwarded to the console.
fn console_level() -> Level {
    if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    }
}

/// Install the console logger. A second call keeps the first logger.
pub(crate) fn install() {
    if console_log::init_with_level(console_level()).is_err() {
        log::debug!("Console logger already installed");
    }
}
