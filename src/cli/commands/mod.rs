pub mod api;
pub mod attendance;
pub mod checkin;
pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod member;
pub mod report;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::notify::{HttpNotifier, Outbox};
use crate::ui::messages::{background_warning, notice, warning};
use std::io::{self, Write};
use std::time::Duration;

/// How long a finished command waits for queued notifications.
pub(crate) const OUTBOX_GRACE: Duration = Duration::from_secs(5);

/// Open the configured database and bring its schema up to date.
///
/// Applied migrations are reported on stderr: stdout belongs to the
/// command (the `api` command prints nothing but its JSON response).
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::with_timeout(
        &cfg.database,
        Duration::from_millis(cfg.db_busy_timeout_ms),
    )?;
    for step in init_db(&pool.conn)? {
        notice(step);
    }
    Ok(pool)
}

/// Outbox backed by the configured endpoint, or a disabled one.
pub(crate) fn build_outbox(cfg: &Config) -> Outbox {
    let Some(url) = cfg.notify_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Outbox::disabled();
    };

    match HttpNotifier::new(url, Duration::from_millis(cfg.notify_timeout_ms)) {
        Ok(notifier) => Outbox::spawn(notifier),
        Err(e) => {
            background_warning(format!("Notifications disabled: {e}"));
            Outbox::disabled()
        }
    }
}

/// Drain the outbox, giving up after [`OUTBOX_GRACE`].
pub(crate) fn close_outbox(outbox: Outbox) {
    if !outbox.shutdown(OUTBOX_GRACE) {
        background_warning("Pending notifications abandoned after shutdown grace period");
    }
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
