//! Ctrl+C handling for the blocking request loop.
//!
//! The handler is installed once per process. Interrupting while a server is
//! registered unblocks it so `run` returns normally; otherwise the process
//! exits.

use std::sync::{Arc, Mutex, Once, PoisonError};

use tiny_http::Server;

use crate::logger::{debug, log};

static ACTIVE: Mutex<Option<Arc<Server>>> = Mutex::new(None);
static HANDLER: Once = Once::new();

/// Make `server` the one Ctrl+C shuts down.
pub fn register(server: &Arc<Server>) {
    HANDLER.call_once(|| {
        // a host application may already own the signal
        if let Err(err) = ctrlc::set_handler(on_interrupt) {
            debug!("serve"; "Ctrl+C handler not installed: {}", err);
        }
    });
    *ACTIVE.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(server));
}

/// Forget the active server after its loop has returned.
pub fn unregister() {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
}

fn on_interrupt() {
    let active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
    match active {
        Some(server) => {
            log!("serve"; "shutting down...");
            server.unblock();
        }
        None => std::process::exit(0),
    }
}
