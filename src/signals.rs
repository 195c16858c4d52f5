use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use nix::sys::signal::{self, SigHandler, Signal};

use crate::scanner::CancelToken;

static CANCEL: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Route SIGINT and SIGTERM to `cancel`, so an interrupted scan drains its
/// workers and reports cancellation instead of dying mid-write.
///
/// Only the first token registered per process is honoured.
pub fn install_cancel_handler(cancel: &CancelToken) -> nix::Result<()> {
    let _ = CANCEL.set(cancel.flag());

    // SAFETY: the handler only performs an atomic store on an already
    // initialised flag, which is async-signal-safe.
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_cancel))?;
        signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_cancel))?;
    }

    Ok(())
}

extern "C" fn handle_cancel(_: i32) {
    if let Some(flag) = CANCEL.get() {
        flag.store(true, Ordering::SeqCst);
    }
}
