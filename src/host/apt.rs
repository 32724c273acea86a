// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::io_error_code;
use crate::result::{Module, Result};
use crate::services::apt::ERROR_EXIT_LOCKED;

use log::{debug, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static LOCKED: AtomicBool = AtomicBool::new(false);

/// While held, `SIGINT` and `SIGTERM` no longer kill the process. They flip the liveness
/// flag instead, and the shell winds down on its next loop iteration.
///
/// Dropping the lock removes the flag actions, but the signal handlers stay installed: a
/// later `SIGINT` or `SIGTERM` is ignored rather than terminating the process.
#[derive(Debug)]
pub struct HostExitLock {
    signals: Vec<SigId>,
}

impl HostExitLock {
    pub(super) fn acquire(exit_requested: Arc<AtomicBool>) -> Result<Self> {
        if LOCKED.swap(true, Ordering::AcqRel) {
            return Err(ERROR_EXIT_LOCKED);
        }

        let mut lock = Self {
            signals: Vec::with_capacity(2),
        };

        for signal in [SIGINT, SIGTERM] {
            match signal_hook::flag::register(signal, Arc::clone(&exit_requested)) {
                Ok(id) => lock.signals.push(id),
                // `lock` drops here and undoes what was registered so far.
                Err(err) => return Err(io_error_code(Module::Applet, &err)),
            }
        }

        debug!("Routing SIGINT/SIGTERM to the main loop");
        Ok(lock)
    }

    pub fn is_locked() -> bool {
        LOCKED.load(Ordering::Acquire)
    }
}

impl Drop for HostExitLock {
    fn drop(&mut self) {
        for id in self.signals.drain(..) {
            if !signal_hook::low_level::unregister(id) {
                warn!("Signal action {:?} was already gone", id);
            }
        }

        LOCKED.store(false, Ordering::Release);
    }
}
