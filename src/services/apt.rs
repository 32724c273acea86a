// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::result::{CommonDescription, ErrorCode, Level, Module, Result, Summary};

/// Exit lock is already held by this process.
pub const ERROR_EXIT_LOCKED: ErrorCode = ErrorCode::new(
    Level::Usage,
    Summary::InvalidState,
    Module::Applet,
    CommonDescription::AlreadyInitialized.to_value(),
);

/// Applet manager: application lifecycle as seen by the system.
pub trait Apt {
    /// Keeps the system from tearing the process down while alive. Dropping it releases
    /// the lock and lets a pending exit go through.
    type ExitLock;

    fn lock_exit(&self) -> Result<Self::ExitLock>;

    /// Whether the application may keep running.
    ///
    /// Turns `false` once the system asked the application to close, e.g. when the user
    /// returned to the home menu. It does not turn back.
    fn main_loop(&self) -> bool;
}
