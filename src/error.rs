// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt;
use core::panic::Location;

use crate::result::{ErrorCode, Result};

/// Startup steps, in the order the shell runs them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    LockExit,
    InitLink,
    InitConsole,
    InitInput,
}

impl Step {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LockExit => "lock_exit",
            Self::InitLink => "init_link",
            Self::InitConsole => "init_console",
            Self::InitInput => "init_input",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A platform call failed while bringing the application up.
///
/// There is no recovering from this: the only thing to do with a `Fatal` is to hand it to
/// [`crate::app::main_with`]'s throw path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed: {step} {file}:{line} {}", .code.diagnostic())]
pub struct Fatal {
    pub step: Step,
    pub code: ErrorCode,
    pub file: &'static str,
    pub line: u32,
}

impl Fatal {
    #[track_caller]
    pub fn new(step: Step, code: ErrorCode) -> Self {
        let location = Location::caller();

        Self {
            step,
            code,
            file: location.file(),
            line: location.line(),
        }
    }
}

pub trait ResultExt<T> {
    /// Turn a failed platform call into a [`Fatal`] attributed to `step` and the caller's location.
    fn or_fatal(self, step: Step) -> core::result::Result<T, Fatal>;
}

impl<T> ResultExt<T> for Result<T> {
    #[track_caller]
    fn or_fatal(self, step: Step) -> core::result::Result<T, Fatal> {
        match self {
            Ok(value) => Ok(value),
            Err(code) => Err(Fatal::new(step, code)),
        }
    }
}
