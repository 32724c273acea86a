// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::fmt;
use core::time::Duration;

/// Duration handed to the kernel's thread sleep and wait calls, in nanoseconds.
///
/// Negative values mean "wait forever", zero means "don't wait at all".
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Timeout(i64);

impl Timeout {
    pub const fn from_nanoseconds(ns: i64) -> Self {
        Self(ns)
    }

    pub const fn from_milliseconds(ms: i64) -> Self {
        Self(ms.saturating_mul(1_000_000))
    }

    pub const fn none() -> Self {
        Self(0)
    }

    pub const fn forever() -> Self {
        Self(-1)
    }

    pub const fn is_forever(&self) -> bool {
        self.0 < 0
    }

    pub const fn as_nanoseconds(&self) -> i64 {
        self.0
    }

    /// `None` for [`Timeout::forever`].
    pub const fn as_duration(&self) -> Option<Duration> {
        if self.is_forever() {
            None
        } else {
            Some(Duration::from_nanos(self.0 as u64))
        }
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_duration() {
            None => f.write_str("Timeout(forever)"),
            Some(duration) => write!(f, "Timeout({:?})", duration),
        }
    }
}
