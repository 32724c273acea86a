// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::console::Gfx;
use crate::ports::errf::ErrF;
use crate::services::apt::Apt;
use crate::services::hid::Hid;
#[cfg(feature = "link")]
use crate::services::link::Link;
use crate::svc::Timeout;

/// Everything the application shell needs from the platform.
#[cfg(not(feature = "link"))]
pub trait System: Apt + Gfx + Hid + ErrF {
    fn sleep_thread(&self, timeout: Timeout);
}

/// Everything the application shell needs from the platform.
#[cfg(feature = "link")]
pub trait System: Apt + Gfx + Hid + Link + ErrF {
    fn sleep_thread(&self, timeout: Timeout);
}
