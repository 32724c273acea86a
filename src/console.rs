// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text console on the default screen.

use crate::result::Result;

use core::fmt;

/// Graphics service able to host a text console.
pub trait Gfx {
    /// Torn down when dropped.
    type Console: Console;

    /// Bring up a console on the default output target.
    fn init_console(&self) -> Result<Self::Console>;
}

/// Text written to a console is batched until [`Console::update`].
pub trait Console: fmt::Write {
    /// Make everything written so far visible.
    fn update(&mut self);

    /// Write `args` and show them right away.
    fn print(&mut self, args: fmt::Arguments) -> fmt::Result {
        let written = self.write_fmt(args);
        self.update();
        written
    }
}
