// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::write_crlf;
use crate::console::Console;

use log::warn;

use std::fmt;
use std::io;

/// Console backed by a terminal. Text is held back until [`Console::update`].
#[derive(Debug)]
pub struct HostConsole<W: io::Write> {
    out: W,
    pending: String,
}

impl<W: io::Write> HostConsole<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: String::new(),
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn present(&mut self) -> io::Result<()> {
        write_crlf(&mut self.out, &self.pending)?;
        self.pending.clear();
        self.out.flush()
    }
}

impl<W: io::Write> fmt::Write for HostConsole<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.pending.push_str(s);
        Ok(())
    }
}

impl<W: io::Write> Console for HostConsole<W> {
    fn update(&mut self) {
        if let Err(err) = self.present() {
            warn!("Console update failed: {}", err);
        }
    }
}

impl<W: io::Write> Drop for HostConsole<W> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            self.update();
        }
    }
}
