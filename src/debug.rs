// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debug output.
//!
//! Everything written here goes to the platform's debug sink and, while a link transport is
//! up, to a mirror sink as well. [`init_log`] routes the `log` facade through the same path.

use alloc::boxed::Box;

use core::fmt;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

pub type Sink = Box<dyn fmt::Write + Send>;

static OUTPUT: Mutex<Option<Sink>> = Mutex::new(None);
static MIRROR: Mutex<Option<Sink>> = Mutex::new(None);

/// Replace the debug sink, returning the previous one.
pub fn set_output(sink: Sink) -> Option<Sink> {
    OUTPUT.lock().replace(sink)
}

pub fn take_output() -> Option<Sink> {
    OUTPUT.lock().take()
}

/// Install a mirror that receives a copy of all debug output, returning the previous one.
pub fn set_mirror(sink: Sink) -> Option<Sink> {
    MIRROR.lock().replace(sink)
}

pub fn take_mirror() -> Option<Sink> {
    MIRROR.lock().take()
}

pub fn has_mirror() -> bool {
    MIRROR.lock().is_some()
}

/// Handle onto the debug sinks. Usable from panic handlers before the logger is up.
#[derive(Default)]
pub struct DebugLog;

impl fmt::Write for DebugLog {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(output) = OUTPUT.lock().as_mut() {
            let _ = output.write_str(s);
        }

        // A dead mirror must not take the local output down with it.
        if let Some(mirror) = MIRROR.lock().as_mut() {
            let _ = mirror.write_str(s);
        }

        Ok(())
    }
}

struct DebugLogger;

static LOGGER: DebugLogger = DebugLogger;

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        use fmt::Write;
        let _ = writeln!(
            DebugLog,
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

pub fn init_log(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
