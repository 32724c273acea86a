// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the shell on a development machine: the terminal is the screen and the keyboard is
//! player one's controller. Termination signals stand in for the home menu.

mod apt;
mod console;
mod input;
#[cfg(feature = "link")]
mod link;

pub use self::apt::HostExitLock;
pub use self::console::HostConsole;
pub use self::input::{button_for_key, HostInput};
#[cfg(feature = "link")]
pub use self::link::{HostLink, HostRedirect};

use crate::console::Gfx;
use crate::debug::DebugLog;
use crate::ports::errf::{ErrF, ErrorInfo};
use crate::result::{CommonDescription, ErrorCode, Level, Module, Result, Summary};
use crate::services::apt::Apt;
use crate::services::hid::{Hid, NpadStyle};
#[cfg(feature = "link")]
use crate::services::link::Link;
use crate::svc::Timeout;
use crate::system::System;

use log::LevelFilter;

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Where the debug link connects to.
    pub link_addr: SocketAddr,
    pub log_level: LevelFilter,
}

impl HostConfig {
    pub const DEFAULT_LINK_PORT: u16 = 28771;
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            link_addr: SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::LOCALHOST,
                Self::DEFAULT_LINK_PORT,
            )),
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(Debug)]
pub struct HostSystem {
    #[cfg_attr(not(feature = "link"), allow(dead_code))]
    config: HostConfig,
    exit_requested: Arc<AtomicBool>,
}

impl HostSystem {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            exit_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the application to close, as the home menu would.
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }
}

impl Default for HostSystem {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl Apt for HostSystem {
    type ExitLock = HostExitLock;

    fn lock_exit(&self) -> Result<HostExitLock> {
        HostExitLock::acquire(Arc::clone(&self.exit_requested))
    }

    fn main_loop(&self) -> bool {
        !self.exit_requested.load(Ordering::Acquire)
    }
}

impl Gfx for HostSystem {
    type Console = HostConsole<io::Stdout>;

    fn init_console(&self) -> Result<Self::Console> {
        Ok(HostConsole::new(io::stdout()))
    }
}

impl Hid for HostSystem {
    type Input = HostInput;

    fn init_input(&self, max_players: usize, style: NpadStyle) -> Result<HostInput> {
        HostInput::init(max_players, style, Arc::clone(&self.exit_requested))
    }
}

#[cfg(feature = "link")]
impl Link for HostSystem {
    type Transport = HostLink;
    type Redirect = HostRedirect;

    fn init_link(&self) -> Result<HostLink> {
        HostLink::connect(self.config.link_addr)
    }

    fn redirect_output(&self, link: &HostLink) -> Result<HostRedirect> {
        HostRedirect::install(link)
    }
}

impl ErrF for HostSystem {
    fn throw(&self, error: &ErrorInfo) -> ! {
        let _ = writeln!(DebugLog, "[FATAL] {}", error);

        // Nothing gets dropped past this point.
        let _ = crossterm::terminal::disable_raw_mode();
        eprintln!("{}\n{:#?}", error, error);

        std::process::abort()
    }
}

impl System for HostSystem {
    fn sleep_thread(&self, timeout: Timeout) {
        match timeout.as_duration() {
            Some(duration) => std::thread::sleep(duration),
            None => loop {
                std::thread::park();
            },
        }
    }
}

/// Debug output on stderr. Line ends are written as `\r\n` so they still line up while the
/// terminal is in raw mode.
#[derive(Debug, Default)]
pub struct StderrSink;

impl fmt::Write for StderrSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_crlf(&mut io::stderr().lock(), s).map_err(|_| fmt::Error)
    }
}

pub(crate) fn write_crlf(out: &mut impl io::Write, s: &str) -> io::Result<()> {
    let mut lines = s.split('\n');
    if let Some(first) = lines.next() {
        out.write_all(first.as_bytes())?;
    }
    for line in lines {
        out.write_all(b"\r\n")?;
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Translate a host I/O failure into the platform's result code for `module`.
pub(crate) fn io_error_code(module: Module, err: &io::Error) -> ErrorCode {
    let (level, summary, description) = match err.kind() {
        io::ErrorKind::NotFound => (Level::Permanent, Summary::NotFound, CommonDescription::NotFound),
        io::ErrorKind::ConnectionRefused => {
            (Level::Permanent, Summary::NotFound, CommonDescription::NotFound)
        }
        io::ErrorKind::PermissionDenied => (
            Level::Permanent,
            Summary::InvalidState,
            CommonDescription::NotAuthorized,
        ),
        io::ErrorKind::AlreadyExists => (
            Level::Usage,
            Summary::InvalidState,
            CommonDescription::AlreadyExists,
        ),
        io::ErrorKind::TimedOut => (Level::Temporary, Summary::Canceled, CommonDescription::Timeout),
        io::ErrorKind::WouldBlock => (Level::Temporary, Summary::WouldBlock, CommonDescription::Busy),
        io::ErrorKind::Unsupported => (
            Level::Permanent,
            Summary::NotSupported,
            CommonDescription::NotImplemented,
        ),
        _ => (
            Level::Permanent,
            Summary::Internal,
            CommonDescription::InvalidResultValue,
        ),
    };

    ErrorCode::new(level, summary, module, description.to_value())
}
