// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::io_error_code;
use crate::debug;
use crate::result::{Module, Result};
use crate::services::link::ERROR_NO_LISTENER;

use log::debug;

use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

struct StreamSink(TcpStream);

impl fmt::Write for StreamSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Connection to the listener on the development machine.
#[derive(Debug)]
pub struct HostLink {
    stream: TcpStream,
}

impl HostLink {
    pub fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|err| match err.kind() {
            io::ErrorKind::ConnectionRefused => ERROR_NO_LISTENER,
            _ => io_error_code(Module::Soc, &err),
        })?;
        let _ = stream.set_nodelay(true);

        debug!("Connected to {}", addr);
        Ok(Self { stream })
    }
}

impl Drop for HostLink {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Mirrors debug output over a [`HostLink`] for as long as it lives.
#[derive(Debug)]
pub struct HostRedirect {
    _private: (),
}

impl HostRedirect {
    pub fn install(link: &HostLink) -> Result<Self> {
        let mirror = link
            .stream
            .try_clone()
            .map_err(|err| io_error_code(Module::Soc, &err))?;
        debug::set_mirror(Box::new(StreamSink(mirror)));

        debug!("Mirroring debug output");
        Ok(Self { _private: () })
    }
}

impl Drop for HostRedirect {
    fn drop(&mut self) {
        drop(debug::take_mirror());
    }
}
