// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::result::{CommonDescription, ErrorCode, Level, Module, Result, Summary};

/// No listener answered on the other end of the link.
pub const ERROR_NO_LISTENER: ErrorCode = ErrorCode::new(
    Level::Permanent,
    Summary::NotFound,
    Module::Soc,
    CommonDescription::NotFound.to_value(),
);

/// Debug link to a listener on the development machine.
///
/// Brought up in two steps. [`Link::init_link`] starts the network transport, and failing
/// to do so is fatal. [`Link::redirect_output`] then mirrors everything written through
/// [`crate::debug`] to the listener; without one the application runs on with local output.
/// Dropping the redirect removes the mirror, dropping the transport closes the connection.
pub trait Link {
    type Transport;
    type Redirect;

    fn init_link(&self) -> Result<Self::Transport>;

    fn redirect_output(&self, transport: &Self::Transport) -> Result<Self::Redirect>;
}
