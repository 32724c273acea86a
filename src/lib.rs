// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal homebrew application shell.
//!
//! [`app::main_with`] takes the platform's exit lock, brings up an optional debug link, a
//! text console and one controller, then polls until the exit button is pressed or the
//! system asks the application to close. Everything is released again in reverse order.
//!
//! The platform is reached only through the traits bundled in [`system::System`]. With the
//! `std` feature, [`host::HostSystem`] implements them on top of a terminal.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

pub mod app;
pub mod console;
pub mod debug;
pub mod error;
pub mod ports;
pub mod result;
pub mod services;
pub mod svc;
pub mod system;

#[cfg(feature = "std")]
pub mod host;
