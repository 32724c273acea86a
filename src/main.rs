// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Write;
use std::process::ExitCode;

use homebrew_shell::app::{self, Config};
use homebrew_shell::debug::{self, DebugLog};
use homebrew_shell::host::{HostConfig, HostSystem, StderrSink};

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = writeln!(DebugLog, "[PANIC] {}", info);
    }));
}

fn main() -> ExitCode {
    let host_config = HostConfig::default();

    debug::set_output(Box::new(StderrSink));
    let _ = debug::init_log(host_config.log_level);
    install_panic_hook();

    let system = HostSystem::new(host_config);
    let outcome = app::main_with(&system, Config::default());

    ExitCode::from(outcome.exit_code())
}
