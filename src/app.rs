// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The application shell: bring the platform up, wait for the exit button, bring it down.

use crate::console::{Console, Gfx};
use crate::error::{Fatal, ResultExt, Step};
use crate::ports::errf::{ErrF, ErrorInfo};
use crate::services::apt::Apt;
use crate::services::hid::{Button, Hid, NpadId, NpadStyle, Pad};
#[cfg(feature = "link")]
use crate::services::link::Link;
use crate::svc::Timeout;
use crate::system::System;

#[cfg(feature = "link")]
use log::warn;
use log::{debug, error, info};

use core::fmt;

pub const EXIT_SUCCESS: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    exit_button: Button,
    poll_interval: Timeout,
    prompt: Option<&'static str>,
}

impl Config {
    pub const DEFAULT_POLL_INTERVAL: Timeout = Timeout::from_milliseconds(1);

    pub const fn new() -> Self {
        Self {
            exit_button: Button::Plus,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            prompt: None,
        }
    }

    pub const fn with_exit_button(mut self, exit_button: Button) -> Self {
        self.exit_button = exit_button;
        self
    }

    pub const fn with_poll_interval(mut self, poll_interval: Timeout) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Replace the text shown at startup. It is printed as given.
    pub const fn with_prompt(mut self, prompt: &'static str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub const fn exit_button(&self) -> Button {
        self.exit_button
    }

    pub const fn poll_interval(&self) -> Timeout {
        self.poll_interval
    }

    pub fn prompt(&self) -> Prompt<'_> {
        Prompt(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Startup text. Unless replaced, `Press (+) to exit` and a blank line, naming the
/// configured exit button.
pub struct Prompt<'c>(&'c Config);

impl fmt::Display for Prompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.prompt {
            Some(prompt) => f.write_str(prompt),
            None => write!(f, "Press ({}) to exit\n\n", self.0.exit_button.symbol()),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    NotStarted,
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

impl State {
    pub const fn can_advance_to(self, next: State) -> bool {
        matches!(
            (self, next),
            (State::NotStarted, State::Initializing)
                | (State::Initializing, State::Running)
                | (State::Initializing, State::Terminated)
                | (State::Running, State::ShuttingDown)
                | (State::ShuttingDown, State::Terminated)
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The exit button was pressed.
    ExitButton,
    /// The system asked the application to close.
    LifecycleEnded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reason: ExitReason,
    /// Loop bodies run, counting the one that saw the exit button.
    pub iterations: u64,
}

impl Outcome {
    pub const fn exit_code(&self) -> u8 {
        EXIT_SUCCESS
    }
}

/// Resources taken during startup. Fields drop in declaration order, which is the reverse
/// of the order they were acquired in.
struct Held<S: System> {
    console: Option<<S as Gfx>::Console>,
    #[cfg(feature = "link")]
    redirect: Option<<S as Link>::Redirect>,
    #[cfg(feature = "link")]
    link: Option<<S as Link>::Transport>,
    exit_lock: Option<<S as Apt>::ExitLock>,
}

impl<S: System> Held<S> {
    fn new() -> Self {
        Self {
            console: None,
            #[cfg(feature = "link")]
            redirect: None,
            #[cfg(feature = "link")]
            link: None,
            exit_lock: None,
        }
    }
}

pub struct App<'s, S: System> {
    system: &'s S,
    config: Config,
    state: State,
    held: Held<S>,
}

impl<'s, S: System> App<'s, S> {
    pub fn new(system: &'s S, config: Config) -> Self {
        Self {
            system,
            config,
            state: State::NotStarted,
            held: Held::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn advance(&mut self, next: State) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the whole lifecycle once.
    ///
    /// On `Err` no prompt was shown and the loop never ran. Whatever was acquired before the
    /// failing step stays held until the `App` is dropped, so the failure can be reported
    /// before anything is handed back to the system.
    pub fn run(&mut self) -> Result<Outcome, Fatal> {
        self.advance(State::Initializing);

        let mut pad = match self.start() {
            Ok(pad) => pad,
            Err(fatal) => {
                self.advance(State::Terminated);
                return Err(fatal);
            }
        };

        self.advance(State::Running);
        let outcome = self.poll(&mut pad);
        info!("Leaving main loop: {:?}", outcome);

        self.advance(State::ShuttingDown);
        self.shutdown(pad);
        self.advance(State::Terminated);

        Ok(outcome)
    }

    fn start(&mut self) -> Result<Pad<<S as Hid>::Input>, Fatal> {
        let system = self.system;
        let held = &mut self.held;

        held.exit_lock = Some(system.lock_exit().or_fatal(Step::LockExit)?);
        debug!("Holding exit lock");

        #[cfg(feature = "link")]
        {
            let link = held.link.insert(system.init_link().or_fatal(Step::InitLink)?);
            info!("Debug link up");

            match system.redirect_output(link) {
                Ok(redirect) => held.redirect = Some(redirect),
                Err(code) => warn!("Debug output stays local: {}", code),
            }
        }

        let console = held
            .console
            .insert(system.init_console().or_fatal(Step::InitConsole)?);
        debug!("Console initialized");

        let input = system
            .init_input(1, NpadStyle::Standard)
            .or_fatal(Step::InitInput)?;
        let pad = Pad::new(input, NpadId::Player1);
        debug!("Input configured for {:?}", pad.id());

        // A console that can't take a line of text is not worth aborting over.
        let _ = console.print(format_args!("{}", self.config.prompt()));

        Ok(pad)
    }

    fn poll(&self, pad: &mut Pad<<S as Hid>::Input>) -> Outcome {
        let mut iterations = 0;

        while self.system.main_loop() {
            iterations += 1;

            pad.update();
            if pad.buttons_down().contains(self.config.exit_button) {
                return Outcome {
                    reason: ExitReason::ExitButton,
                    iterations,
                };
            }

            self.system.sleep_thread(self.config.poll_interval);
        }

        Outcome {
            reason: ExitReason::LifecycleEnded,
            iterations,
        }
    }

    fn shutdown(&mut self, pad: Pad<<S as Hid>::Input>) {
        drop(pad);

        drop(self.held.console.take());
        debug!("Console released");

        #[cfg(feature = "link")]
        {
            info!("Closing debug link");
            drop(self.held.redirect.take());
            drop(self.held.link.take());
        }

        drop(self.held.exit_lock.take());
        debug!("Exit lock released");
    }
}

/// Run the application on `system` and report how it ended.
///
/// A startup failure is reported through [`ErrF::throw`] and never returns.
pub fn main_with<S: System>(system: &S, config: Config) -> Outcome {
    let mut app = App::new(system, config);

    match app.run() {
        Ok(outcome) => outcome,
        Err(fatal) => {
            error!("{}", fatal);
            // `app` keeps what startup acquired until the process is gone.
            system.throw(&ErrorInfo::from_fatal(&fatal))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::string::ToString;

    #[test]
    fn lifecycle_edges() {
        use State::*;

        let legal = [
            (NotStarted, Initializing),
            (Initializing, Running),
            (Initializing, Terminated),
            (Running, ShuttingDown),
            (ShuttingDown, Terminated),
        ];
        let all = [NotStarted, Initializing, Running, ShuttingDown, Terminated];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_advance_to(to),
                    legal.contains(&(from, to)),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn running_cannot_skip_shutdown() {
        assert!(!State::Running.can_advance_to(State::Terminated));
        assert!(!State::Terminated.can_advance_to(State::NotStarted));
    }

    #[test]
    fn default_config_waits_for_plus_every_millisecond() {
        let config = Config::default();

        assert_eq!(config.exit_button(), Button::Plus);
        assert_eq!(config.poll_interval(), Timeout::from_nanoseconds(1_000_000));
    }

    #[test]
    fn default_prompt() {
        assert_eq!(Config::new().prompt().to_string(), "Press (+) to exit\n\n");
    }

    #[test]
    fn prompt_names_the_exit_button() {
        let config = Config::new().with_exit_button(Button::Minus);
        assert_eq!(config.prompt().to_string(), "Press (-) to exit\n\n");
    }

    #[test]
    fn custom_prompt_is_printed_as_given() {
        let config = Config::new().with_prompt("Bye?\n");
        assert_eq!(config.prompt().to_string(), "Bye?\n");
    }

    #[test]
    fn every_outcome_exits_successfully() {
        let outcome = Outcome {
            reason: ExitReason::LifecycleEnded,
            iterations: 0,
        };
        assert_eq!(outcome.exit_code(), EXIT_SUCCESS);
    }
}
