// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use assert_matches::assert_matches;

use homebrew_shell::app::{self, App, Config, ExitReason, Outcome, State};
use homebrew_shell::console::{Console, Gfx};
use homebrew_shell::error::Step;
use homebrew_shell::ports::errf::{ErrF, ErrorInfo};
use homebrew_shell::result::{
    CommonDescription, ErrorCode, Level, Module, Result, ResultValue, Summary,
};
use homebrew_shell::services::apt::Apt;
use homebrew_shell::services::hid::{Button, Hid, Input, KeyPad, NpadId, NpadStyle};
#[cfg(feature = "link")]
use homebrew_shell::services::link::Link;
use homebrew_shell::svc::Timeout;
use homebrew_shell::system::System;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Resource {
    ExitLock,
    #[cfg(feature = "link")]
    Link,
    #[cfg(feature = "link")]
    Redirect,
    Console,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Acquire(Resource),
    Release(Resource),
    Shown(String),
    LivenessQuery,
    Read(NpadId),
    Sleep(Timeout),
    Thrown(u32),
}

type Journal = Rc<RefCell<Vec<Event>>>;

struct Guard {
    resource: Resource,
    journal: Journal,
}

impl Guard {
    fn acquire(resource: Resource, journal: &Journal) -> Self {
        journal.borrow_mut().push(Event::Acquire(resource));
        Self {
            resource,
            journal: Rc::clone(journal),
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.journal
            .borrow_mut()
            .push(Event::Release(self.resource));
    }
}

struct MockConsole {
    guard: Guard,
    pending: String,
}

impl fmt::Write for MockConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.pending.push_str(s);
        Ok(())
    }
}

impl Console for MockConsole {
    fn update(&mut self) {
        let text = std::mem::take(&mut self.pending);
        self.guard.journal.borrow_mut().push(Event::Shown(text));
    }
}

struct MockInput {
    guard: Guard,
    snapshots: Rc<RefCell<VecDeque<KeyPad>>>,
}

impl Input for MockInput {
    fn read(&mut self, id: NpadId) -> KeyPad {
        self.guard.journal.borrow_mut().push(Event::Read(id));
        self.snapshots.borrow_mut().pop_front().unwrap_or_default()
    }
}

const INJECTED: ErrorCode = ErrorCode::new(
    Level::Permanent,
    Summary::NotFound,
    Module::Application,
    CommonDescription::NoData.to_value(),
);

/// Scripted platform that writes down everything the shell asks of it.
#[derive(Default)]
struct Mock {
    journal: Journal,
    /// Answers of the liveness predicate; live once the script runs out.
    liveness: RefCell<VecDeque<bool>>,
    snapshots: Rc<RefCell<VecDeque<KeyPad>>>,
    fail_at: Option<Step>,
    #[cfg(feature = "link")]
    no_listener: bool,
}

impl Mock {
    fn new() -> Self {
        Self::default()
    }

    fn with_snapshots(self, snapshots: impl IntoIterator<Item = KeyPad>) -> Self {
        self.snapshots.borrow_mut().extend(snapshots);
        self
    }

    fn with_liveness(self, liveness: impl IntoIterator<Item = bool>) -> Self {
        self.liveness.borrow_mut().extend(liveness);
        self
    }

    fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    #[cfg(feature = "link")]
    fn without_listener(mut self) -> Self {
        self.no_listener = true;
        self
    }

    fn check(&self, step: Step) -> Result<()> {
        match self.fail_at {
            Some(failing) if failing == step => Err(INJECTED),
            _ => Ok(()),
        }
    }

    fn events(&self) -> Vec<Event> {
        self.journal.borrow().clone()
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.journal.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Acquire and release events only, in order.
    fn resource_events(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Acquire(_) | Event::Release(_)))
            .collect()
    }
}

impl Apt for Mock {
    type ExitLock = Guard;

    fn lock_exit(&self) -> Result<Guard> {
        self.check(Step::LockExit)?;
        Ok(Guard::acquire(Resource::ExitLock, &self.journal))
    }

    fn main_loop(&self) -> bool {
        self.journal.borrow_mut().push(Event::LivenessQuery);
        self.liveness.borrow_mut().pop_front().unwrap_or(true)
    }
}

#[cfg(feature = "link")]
impl Link for Mock {
    type Transport = Guard;
    type Redirect = Guard;

    fn init_link(&self) -> Result<Guard> {
        self.check(Step::InitLink)?;
        Ok(Guard::acquire(Resource::Link, &self.journal))
    }

    fn redirect_output(&self, _: &Guard) -> Result<Guard> {
        if self.no_listener {
            return Err(INJECTED);
        }
        Ok(Guard::acquire(Resource::Redirect, &self.journal))
    }
}

impl Gfx for Mock {
    type Console = MockConsole;

    fn init_console(&self) -> Result<MockConsole> {
        self.check(Step::InitConsole)?;
        Ok(MockConsole {
            guard: Guard::acquire(Resource::Console, &self.journal),
            pending: String::new(),
        })
    }
}

impl Hid for Mock {
    type Input = MockInput;

    fn init_input(&self, max_players: usize, style: NpadStyle) -> Result<MockInput> {
        assert_eq!(max_players, 1);
        assert_eq!(style, NpadStyle::Standard);

        self.check(Step::InitInput)?;
        Ok(MockInput {
            guard: Guard::acquire(Resource::Input, &self.journal),
            snapshots: Rc::clone(&self.snapshots),
        })
    }
}

impl ErrF for Mock {
    fn throw(&self, error: &ErrorInfo) -> ! {
        self.journal
            .borrow_mut()
            .push(Event::Thrown(error.result_code().value()));
        panic!("thrown: {}", error)
    }
}

impl System for Mock {
    fn sleep_thread(&self, timeout: Timeout) {
        self.journal.borrow_mut().push(Event::Sleep(timeout));
    }
}

fn idle(n: usize) -> impl Iterator<Item = KeyPad> {
    std::iter::repeat(KeyPad::empty()).take(n)
}

fn press(button: Button) -> KeyPad {
    KeyPad::from(button)
}

fn expected_resource_events() -> Vec<Event> {
    use Event::*;

    let mut events = vec![Acquire(Resource::ExitLock)];
    #[cfg(feature = "link")]
    events.extend([Acquire(Resource::Link), Acquire(Resource::Redirect)]);
    events.extend([
        Acquire(Resource::Console),
        Acquire(Resource::Input),
        Release(Resource::Input),
        Release(Resource::Console),
    ]);
    #[cfg(feature = "link")]
    events.extend([Release(Resource::Redirect), Release(Resource::Link)]);
    events.push(Release(Resource::ExitLock));

    events
}

fn run(mock: &Mock) -> Outcome {
    app::main_with(mock, Config::default())
}

#[test]
fn exit_button_after_idle_iterations() {
    for idle_ticks in [0, 1, 5] {
        let mock = Mock::new().with_snapshots(idle(idle_ticks).chain([press(Button::Plus)]));

        let outcome = run(&mock);

        assert_eq!(
            outcome,
            Outcome {
                reason: ExitReason::ExitButton,
                iterations: idle_ticks as u64 + 1,
            }
        );
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(mock.count(|e| matches!(e, Event::Sleep(_))), idle_ticks);
        assert_eq!(mock.count(|e| matches!(e, Event::Read(_))), idle_ticks + 1);
        assert_eq!(mock.resource_events(), expected_resource_events());
    }
}

#[test]
fn system_exit_request_ends_the_loop() {
    for live_ticks in [0, 1, 7] {
        let mock = Mock::new()
            .with_liveness(std::iter::repeat(true).take(live_ticks).chain([false]))
            .with_snapshots(std::iter::repeat(press(Button::A)).take(live_ticks));

        let outcome = run(&mock);

        assert_eq!(outcome.reason, ExitReason::LifecycleEnded);
        assert_eq!(outcome.iterations, live_ticks as u64);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(mock.count(|e| *e == Event::LivenessQuery), live_ticks + 1);
        assert_eq!(mock.resource_events(), expected_resource_events());
    }
}

#[test]
fn other_buttons_only_cost_a_sleep() {
    let others = [
        press(Button::A),
        press(Button::Minus),
        KeyPad::from(Button::L) | KeyPad::from(Button::R),
        KeyPad::empty(),
        press(Button::Down),
    ];
    let mock = Mock::new()
        .with_liveness(std::iter::repeat(true).take(others.len()).chain([false]))
        .with_snapshots(others);

    let outcome = run(&mock);
    assert_eq!(outcome.iterations, others.len() as u64);

    let loop_events: Vec<Event> = mock
        .events()
        .into_iter()
        .skip_while(|e| !matches!(e, Event::LivenessQuery))
        .take_while(|e| !matches!(e, Event::Release(_)))
        .collect();

    let mut expected = Vec::new();
    for _ in 0..others.len() {
        expected.extend([
            Event::LivenessQuery,
            Event::Read(NpadId::Player1),
            Event::Sleep(Config::DEFAULT_POLL_INTERVAL),
        ]);
    }
    expected.push(Event::LivenessQuery);

    assert_eq!(loop_events, expected);
}

#[test]
fn exit_button_pressed_while_another_is_held() {
    let mock = Mock::new().with_snapshots([
        press(Button::A),
        KeyPad::from(Button::A) | KeyPad::from(Button::Plus),
    ]);

    let outcome = run(&mock);
    assert_eq!(outcome.reason, ExitReason::ExitButton);
    assert_eq!(outcome.iterations, 2);
}

#[test]
fn configured_exit_button_and_interval_are_used() {
    let interval = Timeout::from_milliseconds(16);
    let mock = Mock::new().with_snapshots([press(Button::Plus), KeyPad::empty(), press(Button::B)]);

    let config = Config::new()
        .with_exit_button(Button::B)
        .with_poll_interval(interval);
    let outcome = app::main_with(&mock, config);

    assert_eq!(outcome.iterations, 3);
    assert_eq!(mock.count(|e| *e == Event::Sleep(interval)), 2);
    assert!(mock
        .events()
        .contains(&Event::Shown("Press (B) to exit\n\n".to_owned())));
}

#[test]
fn prompt_is_shown_once_before_polling() {
    let mock = Mock::new().with_snapshots([press(Button::Plus)]);
    run(&mock);

    let events = mock.events();
    let shown: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Shown(_)))
        .map(|(i, _)| i)
        .collect();
    let first_query = events
        .iter()
        .position(|e| *e == Event::LivenessQuery)
        .unwrap();

    assert_eq!(shown.len(), 1);
    assert!(shown[0] < first_query);
    assert_eq!(events[shown[0]], Event::Shown("Press (+) to exit\n\n".to_owned()));
}

#[test]
fn app_ends_terminated() {
    let mock = Mock::new().with_snapshots([press(Button::Plus)]);
    let mut app = App::new(&mock, Config::default());

    assert_eq!(app.state(), State::NotStarted);
    assert_matches!(app.run(), Ok(Outcome { reason: ExitReason::ExitButton, .. }));
    assert_eq!(app.state(), State::Terminated);
}

fn startup_steps() -> Vec<Step> {
    let mut steps = vec![Step::LockExit];
    #[cfg(feature = "link")]
    steps.push(Step::InitLink);
    steps.extend([Step::InitConsole, Step::InitInput]);
    steps
}

fn acquired(events: &[Event]) -> Vec<Resource> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Acquire(r) => Some(*r),
            _ => None,
        })
        .collect()
}

fn released(events: &[Event]) -> Vec<Resource> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Release(r) => Some(*r),
            _ => None,
        })
        .collect()
}

#[test]
fn startup_failure_stops_before_the_loop() {
    for step in startup_steps() {
        let mock = Mock::new().failing_at(step);
        let mut app = App::new(&mock, Config::default());

        let fatal = app.run().unwrap_err();

        assert_eq!(fatal.step, step);
        assert_eq!(fatal.code, INJECTED);
        assert!(fatal.file.ends_with("app.rs"));
        assert_eq!(app.state(), State::Terminated);

        assert_eq!(mock.count(|e| matches!(e, Event::Shown(_))), 0, "{:?}", step);
        assert_eq!(mock.count(|e| *e == Event::LivenessQuery), 0, "{:?}", step);
        assert_eq!(mock.count(|e| matches!(e, Event::Read(_))), 0, "{:?}", step);

        // Nothing is handed back while the failure is still being reported.
        assert!(released(&mock.events()).is_empty(), "{:?}", step);

        drop(app);
        let events = mock.events();
        let mut expected = acquired(&events);
        expected.reverse();
        assert_eq!(released(&events), expected, "{:?}", step);
    }
}

#[test]
fn startup_failure_is_thrown_before_anything_is_released() {
    for step in startup_steps() {
        let mock = Mock::new().failing_at(step);

        let result = panic::catch_unwind(AssertUnwindSafe(|| run(&mock)));
        assert!(result.is_err(), "{:?} did not throw", step);

        let events = mock.events();
        let thrown = events
            .iter()
            .position(|e| *e == Event::Thrown(INJECTED.value()))
            .unwrap_or_else(|| panic!("{:?} was not thrown", step));

        assert!(released(&events[..thrown]).is_empty(), "{:?}", step);
        assert_eq!(mock.count(|e| matches!(e, Event::Shown(_))), 0);
    }
}

#[cfg(feature = "link")]
#[test]
fn missing_listener_keeps_output_local() {
    let mock = Mock::new()
        .without_listener()
        .with_snapshots([press(Button::Plus)]);

    let outcome = run(&mock);

    assert_eq!(outcome.reason, ExitReason::ExitButton);
    assert!(!acquired(&mock.events()).contains(&Resource::Redirect));
    assert_eq!(
        mock.resource_events().last(),
        Some(&Event::Release(Resource::ExitLock))
    );
}
