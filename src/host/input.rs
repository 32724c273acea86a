// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::io_error_code;
use crate::result::{CommonDescription, ErrorCode, Level, Module, Result, Summary};
use crate::services::hid::{Button, Input, KeyPad, NpadId, NpadStyle};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ERROR_STYLE_NOT_SUPPORTED: ErrorCode = ErrorCode::new(
    Level::Usage,
    Summary::NotSupported,
    Module::Hid,
    CommonDescription::InvalidEnumValue.to_value(),
);

/// Keyboard layout of the host controller.
pub fn button_for_key(code: KeyCode) -> Option<Button> {
    let button = match code {
        KeyCode::Char('a') => Button::A,
        KeyCode::Char('b') => Button::B,
        KeyCode::Char('x') => Button::X,
        KeyCode::Char('y') => Button::Y,
        KeyCode::Char('l') => Button::L,
        KeyCode::Char('r') => Button::R,
        KeyCode::Char('z') => Button::ZL,
        KeyCode::Char('c') => Button::ZR,
        KeyCode::Char('q') => Button::StickL,
        KeyCode::Char('e') => Button::StickR,
        KeyCode::Char('+') | KeyCode::Enter => Button::Plus,
        KeyCode::Char('-') | KeyCode::Backspace => Button::Minus,
        KeyCode::Left => Button::Left,
        KeyCode::Up => Button::Up,
        KeyCode::Right => Button::Right,
        KeyCode::Down => Button::Down,
        _ => return None,
    };

    Some(button)
}

fn is_home_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Player one on the keyboard.
///
/// A terminal only reports key presses, so every press reads as held for exactly one
/// [`Input::read`]. Esc and Ctrl-C stand in for the home button.
#[derive(Debug)]
pub struct HostInput {
    players: usize,
    exit_requested: Arc<AtomicBool>,
}

impl HostInput {
    pub(super) fn init(
        max_players: usize,
        style: NpadStyle,
        exit_requested: Arc<AtomicBool>,
    ) -> Result<Self> {
        if style != NpadStyle::Standard {
            return Err(ERROR_STYLE_NOT_SUPPORTED);
        }

        terminal::enable_raw_mode().map_err(|err| io_error_code(Module::Hid, &err))?;
        debug!("Keyboard input enabled for {} player(s)", max_players);

        Ok(Self {
            players: max_players,
            exit_requested,
        })
    }

    fn drain_events(&self) -> KeyPad {
        let mut keys = KeyPad::empty();

        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    warn!("Polling terminal events failed: {}", err);
                    break;
                }
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if is_home_key(&key) {
                        self.exit_requested.store(true, Ordering::Release);
                    } else if let Some(button) = button_for_key(key.code) {
                        keys = keys.with(button);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Reading terminal event failed: {}", err);
                    break;
                }
            }
        }

        keys
    }
}

impl Input for HostInput {
    fn read(&mut self, id: NpadId) -> KeyPad {
        match id {
            NpadId::Player1 if self.players > 0 => self.drain_events(),
            _ => KeyPad::empty(),
        }
    }
}

impl Drop for HostInput {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal: {}", err);
        }
    }
}
