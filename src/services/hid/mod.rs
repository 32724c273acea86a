// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::result::Result;

use homebrew_shell_macros::EnumCast;

use log::trace;

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

/// Controller layouts a pad slot can be configured for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum NpadStyle {
    /// Full set of face, shoulder, stick and D-pad buttons, however the controller is held.
    Standard,
    /// A single sideways Joy-Con style controller.
    Single,
}

/// Logical controller slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum NpadId {
    Player1,
}

/// Buttons of the standard layout, valued by their bit index in a [`KeyPad`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum Button {
    A,
    B,
    X,
    Y,
    StickL,
    StickR,
    L,
    R,
    ZL,
    ZR,
    Plus,
    Minus,
    Left,
    Up,
    Right,
    Down,
}

impl Button {
    pub const ALL: [Button; 16] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::StickL,
        Button::StickR,
        Button::L,
        Button::R,
        Button::ZL,
        Button::ZR,
        Button::Plus,
        Button::Minus,
        Button::Left,
        Button::Up,
        Button::Right,
        Button::Down,
    ];

    pub const fn mask(&self) -> u32 {
        1 << self.to_value()
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::X => "X",
            Self::Y => "Y",
            Self::StickL => "STICK_L",
            Self::StickR => "STICK_R",
            Self::L => "L",
            Self::R => "R",
            Self::ZL => "ZL",
            Self::ZR => "ZR",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Left => "LEFT",
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Down => "DOWN",
        }
    }

    /// Label printed on the button itself.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            _ => self.name(),
        }
    }
}

/// Set of buttons, one bit per [`Button`].
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyPad(u32);

#[doc(hidden)]
macro_rules! _keypad_key {
    ($name: ident, $button: expr) => {
        #[inline]
        pub const fn $name(&self) -> bool {
            self.contains($button)
        }
    };
}

impl KeyPad {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.mask())
    }

    pub fn iter(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(move |button| self.contains(*button))
    }

    _keypad_key! {a, Button::A}
    _keypad_key! {b, Button::B}
    _keypad_key! {x, Button::X}
    _keypad_key! {y, Button::Y}
    _keypad_key! {l, Button::L}
    _keypad_key! {r, Button::R}
    _keypad_key! {zl, Button::ZL}
    _keypad_key! {zr, Button::ZR}
    _keypad_key! {plus, Button::Plus}
    _keypad_key! {minus, Button::Minus}
    _keypad_key! {left, Button::Left}
    _keypad_key! {up, Button::Up}
    _keypad_key! {right, Button::Right}
    _keypad_key! {down, Button::Down}
}

impl From<Button> for KeyPad {
    fn from(button: Button) -> Self {
        Self(button.mask())
    }
}

impl FromIterator<Button> for KeyPad {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl BitOr for KeyPad {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for KeyPad {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for KeyPad {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

struct DebugLiteral(&'static str);

impl fmt::Debug for DebugLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for KeyPad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|button| DebugLiteral(button.name())))
            .finish()
    }
}

/// Human interface device service.
pub trait Hid {
    type Input: Input;

    /// Configure `max_players` slots for `style` and start reading input.
    fn init_input(&self, max_players: usize, style: NpadStyle) -> Result<Self::Input>;
}

/// Raw access to configured controller slots.
pub trait Input {
    /// Buttons currently held on `id`. Unconnected slots read as empty.
    fn read(&mut self, id: NpadId) -> KeyPad;
}

/// One controller slot and the edges between its last two snapshots.
#[derive(Debug)]
pub struct Pad<I> {
    input: I,
    id: NpadId,
    previous: KeyPad,
    current: KeyPad,
}

impl<I: Input> Pad<I> {
    pub fn new(input: I, id: NpadId) -> Self {
        Self {
            input,
            id,
            previous: KeyPad::empty(),
            current: KeyPad::empty(),
        }
    }

    pub fn id(&self) -> NpadId {
        self.id
    }

    /// Take a new snapshot of the slot.
    pub fn update(&mut self) {
        self.previous = self.current;
        self.current = self.input.read(self.id);

        if self.current != self.previous {
            trace!("{:?}: {:?}", self.id, self.current);
        }
    }

    pub fn buttons_held(&self) -> KeyPad {
        self.current
    }

    /// Buttons that went from released to pressed in the last [`Pad::update`].
    pub fn buttons_down(&self) -> KeyPad {
        self.current & !self.previous
    }

    /// Buttons that went from pressed to released in the last [`Pad::update`].
    pub fn buttons_up(&self) -> KeyPad {
        self.previous & !self.current
    }
}
