// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fatal error reports, handed to the system's error display before the process dies.

use crate::error::Fatal;
use crate::result::{ErrorCode, ResultCode};

use homebrew_shell_macros::EnumCast;

use core::fmt::{self, Write};

const MESSAGE_SIZE: usize = 0x60;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u8")]
pub enum ErrorType {
    Generic,
    Failure = 4,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    type_: ErrorType,
    result_code: ResultCode,
    file: &'static str,
    line: u32,
    failure_message: [u8; MESSAGE_SIZE],
}

impl ErrorInfo {
    const fn zeroed() -> Self {
        Self {
            type_: ErrorType::Generic,
            result_code: ResultCode::success(),
            file: "",
            line: 0,
            failure_message: [0; MESSAGE_SIZE],
        }
    }

    pub fn from_result_code_with_message(result_code: ErrorCode, message: fmt::Arguments) -> Self {
        let mut info = Self {
            type_: ErrorType::Failure,
            result_code: result_code.into(),
            ..Self::zeroed()
        };

        let mut writer = MessageWriter {
            buffer: &mut info.failure_message,
            len: 0,
        };
        let _ = writer.write_fmt(message);

        info
    }

    pub fn from_fatal(fatal: &Fatal) -> Self {
        Self {
            file: fatal.file,
            line: fatal.line,
            ..Self::from_result_code_with_message(
                fatal.code,
                format_args!("{} failed at {}:{}", fatal.step, fatal.file, fatal.line),
            )
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.type_
    }

    pub fn result_code(&self) -> ResultCode {
        self.result_code
    }

    pub fn location(&self) -> Option<(&'static str, u32)> {
        match self.file {
            "" => None,
            file => Some((file, self.line)),
        }
    }

    pub fn message(&self) -> &str {
        let len = self
            .failure_message
            .iter()
            .position(|&b| b == b'\0')
            .unwrap_or(MESSAGE_SIZE);

        // Only ever filled by `MessageWriter`, which keeps whole characters.
        core::str::from_utf8(&self.failure_message[..len]).unwrap_or_default()
    }
}

impl fmt::Debug for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorInfo")
            .field("type", &self.type_)
            .field("result_code", &self.result_code)
            .field("location", &self.location())
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fatal error {}", self.result_code)?;
        match self.message() {
            "" => Ok(()),
            message => write!(f, ": {}", message),
        }
    }
}

/// Writes into a message buffer, leaving room for the terminating nul and never splitting
/// a character.
struct MessageWriter<'b> {
    buffer: &'b mut [u8; MESSAGE_SIZE],
    len: usize,
}

impl fmt::Write for MessageWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MESSAGE_SIZE - 1 - self.len;

        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }

        self.buffer[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;

        if take < s.len() {
            Err(fmt::Error)
        } else {
            Ok(())
        }
    }
}

/// The system's fatal error facility.
pub trait ErrF {
    /// Report `error` and terminate the process. Does not return.
    fn throw(&self, error: &ErrorInfo) -> !;
}
