// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform result codes.
//!
//! Every call into the platform reports a 32-bit result word laid out as
//!
//! ```text
//! 31..27  level
//! 26..21  summary
//! 17..10  module
//!  9..0   description
//! ```
//!
//! A word of `0` means success.

use core::fmt;
use core::num::NonZeroU32;

use homebrew_shell_macros::EnumCast;

pub type Result<T> = core::result::Result<T, ErrorCode>;

#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
#[must_use = "result codes must be checked for failure"]
pub struct ResultCode(u32);

impl ResultCode {
    pub const fn new(level: Level, summary: Summary, module: Module, description: u32) -> Self {
        let level: u32 = level.to_value();
        let summary: u32 = summary.to_value();
        let module: u8 = module.to_value();
        Self(level << 27 | summary << 21 | (module as u32) << 10 | (description & 0b11_1111_1111))
    }

    pub const fn success() -> Self {
        Self(0)
    }

    pub fn into_result(self) -> Result<()> {
        match NonZeroU32::new(self.0) {
            None => Ok(()),
            Some(ec) => Err(ErrorCode(ec)),
        }
    }
}

impl From<u32> for ResultCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl From<ErrorCode> for ResultCode {
    fn from(ec: ErrorCode) -> Self {
        Self(ec.0.into())
    }
}

impl<T> From<Result<T>> for ResultCode {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(ec) => ec.into(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
#[must_use = "error codes indicate failure that must be dealt with"]
pub struct ErrorCode(NonZeroU32);

impl ErrorCode {
    pub const fn new(level: Level, summary: Summary, module: Module, description: u32) -> Self {
        let result = ResultCode::new(level, summary, module, description);

        match NonZeroU32::new(result.0) {
            Some(ec) => Self(ec),
            None => panic!("Cannot construct an ErrorCode that is a success in disguise"),
        }
    }

    /// Raw fields of the code, the way a failed call is reported on the console.
    pub fn diagnostic(self) -> Diagnostic {
        Diagnostic(self.value())
    }
}

/// Displays as `0x<code> mod: <module> desc: <description> val: <module and description>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Diagnostic(u32);

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "0x{:X} mod: {} desc: {} val: {}",
            self.0,
            (self.0 >> 10) & 0b1111_1111,
            self.0 & 0b11_1111_1111,
            self.0 & 0b11_1111_1111_1111_1111,
        )
    }
}

pub trait ResultValue {
    fn value(&self) -> u32;

    fn is_err(&self) -> bool {
        self.value() != 0
    }

    fn is_ok(&self) -> bool {
        !self.is_err()
    }

    fn level(&self) -> core::result::Result<Level, u32> {
        Level::from_value((self.value() >> 27) & 0b1_1111)
    }

    fn summary(&self) -> core::result::Result<Summary, u32> {
        Summary::from_value((self.value() >> 21) & 0b11_1111)
    }

    fn module(&self) -> core::result::Result<Module, u8> {
        Module::from_value(((self.value() >> 10) & 0b1111_1111) as u8)
    }

    fn description(&self) -> core::result::Result<CommonDescription, u32> {
        CommonDescription::from_value(self.value() & 0b11_1111_1111)
    }
}

impl ResultValue for ResultCode {
    fn value(&self) -> u32 {
        self.0
    }
}

impl ResultValue for ErrorCode {
    fn value(&self) -> u32 {
        self.0.into()
    }

    fn is_err(&self) -> bool {
        true
    }
}

macro_rules! result_value_fmt {
    (@ match $field:expr) => {
        match $field {
            Ok(ref known) => known as &dyn fmt::Debug,
            Err(ref unknown) => unknown as &dyn fmt::Debug,
        }
    };
    ($rv_type: ty) => {
        impl fmt::Debug for $rv_type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                if self.is_err() {
                    f.debug_struct(stringify!($rv_type))
                        .field("value", &format_args!("{:#010x}", self.value()))
                        .field("level", result_value_fmt!(@ match self.level()))
                        .field("module", result_value_fmt!(@ match self.module()))
                        .field("summary", result_value_fmt!(@ match self.summary()))
                        .field("description", result_value_fmt!(@ match self.description()))
                        .finish()
                } else {
                    f.debug_struct(stringify!($rv_type))
                        .field("value", &self.value())
                        .finish()
                }
            }
        }

        impl fmt::Display for $rv_type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{:#010X}", self.value())
            }
        }
    };
}

result_value_fmt!(ResultCode);
result_value_fmt!(ErrorCode);

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum Level {
    Success,
    Info,
    Status = 25,
    Temporary,
    Permanent,
    Usage,
    Reinitialize,
    Reset,
    Fatal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum Summary {
    Success,
    Nop,
    WouldBlock,
    OutOfResource,
    NotFound,
    InvalidState,
    NotSupported,
    InvalidArgument,
    WrongArgument,
    Canceled,
    StatusChanged,
    Internal,
    InvalidResultValue = 63,
}

/// System modules this application talks to. Unlisted modules decode as raw values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u8")]
pub enum Module {
    Common,
    Kernel,
    Os = 6,
    Gsp = 10,
    Hid = 19,
    Srv = 25,
    Soc = 28,
    Applet = 51,
    Application = 254,
    Invalid = 255,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCast)]
#[enum_cast(value_type = "u32")]
pub enum CommonDescription {
    Success = 0,
    InvalidSection = 1000,
    TooLarge = 1001,
    NotAuthorized = 1002,
    AlreadyDone = 1003,
    InvalidSize = 1004,
    InvalidEnumValue = 1005,
    InvalidCombination = 1006,
    NoData = 1007,
    Busy = 1008,
    MisalignedAddress = 1009,
    MisalignedSize = 1010,
    OutOfMemory = 1011,
    NotImplemented = 1012,
    InvalidAddress = 1013,
    InvalidPointer = 1014,
    InvalidHandle = 1015,
    NotInitialized = 1016,
    AlreadyInitialized = 1017,
    NotFound = 1018,
    CancelRequested = 1019,
    AlreadyExists = 1020,
    OutOfRange = 1021,
    Timeout = 1022,
    InvalidResultValue = 1023,
}

#[cfg(test)]
pub(crate) const ERROR_NOT_FOUND: ErrorCode = ErrorCode::new(
    Level::Permanent,
    Summary::NotFound,
    Module::Application,
    CommonDescription::NotFound.to_value(),
);

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::format;

    #[test]
    fn success_is_zero() {
        assert_eq!(ResultCode::success().value(), 0);
        assert!(ResultCode::success().is_ok());
        assert_eq!(ResultCode::success().into_result(), Ok(()));
    }

    #[test]
    fn fields_pack_into_their_bit_ranges() {
        let code = ResultCode::new(
            Level::Permanent,
            Summary::NotFound,
            Module::Hid,
            CommonDescription::NotFound.to_value(),
        );

        assert_eq!(code.value(), 27 << 27 | 4 << 21 | 19 << 10 | 1018);
        assert_eq!(code.level(), Ok(Level::Permanent));
        assert_eq!(code.summary(), Ok(Summary::NotFound));
        assert_eq!(code.module(), Ok(Module::Hid));
        assert_eq!(code.description(), Ok(CommonDescription::NotFound));
    }

    #[test]
    fn unknown_fields_decode_as_raw_values() {
        let code = ResultCode::from(3u32 << 10 | 7);

        assert_eq!(code.module(), Err(3));
        assert_eq!(code.description(), Err(7));
        assert_eq!(code.level(), Ok(Level::Success));
    }

    #[test]
    fn non_zero_code_becomes_error() {
        let code = ResultCode::from(ERROR_NOT_FOUND);

        assert_eq!(code.into_result(), Err(ERROR_NOT_FOUND));
    }

    #[test]
    fn result_converts_back_to_code() {
        let ok: Result<u8> = Ok(1);
        let err: Result<u8> = Err(ERROR_NOT_FOUND);

        assert_eq!(ResultCode::from(ok), ResultCode::success());
        assert_eq!(ResultCode::from(err).value(), ERROR_NOT_FOUND.value());
    }

    #[test]
    fn display_is_padded_hex() {
        let code = ResultCode::from(0xD8E0_07F7u32);
        assert_eq!(format!("{}", code), "0xD8E007F7");
    }

    #[test]
    fn diagnostic_lists_raw_fields() {
        let code = ErrorCode::new(Level::Permanent, Summary::NotFound, Module::Hid, 1018);

        assert_eq!(
            format!("{}", code.diagnostic()),
            format!("0x{:X} mod: 19 desc: 1018 val: {}", code.value(), 19 << 10 | 1018)
        );
    }

    #[test]
    fn debug_names_decoded_fields() {
        let debug = format!("{:?}", ERROR_NOT_FOUND);

        assert!(debug.contains("Permanent"));
        assert!(debug.contains("Application"));
        assert!(debug.contains("NotFound"));
    }

    #[test]
    fn enum_cast_converts_both_ways() {
        assert_eq!(u8::from(Module::Applet), 51);
        assert_eq!(Module::try_from(254u8), Ok(Module::Application));
        assert_eq!(Level::try_from(26u32), Ok(Level::Temporary));
        assert_eq!(Summary::try_from(40u32), Err(40));
    }
}
