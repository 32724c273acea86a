// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod enum_cast;

use crate::enum_cast::EnumCast;

use syn::parse_macro_input;

/// Derive `const fn to_value`/`from_value` plus `From`/`TryFrom` conversions between a
/// field-less enum and its integer representation.
///
/// The representation defaults to `u32` and is chosen with
/// `#[enum_cast(value_type = "u8")]`.
#[proc_macro_derive(EnumCast, attributes(enum_cast))]
pub fn enum_cast_impl(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let enum_cast = parse_macro_input!(tokens as EnumCast);
    enum_cast.emit().into()
}
