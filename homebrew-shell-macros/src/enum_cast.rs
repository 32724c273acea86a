// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, LitInt, Meta, MetaNameValue,
    NestedMeta, Path, Type, Variant,
};
use syn::{Error, Result};

#[cfg_attr(test, derive(Debug))]
struct ValuedVariant {
    variant: Variant,
    value: LitInt,
}

#[cfg_attr(test, derive(Debug))]
pub struct EnumCast {
    ident: Ident,
    variants: Vec<ValuedVariant>,
    value_type: Type,
}

impl EnumCast {
    pub fn new(derive_input: DeriveInput) -> Result<Self> {
        let enum_input = match derive_input.data {
            Data::Enum(enum_input) => enum_input,
            _ => {
                return Err(Error::new(
                    derive_input.ident.span(),
                    "EnumCast can only be used on enums",
                ))
            }
        };

        let value_type = Self::parse_value_type(&derive_input.attrs)?;

        let mut variants = Vec::with_capacity(enum_input.variants.len());
        let mut next_value: u64 = 0;

        for variant in enum_input.variants {
            let variant = Self::parse_variant(variant)?;
            let value = match Self::parse_variant_expr(&variant)? {
                Some(value) => {
                    next_value = value.base10_parse()?;
                    value
                }
                None => LitInt::new(&next_value.to_string(), variant.span()),
            };

            variants.push(ValuedVariant { variant, value });
            next_value += 1;
        }

        Ok(Self {
            ident: derive_input.ident,
            variants,
            value_type,
        })
    }

    fn parse_value_type(attributes: &[Attribute]) -> Result<Type> {
        for attr in attributes.iter().filter(|attr| attr.path.is_ident("enum_cast")) {
            let meta = match attr.parse_meta()? {
                Meta::List(meta) => meta,
                other => {
                    return Err(Error::new(
                        other.span(),
                        "expected `#[enum_cast(value_type = \"...\")]`",
                    ))
                }
            };

            for nested in meta.nested {
                match nested {
                    NestedMeta::Meta(Meta::NameValue(MetaNameValue {
                        path,
                        lit: Lit::Str(type_lit),
                        ..
                    })) if path.is_ident("value_type") => return type_lit.parse(),
                    other => {
                        return Err(Error::new(
                            other.span(),
                            "unknown `enum_cast` argument, expected `value_type`",
                        ))
                    }
                }
            }
        }

        Ok(syn::parse_quote!(u32))
    }

    fn parse_variant(variant: Variant) -> Result<Variant> {
        if let Fields::Unit = variant.fields {
            Ok(variant)
        } else {
            Err(Error::new(
                variant.fields.span(),
                "EnumCast can only be used on enums with field-less variants",
            ))
        }
    }

    fn parse_variant_expr(variant: &Variant) -> Result<Option<LitInt>> {
        match &variant.discriminant {
            None => Ok(None),
            Some((
                _,
                Expr::Lit(ExprLit {
                    lit: Lit::Int(lit), ..
                }),
            )) => Ok(Some(lit.clone())),
            Some((_, expr)) => Err(Error::new(
                expr.span(),
                "EnumCast variant can only be assigned integer literals",
            )),
        }
    }

    fn idents_and_values(&self) -> (Vec<&Ident>, Vec<&LitInt>) {
        self.variants
            .iter()
            .map(|v| (&v.variant.ident, &v.value))
            .unzip()
    }

    fn emit_from_value(&self) -> TokenStream {
        let value_type = &self.value_type;
        let (variant_idents, values) = self.idents_and_values();

        let result_type: Path = syn::parse_quote!(::core::result::Result);

        quote! {
            pub const fn from_value(value: #value_type) -> #result_type<Self, #value_type> {
                match value {
                    #(#values => #result_type::Ok(Self::#variant_idents),)*
                    unmatched => #result_type::Err(unmatched),
                }
            }
        }
    }

    fn emit_to_value(&self) -> TokenStream {
        let value_type = &self.value_type;
        let (variant_idents, values) = self.idents_and_values();

        quote! {
            pub const fn to_value(&self) -> #value_type {
                match self {
                    #(Self::#variant_idents => #values,)*
                }
            }
        }
    }

    fn emit_conversions(&self) -> TokenStream {
        let ident = &self.ident;
        let value_type = &self.value_type;

        quote! {
            impl ::core::convert::From<#ident> for #value_type {
                #[inline]
                fn from(value: #ident) -> Self {
                    value.to_value()
                }
            }

            impl ::core::convert::TryFrom<#value_type> for #ident {
                type Error = #value_type;

                #[inline]
                fn try_from(value: #value_type) -> ::core::result::Result<Self, Self::Error> {
                    Self::from_value(value)
                }
            }
        }
    }

    pub fn emit(&self) -> TokenStream {
        let ident = &self.ident;
        let from_value = self.emit_from_value();
        let to_value = self.emit_to_value();
        let conversions = self.emit_conversions();

        quote! {
            impl #ident {
                #from_value

                #to_value
            }

            #conversions
        }
    }
}

impl Parse for EnumCast {
    fn parse(input: ParseStream) -> Result<Self> {
        let input = DeriveInput::parse(input)?;
        Self::new(input)
    }
}
