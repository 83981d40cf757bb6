//! This module contains macros to be used in the `telewire` crate.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attr;
mod open_type;


/// Implement `telewire::variant::OpenType` and `serde::Deserialize` for an enum
/// whose variants are the concrete records of an open type.
///
/// The discriminator field and the wire tags are read from the same
/// `#[serde(...)]` attributes that drive serde's internally tagged
/// `Serialize` implementation, so both directions always agree:
///
///  - `#[serde(tag = "...")]` on the enum names the discriminator field
///  - `#[serde(rename_all = "snake_case")]` derives tags from variant names
///  - `#[serde(rename = "...")]` on a variant overrides its tag
///
/// Variants need to be either unit variants or newtype variants wrapping a
/// record. Duplicate tags are rejected at compile time.
#[proc_macro_derive(OpenType, attributes(serde))]
pub fn derive_open_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    open_type::derive(&input).into()
}
