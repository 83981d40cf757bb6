use std::collections::HashSet;

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Error, Fields, Result, Variant};

use crate::attr;


/// control whether we want to have debugging information for the macro when compiling
const DEBUG: bool = false;

macro_rules! debug {
    ( $($elem:expr),* ) => { if DEBUG { eprintln!( $($elem),* ); } }
}


// =============================================================================
//
//     `OpenType`
//
// =============================================================================

pub fn derive(input: &DeriveInput) -> TokenStream {
    match try_expand(input) {
        Ok(expanded) => expanded,
        Err(error) => error.to_compile_error(),
    }
}

fn try_expand(input: &DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Enum(enumeration) => derive_open_type(input, enumeration),
        _ => Err(Error::new(
            Span::call_site(),
            "OpenType can only be derived for enums",
        )),
    }
}

fn is_newtype_variant(variant: &&Variant) -> bool {
    matches!(variant.fields, Fields::Unnamed(ref f) if f.unnamed.len() == 1)
}

fn is_unit_variant(variant: &&Variant) -> bool {
    matches!(variant.fields, Fields::Unit)
}

fn derive_open_type(input: &DeriveInput, enumeration: &DataEnum) -> Result<TokenStream> {
    if input.generics.lt_token.is_some() || input.generics.where_clause.is_some() {
        return Err(Error::new(
            Span::call_site(),
            "Enums with generics are not supported",
        ));
    }

    let ident = &input.ident;
    let ident_str = ident.to_string();

    let container = attr::container_attrs(&input.attrs)?;
    let discriminator = container.tag.ok_or_else(|| Error::new(
        Span::call_site(),
        "an open type needs a discriminator: add #[serde(tag = \"...\")]",
    ))?;
    let rename_all = container.rename_all.as_deref();

    for variant in &enumeration.variants {
        if !is_newtype_variant(&variant) && !is_unit_variant(&variant) {
            return Err(Error::new_spanned(
                variant,
                "Invalid variant: only unit variants or variants with 1 field are supported",
            ));
        }
    }
    if enumeration.variants.is_empty() {
        return Err(Error::new(Span::call_site(), "an open type needs at least one variant"));
    }

    // tags need to be unique within a registry
    let mut seen = HashSet::new();
    for variant in &enumeration.variants {
        let tag = attr::tag_of_variant(variant, rename_all)?;
        if !seen.insert(tag.clone()) {
            return Err(Error::new_spanned(
                variant,
                format!("duplicate tag \"{tag}\" in open type {ident_str}"),
            ));
        }
    }

    let var_idents: Vec<_> = enumeration.variants.iter()
        .filter(is_newtype_variant)
        .map(|v| &v.ident)
        .collect();
    let var_types: Vec<_> = enumeration.variants.iter()
        .filter(is_newtype_variant)
        .map(|v| match v.fields {
            Fields::Unnamed(ref f) => &f.unnamed[0].ty,
            _ => unreachable!(),
        })
        .collect();
    let names = enumeration.variants.iter()
        .filter(is_newtype_variant)
        .map(|v| attr::tag_of_variant(v, rename_all))
        .collect::<Result<Vec<_>>>()?;

    let unit_idents: Vec<_> = enumeration.variants.iter()
        .filter(is_unit_variant)
        .map(|v| &v.ident)
        .collect();
    let unit_names = enumeration.variants.iter()
        .filter(is_unit_variant)
        .map(|v| attr::tag_of_variant(v, rename_all))
        .collect::<Result<Vec<_>>>()?;

    let all_names = enumeration.variants.iter()
        .map(|v| attr::tag_of_variant(v, rename_all))
        .collect::<Result<Vec<_>>>()?;

    debug!("open type: {} (discriminator: {})", &ident_str, &discriminator);
    debug!("variant idents: {:?}", &var_idents);
    debug!("variant tags: {:?}", &all_names);

    Ok(quote! {
        #[doc(hidden)]
        const _: () = {
            impl telewire::variant::OpenType for #ident {
                const NAME: &'static str = #ident_str;
                const DISCRIMINATOR: &'static str = #discriminator;
                const TAGS: &'static [&'static str] = &[ #( #all_names ),* ];

                #[allow(unused_variables)]
                fn from_tagged(
                    tag: &telewire::JsonValue,
                    fields: telewire::JsonMap,
                ) -> ::core::result::Result<Self, telewire::variant::VariantError> {
                    let tag = telewire::variant::tag_str::<Self>(tag)?;
                    ::core::result::Result::Ok(match tag {
                        #(
                            #names => #ident::#var_idents(
                                telewire::variant::decode_fields::<Self, #var_types>(#names, fields)?
                            ),
                        )*
                        #(
                            #unit_names => #ident::#unit_idents,
                        )*
                        other => return telewire::variant::unknown_tag::<Self>(other),
                    })
                }

                fn discriminator(&self) -> telewire::JsonValue {
                    let tag: &'static str = match *self {
                        #( #ident::#var_idents(_) => #names, )*
                        #( #ident::#unit_idents => #unit_names, )*
                    };
                    telewire::JsonValue::from(tag)
                }
            }

            impl<'de> telewire::__serde::Deserialize<'de> for #ident {
                fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: telewire::__serde::Deserializer<'de>,
                {
                    telewire::variant::deserialize(deserializer)
                }
            }
        };
    })
}
