use heck::ToSnakeCase;
use proc_macro2::Ident;
use syn::{Attribute, Error, LitStr, Result, Variant, meta::ParseNestedMeta};

/// Container-level `#[serde(...)]` settings relevant to an open type.
#[derive(Default)]
pub struct ContainerAttrs {
    pub tag: Option<String>,
    pub rename_all: Option<String>,
}

/// Skip over a serde setting we don't care about, whatever its shape.
fn skip_meta(meta: &ParseNestedMeta) -> Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    }
    else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}

pub fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let s: LitStr = meta.value()?.parse()?;
                result.tag = Some(s.value());
            }
            else if meta.path.is_ident("rename_all") {
                let s: LitStr = meta.value()?.parse()?;
                result.rename_all = Some(s.value());
            }
            else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Find the value of a #[serde(rename = "...")] attribute.
fn attr_rename(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut rename = None;

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let s: LitStr = meta.value()?.parse()?;
                if rename.is_some() {
                    return Err(meta.error("duplicate rename attribute"));
                }
                rename = Some(s.value());
                Ok(())
            } else {
                skip_meta(&meta)
            }
        })?;
    }

    Ok(rename)
}

/// Determine the wire tag of a variant, respecting a rename attribute.
///
/// Without a rename, the tag follows serde's `rename_all` rule, which must be
/// either absent (tag is the variant name) or `"snake_case"`.
pub fn tag_of_variant(var: &Variant, rename_all: Option<&str>) -> Result<String> {
    if let Some(rename) = attr_rename(&var.attrs)? {
        return Ok(rename);
    }

    let name = unraw(&var.ident);
    match rename_all {
        None => Ok(name),
        Some("snake_case") => {
            // heck and serde disagree on acronyms and digits, refuse to guess
            let ambiguous = name.as_bytes().windows(2)
                .any(|w| w[0].is_ascii_uppercase() && w[1].is_ascii_uppercase())
                || name.bytes().any(|c| c.is_ascii_digit());
            if ambiguous {
                return Err(Error::new_spanned(
                    var,
                    "variant name needs an explicit #[serde(rename = \"...\")]",
                ));
            }
            Ok(name.to_snake_case())
        },
        Some(other) => Err(Error::new_spanned(
            var,
            format!("unsupported rename_all rule for an open type: \"{other}\""),
        )),
    }
}

fn unraw(ident: &Ident) -> String {
    ident.to_string().trim_start_matches("r#").to_owned()
}
