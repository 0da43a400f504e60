//! Attribute parsing for the Model derive macro.
//!
//! Handles struct-level and field-level `#[sqlweave(...)]` attributes.

use syn::{DeriveInput, LitStr, Result};

/// Parsed field-level `#[sqlweave(...)]` options.
#[derive(Default)]
pub(super) struct FieldAttr {
    /// `primary_key` flag on a scalar field.
    pub primary_key: bool,
    /// `primary_key = "a, b"` on a nested field.
    pub key_fields: Option<Vec<String>>,
    pub column: Option<String>,
    pub alias: Option<String>,
    pub nested: bool,
    pub scalar: bool,
    pub skip: bool,
}

impl FieldAttr {
    fn merge(&mut self, other: FieldAttr) {
        self.primary_key |= other.primary_key;
        self.nested |= other.nested;
        self.scalar |= other.scalar;
        self.skip |= other.skip;
        if other.key_fields.is_some() {
            self.key_fields = other.key_fields;
        }
        if other.column.is_some() {
            self.column = other.column;
        }
        if other.alias.is_some() {
            self.alias = other.alias;
        }
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                let value: LitStr = input.parse()?;
                match ident.to_string().as_str() {
                    "column" => attr.column = Some(non_empty(&value)?),
                    "alias" => attr.alias = Some(non_empty(&value)?),
                    "primary_key" => {
                        let fields: Vec<String> = value
                            .value()
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect();
                        if fields.is_empty() {
                            return Err(syn::Error::new_spanned(
                                &value,
                                "primary_key list must name at least one field",
                            ));
                        }
                        attr.key_fields = Some(fields);
                    }
                    other => {
                        return Err(syn::Error::new_spanned(
                            &ident,
                            format!("unknown sqlweave attribute `{other} = ...`"),
                        ));
                    }
                }
            } else {
                match ident.to_string().as_str() {
                    "primary_key" => attr.primary_key = true,
                    "nested" => attr.nested = true,
                    "scalar" => attr.scalar = true,
                    "skip" => attr.skip = true,
                    other => {
                        return Err(syn::Error::new_spanned(
                            &ident,
                            format!("unknown sqlweave attribute `{other}`"),
                        ));
                    }
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

fn non_empty(value: &LitStr) -> Result<String> {
    let s = value.value();
    if s.trim().is_empty() {
        return Err(syn::Error::new_spanned(value, "value must not be empty"));
    }
    Ok(s)
}

/// Collect every `#[sqlweave(...)]` on a field.
pub(super) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if attr.path().is_ident("sqlweave") {
            merged.merge(attr.parse_args::<FieldAttr>()?);
        }
    }

    if merged.nested && merged.scalar {
        return Err(syn::Error::new_spanned(
            field,
            "a field cannot be both `nested` and `scalar`",
        ));
    }
    Ok(merged)
}

/// Table name from struct-level `#[sqlweave(table = "...")]`, if any.
pub(super) fn table_name(input: &DeriveInput) -> Result<Option<String>> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("sqlweave") {
            continue;
        }
        let nested = attr.parse_args::<syn::MetaNameValue>()?;
        if !nested.path.is_ident("table") {
            return Err(syn::Error::new_spanned(
                &nested.path,
                "expected #[sqlweave(table = \"...\")]",
            ));
        }
        match &nested.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => table = Some(non_empty(lit)?),
            other => {
                return Err(syn::Error::new_spanned(other, "table must be a string literal"));
            }
        }
    }
    Ok(table)
}
