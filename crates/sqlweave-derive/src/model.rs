//! `#[derive(Model)]` expansion.
//!
//! Emits an `impl sqlweave::hydrate::Model` whose descriptor is a `static`
//! built from the struct's fields.

mod attrs;

use crate::common::syn_types::{collected_scalar, is_scalar, option_inner, vec_inner};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

enum Shape<'a> {
    Scalar {
        primary_key: bool,
        collect: bool,
    },
    Nested {
        inner: &'a syn::Type,
        cardinality: TokenStream,
        variant: TokenStream,
    },
}

struct ModelField<'a> {
    ident: &'a syn::Ident,
    attr: attrs::FieldAttr,
    shape: Shape<'a>,
}

fn classify<'a>(field: &'a syn::Field, attr: &attrs::FieldAttr) -> Result<Shape<'a>> {
    let ty = &field.ty;
    let wants_nested = attr.nested || attr.alias.is_some() || attr.key_fields.is_some();

    let scalar_type = is_scalar(ty) || collected_scalar(ty).is_some();

    if attr.scalar || (!wants_nested && scalar_type) {
        if attr.alias.is_some() || attr.key_fields.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "`alias` and `primary_key = \"...\"` only apply to nested fields",
            ));
        }
        return Ok(Shape::Scalar {
            primary_key: attr.primary_key,
            collect: collected_scalar(ty).is_some(),
        });
    }

    if attr.primary_key {
        return Err(syn::Error::new_spanned(
            field,
            "nested fields take `primary_key = \"field, ...\"` instead of a flag",
        ));
    }
    if attr.column.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "`column` only applies to scalar fields; use `alias` on nested fields",
        ));
    }

    let shape = if let Some(inner) = option_inner(ty) {
        Shape::Nested {
            inner,
            cardinality: quote!(::sqlweave::hydrate::Cardinality::Optional),
            variant: quote!(Optional),
        }
    } else if let Some(inner) = vec_inner(ty) {
        Shape::Nested {
            inner,
            cardinality: quote!(::sqlweave::hydrate::Cardinality::Many),
            variant: quote!(Many),
        }
    } else {
        Shape::Nested {
            inner: ty,
            cardinality: quote!(::sqlweave::hydrate::Cardinality::One),
            variant: quote!(One),
        }
    };
    Ok(shape)
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(s) => quote!(::core::option::Option::Some(#s)),
        None => quote!(::core::option::Option::None),
    }
}

/// Column name used by INSERT / UPDATE: the field part of a column override.
fn write_column(field: &ModelField<'_>) -> String {
    match field.attr.column.as_deref() {
        Some(column) => column.rsplit('.').next().unwrap_or(column).to_string(),
        None => field.ident.to_string(),
    }
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let table = option_str(attrs::table_name(&input)?.as_deref());
    let type_name = name.to_string().to_snake_case();

    let mut fields = Vec::new();
    for field in named {
        let attr = attrs::field_attr(field)?;
        if attr.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let shape = classify(field, &attr)?;
        fields.push(ModelField { ident, attr, shape });
    }

    let mut descs = Vec::new();
    let mut scalar_arms = Vec::new();
    let mut nested_arms = Vec::new();
    let mut values = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field.ident;
        let field_name = ident.to_string();
        let column = option_str(field.attr.column.as_deref());

        match &field.shape {
            Shape::Scalar {
                primary_key,
                collect,
            } => {
                descs.push(quote! {
                    ::sqlweave::hydrate::FieldDesc {
                        name: #field_name,
                        column: #column,
                        kind: ::sqlweave::hydrate::FieldKind::Scalar {
                            primary_key: #primary_key,
                            collect: #collect,
                        },
                    }
                });
                if *collect {
                    scalar_arms.push(quote! {
                        #index => ::sqlweave::hydrate::collect_scalar(&mut self.#ident, value),
                    });
                } else {
                    scalar_arms.push(quote! {
                        #index => ::sqlweave::hydrate::assign_scalar(&mut self.#ident, value),
                    });
                    let write_name = write_column(field);
                    values.push(quote! {
                        (#write_name, ::sqlweave::Value::from(::core::clone::Clone::clone(&self.#ident)))
                    });
                }
            }
            Shape::Nested {
                inner,
                cardinality,
                variant,
            } => {
                let alias = option_str(field.attr.alias.as_deref());
                let key_fields = match &field.attr.key_fields {
                    Some(keys) => quote!(::core::option::Option::Some(&[#(#keys),*])),
                    None => quote!(::core::option::Option::None),
                };
                descs.push(quote! {
                    ::sqlweave::hydrate::FieldDesc {
                        name: #field_name,
                        column: ::core::option::Option::None,
                        kind: ::sqlweave::hydrate::FieldKind::Nested {
                            model: <#inner as ::sqlweave::hydrate::Model>::descriptor,
                            cardinality: #cardinality,
                            alias: #alias,
                            primary_key: #key_fields,
                        },
                    }
                });
                nested_arms.push(quote! {
                    #index => ::core::option::Option::Some(
                        ::sqlweave::hydrate::Nested::#variant(&mut self.#ident)
                    ),
                });
            }
        }
    }

    Ok(quote! {
        impl ::sqlweave::hydrate::Model for #name {
            fn descriptor() -> &'static ::sqlweave::hydrate::ModelDesc {
                static DESC: ::sqlweave::hydrate::ModelDesc = ::sqlweave::hydrate::ModelDesc {
                    type_name: #type_name,
                    table: #table,
                    fields: &[#(#descs),*],
                };
                &DESC
            }

            fn set_scalar(
                &mut self,
                field: usize,
                value: ::sqlweave::Value,
            ) -> ::core::result::Result<(), ::sqlweave::hydrate::ConvertError> {
                match field {
                    #(#scalar_arms)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Err(::sqlweave::hydrate::ConvertError::new(
                            ::std::format!(
                                "{} has no scalar field at position {}",
                                ::core::stringify!(#name),
                                field
                            ),
                        ))
                    }
                }
            }

            fn nested(
                &mut self,
                field: usize,
            ) -> ::core::option::Option<::sqlweave::hydrate::Nested<'_>> {
                match field {
                    #(#nested_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn column_values(&self) -> ::std::vec::Vec<(&'static str, ::sqlweave::Value)> {
                ::std::vec![#(#values),*]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expanded(input: DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn snake_cases_the_type_name() {
        let out = expanded(parse_quote! {
            struct AlbumTrack {
                #[sqlweave(primary_key)]
                track_id: i64,
            }
        });
        assert!(out.contains("type_name : \"album_track\""), "{out}");
        assert!(out.contains("primary_key : true"), "{out}");
    }

    #[test]
    fn detects_cardinalities() {
        let out = expanded(parse_quote! {
            struct Employee {
                #[sqlweave(primary_key)]
                employee_id: i64,
                reports: Vec<Employee>,
                #[sqlweave(alias = "manager")]
                boss: Option<Box<Employee>>,
                tags: Vec<String>,
                avatar: Vec<u8>,
            }
        });
        assert!(out.contains("Cardinality :: Many"), "{out}");
        assert!(out.contains("Cardinality :: Optional"), "{out}");
        assert!(out.contains("collect_scalar (& mut self . tags"), "{out}");
        assert!(out.contains("assign_scalar (& mut self . avatar"), "{out}");
        assert!(out.contains("Some (\"manager\")"), "{out}");
    }

    #[test]
    fn skipped_fields_are_left_out() {
        let out = expanded(parse_quote! {
            struct A {
                id: i64,
                #[sqlweave(skip)]
                cache: std::collections::HashMap<String, String>,
            }
        });
        assert!(!out.contains("cache"), "{out}");
    }

    #[test]
    fn column_override_feeds_write_names() {
        let out = expanded(parse_quote! {
            struct A {
                #[sqlweave(column = "artist.artist_id")]
                id: i64,
            }
        });
        assert!(out.contains("(\"artist_id\" , :: sqlweave :: Value :: from"), "{out}");
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let tuple: DeriveInput = parse_quote! { struct A(i64); };
        assert!(expand(tuple).is_err());

        let enumeration: DeriveInput = parse_quote! { enum A { X } };
        assert!(expand(enumeration).is_err());

        let generic: DeriveInput = parse_quote! { struct A<T> { x: T } };
        assert!(expand(generic).is_err());

        let flag_on_nested: DeriveInput = parse_quote! {
            struct A {
                #[sqlweave(primary_key)]
                albums: Vec<Album>,
            }
        };
        assert!(expand(flag_on_nested).is_err());
    }
}
