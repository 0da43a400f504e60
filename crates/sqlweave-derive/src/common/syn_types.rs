//! Type helper utilities for syn type analysis.

/// Single generic argument of the last path segment when it is named `wrapper`.
fn wrapped<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let seg = type_path.path.segments.last()?;
    if seg.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Extract the inner type T from Option<T>, or return None if not an Option type.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    wrapped(ty, "Option")
}

/// Extract the inner type T from Vec<T>, or return None if not a Vec type.
///
/// Recognizes `Vec<T>` and `std::vec::Vec<T>`.
pub fn vec_inner(ty: &syn::Type) -> Option<&syn::Type> {
    wrapped(ty, "Vec")
}

/// Last path segment name, e.g. `NaiveDate` for `chrono::NaiveDate`.
fn last_ident(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident.to_string()),
        syn::Type::Reference(reference) => last_ident(&reference.elem),
        _ => None,
    }
}

/// Types a cell converts into directly.
const SCALAR_TYPES: &[&str] = &[
    "bool",
    "i8",
    "i16",
    "i32",
    "i64",
    "u8",
    "u16",
    "u32",
    "f32",
    "f64",
    "String",
    "Uuid",
    "Decimal",
    "Value",
    "JsonValue",
    "NaiveDate",
    "NaiveTime",
    "NaiveDateTime",
    "DateTime",
];

/// Whether `ty` is a plain scalar, looking through `Option`.
///
/// `Vec<u8>` counts as a scalar (a byte buffer); any other `Vec` does not.
pub fn is_scalar(ty: &syn::Type) -> bool {
    if let Some(inner) = option_inner(ty) {
        return is_scalar(inner);
    }
    if let Some(inner) = vec_inner(ty) {
        return last_ident(inner).as_deref() == Some("u8");
    }
    last_ident(ty).is_some_and(|name| SCALAR_TYPES.contains(&name.as_str()))
}

/// `Vec<T>` of scalars other than bytes: collected across grouped rows.
pub fn collected_scalar(ty: &syn::Type) -> Option<&syn::Type> {
    let inner = vec_inner(ty)?;
    if last_ident(inner).as_deref() == Some("u8") {
        return None;
    }
    is_scalar(inner).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_option_inner() {
        let ty: syn::Type = parse_quote!(Option<String>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(std::option::Option<i32>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(String);
        assert!(option_inner(&ty).is_none());

        let ty: syn::Type = parse_quote!(Vec<String>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_vec_inner() {
        let ty: syn::Type = parse_quote!(std::vec::Vec<i32>);
        assert!(vec_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(Box<Employee>);
        assert!(vec_inner(&ty).is_none());
    }

    #[test]
    fn test_is_scalar() {
        let scalars: [syn::Type; 6] = [
            parse_quote!(i64),
            parse_quote!(Option<String>),
            parse_quote!(chrono::NaiveDate),
            parse_quote!(DateTime<Utc>),
            parse_quote!(Vec<u8>),
            parse_quote!(Option<uuid::Uuid>),
        ];
        for ty in &scalars {
            assert!(is_scalar(ty), "{}", quote::quote!(#ty));
        }

        let nested: [syn::Type; 4] = [
            parse_quote!(Album),
            parse_quote!(Vec<Album>),
            parse_quote!(Option<Box<Employee>>),
            parse_quote!(Vec<String>),
        ];
        for ty in &nested {
            assert!(!is_scalar(ty), "{}", quote::quote!(#ty));
        }
    }

    #[test]
    fn test_collected_scalar() {
        let ty: syn::Type = parse_quote!(Vec<String>);
        assert!(collected_scalar(&ty).is_some());

        let ty: syn::Type = parse_quote!(Vec<u8>);
        assert!(collected_scalar(&ty).is_none());

        let ty: syn::Type = parse_quote!(Vec<Album>);
        assert!(collected_scalar(&ty).is_none());
    }
}
