//! Derive macros for sqlweave
//!
//! Provides `#[derive(Model)]`, describing a struct as a hydration
//! destination.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod model;

/// Derive `sqlweave::hydrate::Model` for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlweave::Model;
///
/// #[derive(Debug, Default, Model)]
/// struct Artist {
///     #[sqlweave(primary_key)]
///     artist_id: i64,
///     name: Option<String>,
///     albums: Vec<Album>,
/// }
///
/// #[derive(Debug, Default, Model)]
/// #[sqlweave(table = "albums")]
/// struct Album {
///     #[sqlweave(primary_key)]
///     album_id: i64,
///     title: String,
///     #[sqlweave(column = "genre_name")]
///     genres: Vec<String>,
/// }
/// ```
///
/// Columns are matched as `<type_name>.<field>` (`artist.artist_id`), with
/// the snake-cased struct name as prefix unless `table` is given.
///
/// # Attributes
///
/// - `#[sqlweave(table = "name")]` - Column prefix for this struct
/// - `#[sqlweave(primary_key)]` - Field participates in the group key
/// - `#[sqlweave(column = "name")]` - Map field to a different column; `"prefix.name"` replaces both parts
/// - `#[sqlweave(nested)]` / `#[sqlweave(scalar)]` - Force the field kind
/// - `#[sqlweave(alias = "prefix")]` - Column prefix of a nested field
/// - `#[sqlweave(primary_key = "a, b")]` - Key fields of a nested field
/// - `#[sqlweave(skip)]` - Leave the field at its default
///
/// `T` and `Box<T>` fields hold one nested record, `Option<T>` zero or one,
/// `Vec<T>` many. `Vec` of scalars collects distinct values; `Vec<u8>` is a
/// plain byte column.
#[proc_macro_derive(Model, attributes(sqlweave))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
