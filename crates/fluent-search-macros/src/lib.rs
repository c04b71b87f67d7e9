//! Derive macros for fluent-search.
//!
//! `#[derive(Searchable)]` maps annotated struct fields to index field keys
//! and generates a key constant per field.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod searchable;

/// Derives `fluent_search::Searchable` for a struct with named fields.
///
/// # Field Attributes
///
/// | Attribute | Value produced |
/// |-----------|----------------|
/// | `String` | `Value::String`, for `String` and `&str` fields |
/// | `Number` | `Value::Number`, for primitive numeric fields |
/// | `Timestamp` | `Value::Timestamp`, the field must implement `SearchTimestamp` |
/// | `Enum` | `Value::Enum`, the field must implement `SearchEnum` |
/// | `Bool` | `Value::Bool` |
/// | `Coordinate` | `Value::Coordinate`, for `Coordinate` fields |
/// | `skip` | Not searchable |
/// | `rename = "..."` | Index key, defaults to the field name |
///
/// Fields without a type are not searchable.
///
/// # Generated Code
///
/// 1. A constant per searchable field holding its key (`Article::NAME`)
/// 2. `Searchable::field_value`, `search_fields` and `type_name`
///
/// # Example
///
/// ```ignore
/// use fluent_search::Searchable;
/// use fluent_search_macros::Searchable;
///
/// #[derive(Clone, Searchable)]
/// struct Article {
///     #[search(String, rename = "_name")]
///     name: String,
///
///     #[search(Number)]
///     views: u32,
///
///     #[search(skip)]
///     body: String,
/// }
///
/// assert_eq!(Article::NAME, "_name");
/// assert_eq!(Article::search_fields(), &["_name", "views"]);
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn searchable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    searchable::searchable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
