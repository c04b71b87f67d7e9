//! Code generation for `#[derive(Searchable)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_search_attrs, FieldKind};

pub fn searchable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Searchable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Searchable can only be derived for structs",
            ))
        }
    };

    let mut keys: Vec<String> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();
    let mut constants: Vec<TokenStream> = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let attr = parse_search_attrs(&field.attrs)?;

        let kind = match attr.kind {
            Some(kind) if !attr.skip => kind,
            _ => continue,
        };

        let key = attr.rename.unwrap_or_else(|| ident.to_string());
        if keys.contains(&key) {
            return Err(Error::new(
                field.span(),
                format!("index key '{}' is used by more than one field", key),
            ));
        }

        let constant = format_ident!("{}", ident.to_string().to_uppercase());
        let doc = format!("Index key of `{}`.", ident);
        constants.push(quote! {
            #[doc = #doc]
            pub const #constant: &'static str = #key;
        });

        let value = match kind {
            FieldKind::String => quote! { ::fluent_search::Value::String(&self.#ident) },
            FieldKind::Number => quote! {
                ::fluent_search::Value::Number(::fluent_search::Number::from(self.#ident))
            },
            FieldKind::Timestamp => quote! {
                ::fluent_search::Value::Timestamp(
                    ::fluent_search::SearchTimestamp::timestamp(&self.#ident)
                )
            },
            FieldKind::Enum => quote! {
                ::fluent_search::Value::Enum(
                    ::fluent_search::SearchEnum::discriminant(&self.#ident)
                )
            },
            FieldKind::Bool => quote! { ::fluent_search::Value::Bool(self.#ident) },
            FieldKind::Coordinate => quote! { ::fluent_search::Value::Coordinate(self.#ident) },
        };
        arms.push(quote! { #key => #value, });
        keys.push(key);
    }

    let type_name = name.to_string();

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::fluent_search::Searchable for #name #ty_generics #where_clause {
            fn field_value(&self, key: &str) -> ::fluent_search::Value<'_> {
                match key {
                    #(#arms)*
                    _ => ::fluent_search::Value::None,
                }
            }

            fn search_fields() -> &'static [&'static str] {
                &[#(#keys),*]
            }

            fn type_name() -> &'static str {
                #type_name
            }
        }
    })
}
