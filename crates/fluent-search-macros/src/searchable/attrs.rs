//! Parsing of `#[search(...)]` field attributes.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Result, Token,
};

const KINDS: &str = "String, Number, Timestamp, Enum, Bool, Coordinate";

/// How a field is exposed to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Timestamp,
    Enum,
    Bool,
    Coordinate,
}

impl FieldKind {
    fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "String" | "string" => Ok(FieldKind::String),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "boolean" => Ok(FieldKind::Bool),
            "Coordinate" | "coordinate" | "point" => Ok(FieldKind::Coordinate),
            other => Err(Error::new(
                ident.span(),
                format!("unknown search field type '{}', expected one of: {}", other, KINDS),
            )),
        }
    }
}

/// Contents of one `#[search(...)]` attribute.
#[derive(Debug, Clone, Default)]
pub struct SearchAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// Index key; the field name when absent.
    pub rename: Option<String>,
}

impl Parse for SearchAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SearchAttr::default();
        let items: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in items {
            match &meta {
                Meta::Path(path) if path.is_ident("skip") => attr.skip = true,
                Meta::Path(path) => {
                    let ident = path.get_ident().ok_or_else(|| {
                        Error::new(path.span(), format!("expected one of: {}, skip", KINDS))
                    })?;
                    if attr.kind.is_some() {
                        return Err(Error::new(ident.span(), "field type given twice"));
                    }
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => match &nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) if !s.value().is_empty() => attr.rename = Some(s.value()),
                    other => {
                        return Err(Error::new(
                            other.span(),
                            "rename must be a non-empty string literal",
                        ))
                    }
                },
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown search attribute, expected one of: {}, skip, rename = \"...\"",
                            KINDS
                        ),
                    ))
                }
            }
        }

        Ok(attr)
    }
}

/// Reads the `#[search(...)]` attribute of a field, if any.
pub fn parse_search_attrs(attrs: &[Attribute]) -> Result<SearchAttr> {
    match attrs.iter().find(|a| a.path().is_ident("search")) {
        Some(attr) => attr.parse_args::<SearchAttr>(),
        None => Ok(SearchAttr::default()),
    }
}
