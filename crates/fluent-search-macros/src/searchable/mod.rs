//! `#[derive(Searchable)]`: index field accessors for result records.

mod attrs;
mod derive;

pub use derive::searchable_derive_impl;
