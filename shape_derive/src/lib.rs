//! Derive macros for rowshape
//!
//! `#[derive(Shape)]` describes a struct's members for statement synthesis
//! and row materialization. `#[derive(SqlEnum)]` maps a unit enum to text.
//!
//! Generated code refers to `shape_object::...`; the `rowshape` prelude
//! brings that path into scope.

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

mod generation;
mod parsing;

use generation::{generate_shape_impl, generate_sql_enum_impl};
use parsing::{check_unique_names, parse_members, parse_shape_attributes};

/// Derive `Shape` for a struct with named fields
///
/// Struct attributes:
/// - `#[table(name = "...")]` overrides the default table (lowercased type name)
/// - `#[computed(method, ...)]` adds getter-only members backed by `&self` methods
///
/// Field attributes:
/// - `#[key]` marks a key member
/// - `#[generated]` marks a server-generated member, never written by inserts
/// - `#[column(name = "...")]` overrides the snake_case column name
#[proc_macro_derive(Shape, attributes(table, computed, key, generated, column))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let info = match parse_shape_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let members = match parse_members(&input.data) {
        Ok(members) => members,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = check_unique_names(&members, &info.computed) {
        return e.to_compile_error().into();
    }

    generate_shape_impl(&input, &info, &members).into()
}

/// Derive `ToSqlValue` and `FromSqlValue` for a unit enum, stored as the variant name
#[proc_macro_derive(SqlEnum)]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "SqlEnum can only be derived for enums")
            .to_compile_error()
            .into();
    };

    match generate_sql_enum_impl(&input, data) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
