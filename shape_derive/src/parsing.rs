//! Parsing utilities for shape attributes
//!
//! This module handles `#[table]`, `#[computed]`, `#[key]`, `#[generated]`
//! and `#[column]` and validates table and column names.

use shape_object::naming::to_snake_case;
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, Error, Fields, Ident, LitStr, Result, Token};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Names are interpolated into SQL verbatim, so only plain identifiers are accepted
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct ShapeInfo {
    pub table: Option<String>,
    /// Getter-only members backed by `&self` methods
    pub computed: Vec<Ident>,
}

#[derive(Debug)]
pub struct MemberInfo {
    pub ident: Ident,
    pub name: String,
    pub column: Option<String>,
    pub is_key: bool,
    pub is_generated: bool,
}

impl MemberInfo {
    pub fn db_name(&self) -> String {
        self.column
            .clone()
            .unwrap_or_else(|| to_snake_case(&self.name))
    }
}

pub fn parse_shape_attributes(attrs: &[Attribute]) -> Result<ShapeInfo> {
    let mut info = ShapeInfo::default();

    for attr in attrs {
        if attr.path().is_ident("table") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    validate_table_name_syn(&value.value(), value.span())?;
                    info.table = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        } else if attr.path().is_ident("computed") {
            let methods =
                attr.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
            if methods.is_empty() {
                return Err(Error::new_spanned(
                    attr,
                    "computed attribute requires at least one method name",
                ));
            }
            info.computed.extend(methods);
        }
    }

    Ok(info)
}

pub fn parse_members(data: &Data) -> Result<Vec<MemberInfo>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Shape can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new_spanned(
            &data_struct.fields,
            "Shape can only be derived for structs with named fields",
        ));
    };

    let mut members = Vec::with_capacity(fields_named.named.len());
    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let mut column = None;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("column")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    validate_column_name_syn(&value.value(), value.span())?;
                    column = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        }

        members.push(MemberInfo {
            name: ident.unraw().to_string(),
            ident,
            column,
            is_key: has_attribute(&field.attrs, "key"),
            is_generated: has_attribute(&field.attrs, "generated"),
        });
    }

    Ok(members)
}

/// Every member name and column name must resolve to exactly one member
pub fn check_unique_names(members: &[MemberInfo], computed: &[Ident]) -> Result<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    let entries = members
        .iter()
        .map(|m| (m.ident.span(), m.name.clone(), m.db_name()))
        .chain(computed.iter().map(|method| {
            let name = method.unraw().to_string();
            let db_name = to_snake_case(&name);
            (method.span(), name, db_name)
        }));

    for (position, (span, name, db_name)) in entries.enumerate() {
        for candidate in [name, db_name] {
            match seen.get(&candidate) {
                Some(&existing) if existing != position => {
                    return Err(Error::new(
                        span,
                        format!("Name '{}' resolves to more than one member", candidate),
                    ));
                }
                Some(_) => {}
                None => {
                    seen.insert(candidate, position);
                }
            }
        }
    }

    Ok(())
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use syn::parse_quote;

    // Helper functions for tests - these call the _syn versions but panic on error
    fn validate_table_name(name: &str) {
        if let Err(e) = validate_table_name_syn(name, proc_macro2::Span::call_site()) {
            panic!("Invalid table name: {}", e);
        }
    }

    #[test]
    fn test_valid_table_names() {
        validate_table_name("cars");
        validate_table_name("parent_children");
        validate_table_name("_private");
        validate_table_name("table123");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_invalid_start() {
        validate_table_name("123table");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_empty_name() {
        validate_table_name("");
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious_names = [
            "users; DROP TABLE users; --",
            "users' OR '1'='1",
            "users/**/UNION/**/SELECT",
            "users\"; DELETE FROM users; --",
        ];

        for name in malicious_names {
            let result = std::panic::catch_unwind(|| {
                validate_table_name(name);
            });
            assert!(result.is_err(), "Should panic for malicious name: {}", name);
        }
    }

    #[test]
    fn test_parse_shape_attributes() {
        let input: syn::DeriveInput = parse_quote! {
            #[table(name = "persons")]
            #[computed(full_name)]
            struct Person {
                #[key]
                #[generated]
                id: i32,
                first_name: String,
                #[column(name = "years")]
                age: Option<i32>,
            }
        };

        let info = parse_shape_attributes(&input.attrs).unwrap();
        assert_eq!(info.table.as_deref(), Some("persons"));
        assert_eq!(info.computed.len(), 1);

        let members = parse_members(&input.data).unwrap();
        assert_eq!(members.len(), 3);
        assert!(members[0].is_key && members[0].is_generated);
        assert_eq!(members[2].db_name(), "years");
        assert!(check_unique_names(&members, &info.computed).is_ok());
    }

    #[test]
    fn test_tuple_structs_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            struct Pair(i32, i32);
        };
        assert!(parse_members(&input.data).is_err());
    }

    #[test]
    fn test_column_collision_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            struct Clash {
                first_name: String,
                #[column(name = "first_name")]
                given_name: String,
            }
        };
        let members = parse_members(&input.data).unwrap();
        assert!(check_unique_names(&members, &[]).is_err());
    }

    #[test]
    fn test_computed_collision_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            #[computed(full_name)]
            struct Person {
                full_name: String,
            }
        };
        let info = parse_shape_attributes(&input.attrs).unwrap();
        let members = parse_members(&input.data).unwrap();
        assert!(check_unique_names(&members, &info.computed).is_err());
    }

    #[test]
    fn test_invalid_column_override_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            struct Car {
                #[column(name = "make; DROP TABLE cars")]
                make: String,
            }
        };
        assert!(parse_members(&input.data).is_err());
    }
}
