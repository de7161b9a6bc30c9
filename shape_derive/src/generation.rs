//! Code generation for `Shape` and `SqlEnum`

use crate::parsing::{MemberInfo, ShapeInfo};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DataEnum, DeriveInput, Error, Fields, Result};

pub fn generate_shape_impl(
    input: &DeriveInput,
    info: &ShapeInfo,
    members: &[MemberInfo],
) -> TokenStream {
    let struct_name = &input.ident;
    let shape_name = struct_name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let table_call = info.table.as_ref().map(|table| quote! { .table(#table) });

    let field_properties = members.iter().map(|member| {
        let name = &member.name;
        let column = member.column.as_ref().map(|c| quote! { .column(#c) });
        let key = member.is_key.then(|| quote! { .key() });
        let generated = member.is_generated.then(|| quote! { .generated() });
        quote! {
            .property(shape_object::PropertyDescriptor::new(#name) #column #key #generated)
        }
    });
    let computed_properties = info.computed.iter().map(|method| {
        let name = method.unraw().to_string();
        quote! {
            .property(shape_object::PropertyDescriptor::new(#name).computed())
        }
    });

    let read_arms = members.iter().map(|member| {
        let name = &member.name;
        let ident = &member.ident;
        quote! {
            #name => ::core::option::Option::Some(
                shape_object::ToSqlValue::to_sql_value(&self.#ident)
            ),
        }
    });
    let computed_arms = info.computed.iter().map(|method| {
        let name = method.unraw().to_string();
        quote! {
            #name => ::core::option::Option::Some(
                shape_object::ToSqlValue::to_sql_value(&self.#method())
            ),
        }
    });

    let write_arms = members.iter().map(|member| {
        let name = &member.name;
        let ident = &member.ident;
        quote! {
            #name => {
                self.#ident = shape_object::FromSqlValue::from_sql_value(value)?;
                ::core::result::Result::Ok(true)
            }
        }
    });

    quote! {
        impl #impl_generics shape_object::Shape for #struct_name #ty_generics #where_clause {
            fn describe() -> ::core::result::Result<
                shape_object::TypeDescription,
                shape_object::ShapeError,
            > {
                shape_object::TypeDescription::builder(#shape_name)
                    #table_call
                    #(#field_properties)*
                    #(#computed_properties)*
                    .build()
            }

            fn read_member(&self, name: &str) -> ::core::option::Option<shape_object::SqlValue> {
                match name {
                    #(#read_arms)*
                    #(#computed_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables, unreachable_code)]
            fn write_member(
                &mut self,
                name: &str,
                value: shape_object::SqlValue,
            ) -> ::core::result::Result<bool, shape_object::ConversionError> {
                match name {
                    #(#write_arms)*
                    _ => ::core::result::Result::Ok(false),
                }
            }
        }
    }
}

/// Unit enums travel as their variant name in a text column
pub fn generate_sql_enum_impl(input: &DeriveInput, data: &DataEnum) -> Result<TokenStream> {
    let enum_name = &input.ident;
    let enum_label = enum_name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            enum_name,
            "SqlEnum requires at least one variant",
        ));
    }

    let mut to_arms = Vec::with_capacity(data.variants.len());
    let mut from_arms = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "SqlEnum can only be derived for enums with unit variants",
            ));
        }
        let ident = &variant.ident;
        let label = ident.unraw().to_string();
        to_arms.push(quote! { #enum_name::#ident => #label, });
        from_arms.push(quote! { #label => ::core::result::Result::Ok(#enum_name::#ident), });
    }

    Ok(quote! {
        impl #impl_generics shape_object::ToSqlValue for #enum_name #ty_generics #where_clause {
            fn to_sql_value(&self) -> shape_object::SqlValue {
                let label = match self {
                    #(#to_arms)*
                };
                shape_object::SqlValue::Text(::std::string::String::from(label))
            }

            fn sql_type() -> shape_object::SqlType {
                shape_object::SqlType::Text
            }
        }

        impl #impl_generics shape_object::FromSqlValue for #enum_name #ty_generics #where_clause {
            fn from_sql_value(
                value: shape_object::SqlValue,
            ) -> ::core::result::Result<Self, shape_object::ConversionError> {
                match value {
                    shape_object::SqlValue::Text(text) => match text.as_str() {
                        #(#from_arms)*
                        _ => ::core::result::Result::Err(
                            shape_object::ConversionError::UnknownVariant {
                                enum_name: #enum_label,
                                value: text,
                            },
                        ),
                    },
                    other => ::core::result::Result::Err(
                        shape_object::ConversionError::mismatch(#enum_label, &other),
                    ),
                }
            }
        }
    })
}
