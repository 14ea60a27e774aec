//! `#[derive(Model)]` for `chopin_jsonable::Model`.
//!
//! ```rust,ignore
//! #[derive(Model)]
//! #[model(name = "Contact")]
//! struct Contact {
//!     #[model(primary_key)]
//!     id: i32,
//!     name: String,
//!     #[model(skip)]
//!     password_hash: String,
//! }
//! ```
//!
//! sea-orm entities work as-is: `#[sea_orm(primary_key)]` marks the key and
//! `#[sea_orm(table_name = "...")]` names the model.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Expr, Fields, Ident, LitStr, Token, ext::IdentExt,
    meta::ParseNestedMeta, parse_macro_input,
};

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let mut model_name = None;
    let mut table_name = None;

    for attr in &input.attrs {
        if attr.path().is_ident("model") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let s: LitStr = meta.value()?.parse()?;
                    model_name = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported model attribute, expected `name`"))
                }
            })?;
        } else if attr.path().is_ident("sea_orm") {
            table_name = sea_orm_table_name(attr);
        }
    }

    let model_name = model_name
        .or(table_name)
        .unwrap_or_else(|| name.unraw().to_string());

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Model can only be derived for structs with named fields",
            ));
        }
    };

    let mut pk_field: Option<Ident> = None;
    let mut idents = Vec::new();
    let mut columns = Vec::new();

    for field in named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "All fields must have names"))?;

        let mut skip = false;
        for attr in &field.attrs {
            if attr.path().is_ident("model") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("primary_key") {
                        pk_field = Some(ident.clone());
                        Ok(())
                    } else if meta.path.is_ident("skip") {
                        skip = true;
                        Ok(())
                    } else {
                        Err(meta.error(
                            "unsupported model attribute, expected `primary_key` or `skip`",
                        ))
                    }
                })?;
            } else if attr.path().is_ident("sea_orm") && pk_field.is_none() && is_sea_orm_pk(attr)
            {
                pk_field = Some(ident.clone());
            }
        }

        if !skip {
            columns.push(ident.unraw().to_string());
            idents.push(ident);
        }
    }

    let pk_ident = match pk_field {
        Some(ident) => ident,
        None => named
            .iter()
            .filter_map(|f| f.ident.clone())
            .find(|ident| ident == "id")
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    name,
                    "Model requires a primary key field (e.g., #[model(primary_key)] id) or a field named 'id'",
                )
            })?,
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::chopin_jsonable::Model for #name #ty_generics #where_clause {
            fn model_name(&self) -> &'static str {
                #model_name
            }

            fn fields(&self) -> ::std::vec::Vec<::chopin_jsonable::Field<'_>> {
                ::std::vec![
                    #( (#columns, ::chopin_jsonable::ToEncodable::to_encodable(&self.#idents)) ),*
                ]
            }

            fn pk(&self) -> ::chopin_jsonable::Encodable<'_> {
                ::chopin_jsonable::ToEncodable::to_encodable(&self.#pk_ident)
            }
        }
    })
}

/// Reads `table_name = "..."` out of a container-level `#[sea_orm(...)]`.
fn sea_orm_table_name(attr: &Attribute) -> Option<String> {
    let mut table_name = None;
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("table_name") {
            let s: LitStr = meta.value()?.parse()?;
            table_name = Some(s.value());
            Ok(())
        } else {
            skip_sea_orm_value(&meta)
        }
    });
    table_name
}

fn is_sea_orm_pk(attr: &Attribute) -> bool {
    let mut found = false;
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("primary_key") {
            found = true;
        }
        skip_sea_orm_value(&meta)
    });
    found
}

// sea-orm owns the rest of its attribute; consume values we don't interpret.
fn skip_sea_orm_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _: proc_macro2::Group = meta.input.parse()?;
    }
    Ok(())
}
