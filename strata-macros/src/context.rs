//! `#[derive(Context)]` expansion.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Index, Path, parse_macro_input};

/// Implementation of the `#[derive(Context)]` macro.
pub fn derive_context_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let inner = inner_field(input)?;
    let lookup = struct_lookup(&input.attrs)?;

    let lookup_impl = lookup.map(|path| {
        quote! {
            fn lookup(&self, key: &str) -> ::core::option::Option<::std::string::String> {
                if let ::core::option::Option::Some(value) = (#path)(self, key) {
                    return ::core::option::Option::Some(value);
                }
                ::strata::Context::lookup(&*self.#inner, key)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::strata::Context for #name #ty_generics #where_clause {
            fn content(&self) -> &str {
                ::strata::Context::content(&*self.#inner)
            }

            fn write(&mut self, data: &[u8]) -> usize {
                ::strata::Context::write(&mut *self.#inner, data)
            }

            fn exchange(&self) -> ::core::option::Option<&::strata::Exchange> {
                ::strata::Context::exchange(&*self.#inner)
            }

            fn wrapped(&self) -> ::core::option::Option<&dyn ::strata::Context> {
                ::core::option::Option::Some(&*self.#inner)
            }

            fn wrapped_mut(&mut self) -> ::core::option::Option<&mut dyn ::strata::Context> {
                ::core::option::Option::Some(&mut *self.#inner)
            }

            fn response_headers(&self) -> ::core::option::Option<&::strata::http::HeaderMap> {
                ::strata::Context::response_headers(&*self.#inner)
            }

            fn response_headers_mut(
                &mut self,
            ) -> ::core::option::Option<&mut ::strata::http::HeaderMap> {
                ::strata::Context::response_headers_mut(&mut *self.#inner)
            }

            #lookup_impl
        }
    })
}

/// The wrapped field: the one marked `#[context(inner)]`, else one named
/// `inner`.
fn inner_field(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Context can only be derived for structs",
        ));
    };

    let mut marked = None;
    for (index, field) in data.fields.iter().enumerate() {
        if !is_inner(&field.attrs)? {
            continue;
        }
        if marked.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "only one field may be marked #[context(inner)]",
            ));
        }
        marked = Some(match &field.ident {
            Some(ident) => ident.to_token_stream(),
            None => Index::from(index).to_token_stream(),
        });
    }
    if let Some(member) = marked {
        return Ok(member);
    }

    if let Fields::Named(fields) = &data.fields {
        if let Some(ident) = fields
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .find(|ident| *ident == "inner")
        {
            return Ok(ident.to_token_stream());
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "mark the wrapped context field with #[context(inner)]",
    ))
}

fn is_inner(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut inner = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("context")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("inner") {
                inner = true;
                Ok(())
            } else {
                Err(meta.error("unknown field attribute; expected `inner`"))
            }
        })?;
    }
    Ok(inner)
}

fn struct_lookup(attrs: &[Attribute]) -> syn::Result<Option<Path>> {
    let mut lookup = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("context")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("lookup") {
                lookup = Some(meta.value()?.parse::<Path>()?);
                Ok(())
            } else {
                Err(meta.error("unknown struct attribute; expected `lookup = path`"))
            }
        })?;
    }
    Ok(lookup)
}
