// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, Result, ReturnType, parse_macro_input};

use crate::utils::bail;

/// Attribute macro wrapping every error a function returns with the function's site.
///
/// The rewritten body runs the original body in a closure whose return type is the
/// function's return type, then maps the error through `errsite::AnnotatedError::wrap`
/// and converts the result back with `From`.
#[cfg_attr(test, mutants::skip)] // procedural macro API cannot be used in tests directly
pub fn annotate(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    let input = parse_macro_input!(input as ItemFn);

    impl_annotate_attribute(args, input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn impl_annotate_attribute(args: proc_macro2::TokenStream, mut fn_definition: ItemFn) -> Result<proc_macro2::TokenStream> {
    let message_expr = generate_message_expr(args)?;

    let ReturnType::Type(_, return_type) = &fn_definition.sig.output else {
        bail!("annotate attribute can only be applied to functions returning Result");
    };

    let asyncness = &fn_definition.sig.asyncness;
    let await_suffix = asyncness.is_some().then(|| quote! { .await });
    let body = &fn_definition.block;

    let block = quote! {
        {
            (#asyncness || -> #return_type #body)() #await_suffix .map_err(|e| {
                let message = #message_expr;
                ::core::convert::From::from(errsite::AnnotatedError::wrap(errsite::site!(), e, message))
            })
        }
    };

    fn_definition.block = syn::parse2(block)?;

    Ok(quote! { #fn_definition })
}

/// Generate the message expression from the attribute arguments.
///
/// No arguments give an empty message, a plain string literal is used as it is, and a
/// literal with interpolation or followed by arguments is formatted.
fn generate_message_expr(args: proc_macro2::TokenStream) -> Result<proc_macro2::TokenStream> {
    let tokens: Vec<_> = args.into_iter().collect();
    let Some(first) = tokens.first() else {
        return Ok(quote! { "" });
    };

    let proc_macro2::TokenTree::Literal(lit) = first else {
        bail!(first.span(), "annotate expects a string literal or a format string with arguments");
    };
    if !is_quoted_string(&lit.to_string()) {
        bail!(lit.span(), "annotate expects a string literal or a format string with arguments");
    }

    let lit_str = lit.to_string();
    if tokens.len() > 1 || (lit_str.contains('{') && lit_str.contains('}')) {
        let format_tokens = proc_macro2::TokenStream::from_iter(tokens);
        Ok(quote! { errsite::__private::format_compact!(#format_tokens) })
    } else {
        Ok(quote! { #lit })
    }
}

fn is_quoted_string(lit: &str) -> bool {
    lit.len() >= 2 && lit.starts_with('"') && lit.ends_with('"')
}
