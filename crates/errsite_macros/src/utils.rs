// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Bail macro for early return with `syn::Error::new`
///
/// Usage:
/// - `bail!("message")` - uses `Span::call_site()`
/// - `bail!(span, "message")` - uses provided span
macro_rules! bail {
    ($msg:literal) => {
        return Err(syn::Error::new(proc_macro2::Span::call_site(), $msg))
    };

    ($span:expr, $msg:literal) => {
        return Err(syn::Error::new($span, $msg))
    };
}

pub(crate) use bail;

/// Assert that two token streams are semantically identical by parsing them
/// into `syn::File`, pretty-printing with `prettyplease` and comparing the
/// resulting strings.
#[cfg(test)]
macro_rules! assert_token_streams_equal {
    ($actual:expr, $expected:expr $(,)?) => {{
        let expected_ts: proc_macro2::TokenStream = $expected;
        let actual_ts: proc_macro2::TokenStream = $actual;

        let ast_actual: syn::File = syn::parse2(actual_ts).expect("actual tokenstream is not valid Rust");
        let ast_expected: syn::File = syn::parse2(expected_ts).expect("expected tokenstream is not valid Rust");

        let actual_string = prettyplease::unparse(&ast_actual);
        let expected_string = prettyplease::unparse(&ast_expected);

        pretty_assertions::assert_eq!(actual_string, expected_string);
    }};
}

#[cfg(test)]
pub(crate) use assert_token_streams_equal;
