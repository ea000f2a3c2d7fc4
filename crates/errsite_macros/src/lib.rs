// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Procedural macros to support the [`errsite`](https://docs.rs/errsite) crate. See `errsite` for more information.
//!
//! # Macros
//!
//! - `#[annotate("message")]` - Wrap every error a function returns with the function's call site

use proc_macro::TokenStream;

mod annotate;
mod utils;

/// Attribute macro that wraps every error returned by a function with its call site.
///
/// Accepts no arguments, a string literal, or a format string with arguments:
///
/// - `#[annotate]`
/// - `#[annotate("loading settings")]`
/// - `#[annotate("loading settings for {user}")]`
/// - `#[annotate("loading {} entries", entries.len())]`
///
/// See the main `errsite` crate documentation for detailed usage examples.
#[proc_macro_attribute]
#[cfg_attr(test, mutants::skip)]
pub fn annotate(args: TokenStream, input: TokenStream) -> TokenStream {
    annotate::annotate(args, input)
}
