// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test utilities for the errsite crate.
//!
//! This module is only available when the `test-util` feature is enabled.

/// Assert that an annotated error was created at the expected `module.function` site.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-util")]
/// # {
/// use errsite::{AnnotatedError, Site, assert_site};
///
/// let error = AnnotatedError::new(Site::new("db", "connect"), "timeout");
/// assert_site!(error, "db.connect");
/// # }
/// ```
#[macro_export]
#[cfg_attr(coverage_nightly, coverage(off))] // coverage doesn't handle panics well
macro_rules! assert_site {
    ($error:expr, $expected:expr) => {{
        let actual = $error.site().to_string();
        let expected: &str = $expected;
        if actual != expected {
            panic!("left : {expected}\nright: {actual}");
        }
    }};
}

/// Assert the sites of every annotated node in a chain, head first.
///
/// Nodes are visited in the same depth-first order as
/// [`AnnotatedError::links`](crate::AnnotatedError::links); foreign errors and joined
/// values have no site and are skipped.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-util")]
/// # {
/// use errsite::{AnnotatedError, Site, assert_chain_sites};
///
/// let root = AnnotatedError::new(Site::new("db", "query"), "timeout");
/// let top = AnnotatedError::wrap(Site::new("api", "handle"), root, "loading user");
///
/// assert_chain_sites!(top, ["api.handle", "db.query"]);
/// # }
/// ```
#[macro_export]
#[cfg_attr(coverage_nightly, coverage(off))] // coverage doesn't handle panics well
macro_rules! assert_chain_sites {
    ($error:expr, [$($expected:expr),* $(,)?]) => {{
        let error: &$crate::AnnotatedError = &$error;
        let actual: ::std::vec::Vec<::std::string::String> = ::core::iter::once(error)
            .chain(error.links().filter_map($crate::Link::as_annotated))
            .map(|node| node.site().to_string())
            .collect();
        let expected: ::std::vec::Vec<&str> = ::std::vec![$($expected),*];
        if actual != expected {
            panic!("left : {expected:?}\nright: {actual:?}");
        }
    }};
}
