// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Errors that know where they came from.
//!
//! Errsite creates and wraps errors while recording the module and function that
//! produced or forwarded them. Every node of the resulting chain renders as
//! `[module.function] message`, followed by ` -> ` and the rendered cause, so a single
//! line shows the whole path an error took through the program.
//!
//! # Key Features
//!
//! - [**`new!`**](new) / [**`newf!`**](newf): create an error at the current site
//! - [**`wrap!`**](wrap!) / [**`wrapf!`**](wrapf): wrap an error at the current site
//! - [**`join!`**](join!): merge several independent errors into one
//! - [**`#[annotate]`**](annotate): wrap every error a function returns
//! - [**`AnnotatedError`**](AnnotatedError): the chain node, with membership tests
//!   ([`is`](AnnotatedError::is), [`contains`](AnnotatedError::contains)) and
//!   [`root_cause`](AnnotatedError::root_cause)
//! - [**`Annotate`**](Annotate): extension trait wrapping the error of a [`Result`]
//!
//! # Quick Start
//!
//! ```rust
//! use errsite::{AnnotatedError, Link};
//!
//! fn write_block() -> Result<(), AnnotatedError> {
//!     Err(errsite::new!("disk full"))
//! }
//!
//! fn save_file() -> Result<(), AnnotatedError> {
//!     write_block().map_err(|e| errsite::wrap!(e, "saving file"))
//! }
//!
//! let error = save_file().unwrap_err();
//! // e.g. "[app.save_file] saving file -> [app.write_block] disk full"
//! assert!(error.to_string().contains("save_file] saving file -> ["));
//! assert!(error.to_string().ends_with("write_block] disk full"));
//! ```
//!
//! # Call Sites
//!
//! A [`Site`] is captured at macro expansion: the module is the innermost segment of
//! [`module_path!`] and the function is the enclosing function, with the self type prefixed
//! for methods of inherent and trait impls alike (`Store::save`, `Disk::fmt`). Closures
//! and async blocks report their enclosing function.
//! When nothing can be resolved the site is `unknown.unknown`; capture never fails.
//!
//! Code that prefers to name itself passes an explicit [`Site::new`] to the function
//! forms [`create`], [`wrap()`], [`join()`] or to [`AnnotatedError::new`].
//!
//! # Wrapping Foreign Errors
//!
//! Any error convertible into `Box<dyn Error + Send + Sync>` can be wrapped. Errors
//! created by this crate are linked directly; anything else is held by a thin
//! [`Link::Foreign`] adapter. To test membership of a foreign error later, wrap a
//! [`Link`] and keep a clone of it:
//!
//! ```rust
//! use errsite::Link;
//!
//! let base = Link::new(std::io::Error::other("disk full"));
//! let wrapped = errsite::wrap!(base.clone(), "saving file");
//!
//! assert!(wrapped.is(&base));
//! assert_eq!(wrapped.root_cause(), base);
//! ```
//!
//! Foreign error types implementing `PartialEq` can also be found by value with
//! [`AnnotatedError::contains`], and by type with [`AnnotatedError::find_source`].
//!
//! # Absent Errors
//!
//! Wrapping nothing yields nothing: [`wrap()`] takes an `Option` and returns `None` for
//! `None`, and [`join()`] returns `None` when every input is absent.
//!
//! ```rust
//! use errsite::{Link, Site};
//!
//! assert!(errsite::wrap(None::<std::io::Error>, Site::new("files", "save"), "saving").is_none());
//! assert!(errsite::join!(None::<Link>).is_none());
//! ```
//!
//! # Function Annotation
//!
//! The [`#[annotate]`](annotate) attribute wraps every error returned by a function with a
//! site naming that function:
//!
//! ```rust
//! use errsite::AnnotatedError;
//!
//! #[errsite::annotate("loading settings for {user}")]
//! fn load_settings(user: &str) -> Result<String, AnnotatedError> {
//!     Err(errsite::new!("file missing"))
//! }
//!
//! let error = load_settings("ada").unwrap_err();
//! assert!(error.to_string().contains("load_settings] loading settings for ada -> "));
//! ```

#[doc(hidden)]
extern crate self as errsite;

mod annotate;
mod annotated;
mod link;
mod macros;
mod message;
mod site;

#[cfg(any(feature = "test-util", test))]
pub mod test_util;

pub use annotate::{Annotate, IntoMember, create, join, render, wrap};
pub use annotated::AnnotatedError;
pub use errsite_macros::annotate;
pub use link::{BoxError, ChainMember, Joined, Link, Links, SharedError};
pub use site::{Location, Site, UNKNOWN};

/// A type alias for `Result<T, errsite::AnnotatedError>`.
pub type Result<T, E = AnnotatedError> = std::result::Result<T, E>;

#[doc(hidden)]
pub mod __private {
    pub use compact_str::format_compact;

    pub use crate::message::join_parts;
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(AnnotatedError: Send, Sync, Clone, std::error::Error);
    assert_impl_all!(Link: Send, Sync, Clone, std::error::Error);
    assert_impl_all!(Joined: Send, Sync, Clone, std::error::Error);
    assert_impl_all!(Site: Send, Sync, Copy);
}
