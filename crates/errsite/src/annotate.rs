// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Function forms of the annotation operations.
//!
//! The macros of this crate capture the call site and forward here. These functions are
//! also the explicit alternative for code that wants to pass its own [`Site`].

use std::fmt;

use compact_str::CompactString;

use crate::link::{BoxError, Joined, Link, SharedError};
use crate::message::join_parts;
use crate::{AnnotatedError, Site};

/// Creates a root error whose message is `parts` joined with a single space.
///
/// # Examples
///
/// ```rust
/// use errsite::Site;
///
/// let error = errsite::create(Site::new("db", "connect"), ["db", "timeout"]);
/// assert_eq!(error.to_string(), "[db.connect] db timeout");
/// ```
pub fn create<I>(site: Site, parts: I) -> AnnotatedError
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    AnnotatedError::new(site, join_parts(parts))
}

/// Wraps an optional error.
///
/// An absent error stays absent: `None` is returned and nothing is allocated. Otherwise
/// the error becomes the cause of a new node carrying `site` and `message`.
///
/// # Examples
///
/// ```rust
/// use errsite::Site;
///
/// let site = Site::new("files", "save");
/// assert!(errsite::wrap(None::<std::io::Error>, site, "saving file").is_none());
///
/// let wrapped = errsite::wrap(Some(std::io::Error::other("disk full")), site, "saving file");
/// assert_eq!(wrapped.unwrap().to_string(), "[files.save] saving file -> disk full");
/// ```
pub fn wrap<E>(error: Option<E>, site: Site, message: impl Into<CompactString>) -> Option<AnnotatedError>
where
    E: Into<BoxError>,
{
    error.map(|error| AnnotatedError::wrap(site, error, message))
}

/// Merges several optional errors into one.
///
/// Absent entries are dropped. If nothing is left, `None` is returned. Otherwise the
/// remaining errors, in order, form one [`Joined`] value which is wrapped by a node
/// carrying `site` and no message of its own. Every member can be found again with
/// [`AnnotatedError::is`].
///
/// # Examples
///
/// ```rust
/// use errsite::{Link, Site};
///
/// let site = Site::new("sync", "run");
/// let timeout = Link::new("timeout");
/// let disk_full = Link::new("disk full");
///
/// let joined = errsite::join(site, [Some(timeout.clone()), None, Some(disk_full.clone())]).unwrap();
/// assert!(joined.is(&timeout) && joined.is(&disk_full));
/// assert_eq!(joined.to_string(), "[sync.run] timeout\ndisk full");
///
/// assert!(errsite::join(site, [None, None]).is_none());
/// ```
pub fn join<I>(site: Site, errors: I) -> Option<AnnotatedError>
where
    I: IntoIterator,
    I::Item: Into<Option<Link>>,
{
    let members: Vec<Link> = errors.into_iter().filter_map(Into::into).collect();
    if members.is_empty() {
        return None;
    }
    Some(AnnotatedError::joined(site, Joined::new(members)))
}

/// Renders an optional error, using `<nil>` when it is absent.
#[must_use]
pub fn render<E>(error: Option<&E>) -> String
where
    E: fmt::Display + ?Sized,
{
    error.map_or_else(|| String::from("<nil>"), ToString::to_string)
}

/// Extension trait that annotates the error of a [`Result`].
///
/// `Ok` values pass through untouched; an `Err` is wrapped with the given site and
/// message.
///
/// # Examples
///
/// ```rust
/// use errsite::{Annotate, AnnotatedError};
///
/// fn read_settings() -> Result<String, AnnotatedError> {
///     std::fs::read_to_string("/definitely/missing/settings.toml").annotate(errsite::site!(), "reading settings")
/// }
///
/// let error = read_settings().unwrap_err();
/// assert!(error.to_string().contains("read_settings] reading settings -> "));
/// ```
pub trait Annotate<T> {
    /// Wraps the error with `site` and `message`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error if `self` is an error.
    fn annotate(self, site: Site, message: impl Into<CompactString>) -> Result<T, AnnotatedError>;

    /// Wraps the error with `site` and a lazily built message.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error if `self` is an error.
    fn annotate_with<F, M>(self, site: Site, message: F) -> Result<T, AnnotatedError>
    where
        F: FnOnce() -> M,
        M: Into<CompactString>;
}

impl<T, E> Annotate<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn annotate(self, site: Site, message: impl Into<CompactString>) -> Result<T, AnnotatedError> {
        self.map_err(|error| AnnotatedError::wrap(site, error, message))
    }

    fn annotate_with<F, M>(self, site: Site, message: F) -> Result<T, AnnotatedError>
    where
        F: FnOnce() -> M,
        M: Into<CompactString>,
    {
        self.map_err(|error| AnnotatedError::wrap(site, error, message()))
    }
}

/// Conversion of a `join!` argument into an optional link.
///
/// Implemented for [`Link`], [`AnnotatedError`], [`Joined`], boxed and shared foreign
/// errors, and options of each, so present and absent errors can be mixed in one call.
/// Any other error type is converted with [`Link::new`] first:
///
/// ```rust
/// let read: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
/// let parse: Result<u8, std::num::ParseIntError> = "x".parse::<u8>();
///
/// let joined = errsite::join!(read.err().map(errsite::Link::new), parse.err().map(errsite::Link::new));
/// assert!(joined.is_some());
/// ```
pub trait IntoMember {
    /// Converts into an optional link; `None` is dropped by the join.
    fn into_member(self) -> Option<Link>;
}

impl IntoMember for Link {
    fn into_member(self) -> Option<Link> {
        Some(self)
    }
}

impl IntoMember for AnnotatedError {
    fn into_member(self) -> Option<Link> {
        Some(Link::Annotated(self))
    }
}

impl IntoMember for Joined {
    fn into_member(self) -> Option<Link> {
        Some(Link::Joined(self))
    }
}

impl IntoMember for BoxError {
    fn into_member(self) -> Option<Link> {
        Some(Link::new(self))
    }
}

impl IntoMember for SharedError {
    fn into_member(self) -> Option<Link> {
        Some(Link::Foreign(self))
    }
}

impl<M: IntoMember> IntoMember for Option<M> {
    fn into_member(self) -> Option<Link> {
        self.and_then(IntoMember::into_member)
    }
}
