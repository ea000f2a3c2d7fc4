// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

use crate::link::{BoxError, ChainMember, Joined, Link, Links};
use crate::site::Site;

/// The node data, shared between clones of an [`AnnotatedError`].
struct Frame {
    site: Site,
    message: CompactString,
    cause: Option<Link>,
    // built by `join`: the joined members render in place of a message
    merged: bool,
}

/// An error annotated with the site that created or forwarded it.
///
/// Each `AnnotatedError` is one node of a chain: it holds the [`Site`] it was created
/// at, a message, and optionally the [`Link`] to the error it wraps. Nodes are
/// immutable; cloning shares the node instead of copying it, so a clone kept aside can
/// later be found in a chain with [`is`](Self::is).
///
/// The rendered form is a stable contract:
///
/// - `[module.function] message` for a root node,
/// - `[module.function] message -> <rendered cause>` for a wrapping node.
///
/// The alternate form (`{:#}`) puts each node on its own line and appends the source
/// location of every site that has one.
///
/// # Examples
///
/// ```rust
/// use errsite::{AnnotatedError, Site};
///
/// let root = AnnotatedError::new(Site::new("db", "query"), "timeout");
/// let wrapped = AnnotatedError::wrap(Site::new("api", "handle"), root.clone(), "loading user");
///
/// assert_eq!(wrapped.to_string(), "[api.handle] loading user -> [db.query] timeout");
/// assert!(wrapped.is(&root));
/// ```
#[derive(Clone)]
pub struct AnnotatedError {
    frame: Arc<Frame>,
}

impl AnnotatedError {
    /// Creates a root error with no cause.
    pub fn new(site: Site, message: impl Into<CompactString>) -> Self {
        Self::from_frame(site, message.into(), None, false)
    }

    /// Wraps `error`, making it the cause of a new node.
    ///
    /// Errors created by this crate are linked directly; anything else is adapted
    /// into a [`Link::Foreign`].
    pub fn wrap<E>(site: Site, error: E, message: impl Into<CompactString>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::from_frame(site, message.into(), Some(Link::new(error)), false)
    }

    pub(crate) fn joined(site: Site, joined: Joined) -> Self {
        Self::from_frame(site, CompactString::default(), Some(Link::Joined(joined)), true)
    }

    fn from_frame(site: Site, message: CompactString, cause: Option<Link>, merged: bool) -> Self {
        Self {
            frame: Arc::new(Frame {
                site,
                message,
                cause,
                merged,
            }),
        }
    }

    /// The site this error was created or forwarded at.
    #[must_use]
    pub fn site(&self) -> Site {
        self.frame.site
    }

    /// The message given at this node, without site tag or cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.frame.message
    }

    /// Returns the wrapped error, or `None` for a root node.
    #[must_use]
    pub fn cause(&self) -> Option<&Link> {
        self.frame.cause.as_ref()
    }

    /// Follows causes to the end of the chain.
    ///
    /// Returns this error itself when it has no cause. A joined value has several
    /// causes and ends the walk.
    #[must_use]
    pub fn root_cause(&self) -> Link {
        match self.cause() {
            Some(cause) => cause.root_cause(),
            None => Link::Annotated(self.clone()),
        }
    }

    /// Returns `true` if `target` is this error or is reachable from it.
    ///
    /// Identity is compared, not text: `target` must be a clone of the very link or
    /// error that was wrapped. Every member of a joined value is reachable.
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: ChainMember + ?Sized,
    {
        let identity = target.identity();
        self.identity() == identity || self.links().any(|link| link.identity() == identity)
    }

    /// Returns `true` if an error equal to `value` is reachable from this error.
    ///
    /// Foreign errors are searched through their own [`source`](StdError::source) chain,
    /// which makes this the way to look for foreign error values that were moved into
    /// the chain.
    pub fn contains<T>(&self, value: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        let this: &(dyn StdError + 'static) = self;
        this.downcast_ref::<T>() == Some(value)
            || self.links().any(|link| link.errors().any(|error| error.downcast_ref::<T>() == Some(value)))
    }

    /// Finds the first error of type `T` reachable from this error.
    ///
    /// Only the chain below this error is searched, not the error itself, the same as
    /// [`Link::find_source`].
    pub fn find_source<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.links()
            .find_map(|link| link.errors().find_map(|error| error.downcast_ref::<T>()))
    }

    /// Iterates depth first over every link below this error.
    pub fn links(&self) -> Links<'_> {
        Links::starting_at(self.cause())
    }

    pub(crate) fn frame_ptr(&self) -> *const () {
        Arc::as_ptr(&self.frame).cast()
    }
}

impl fmt::Debug for AnnotatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedError")
            .field("site", &self.frame.site)
            .field("message", &self.frame.message)
            .field("cause", &self.frame.cause)
            .finish()
    }
}

impl fmt::Display for AnnotatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Frame {
            site,
            message,
            cause,
            merged,
        } = self.frame.as_ref();
        let alternate = f.alternate();

        write!(f, "[{site}]")?;
        if !message.is_empty() {
            write!(f, " {message}")?;
        }
        if alternate && let Some(location) = site.location() {
            write!(f, " (at {location})")?;
        }

        match cause {
            None => Ok(()),
            Some(Link::Joined(joined)) if *merged => {
                if alternate {
                    write!(f, "\n{joined:#}")
                } else {
                    write!(f, " {joined}")
                }
            }
            Some(cause) => {
                if alternate {
                    write!(f, "\n-> {cause:#}")
                } else {
                    write!(f, " -> {cause}")
                }
            }
        }
    }
}

impl StdError for AnnotatedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.cause()? {
            Link::Annotated(annotated) => Some(annotated),
            Link::Foreign(error) => Some(error.as_ref()),
            Link::Joined(joined) => Some(joined),
        }
    }
}

impl PartialEq for AnnotatedError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.frame, &other.frame)
    }
}

impl Eq for AnnotatedError {}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Location;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    fn site(function: &'static str) -> Site {
        Site::new("storage", function)
    }

    #[test]
    fn renders_root() {
        let error = AnnotatedError::new(site("connect"), "db timeout");
        insta::assert_snapshot!(error, @"[storage.connect] db timeout");
        assert!(error.cause().is_none());
        assert!(error.source().is_none());
    }

    #[test]
    fn renders_root_without_message() {
        let error = AnnotatedError::new(site("connect"), "");
        assert_eq!(error.to_string(), "[storage.connect]");
    }

    #[test]
    fn renders_wrapped_chain() {
        let root = AnnotatedError::new(site("write"), "a");
        let middle = AnnotatedError::wrap(site("flush"), root, "b");
        let top = AnnotatedError::wrap(site("save"), middle.clone(), "c");

        insta::assert_snapshot!(top, @"[storage.save] c -> [storage.flush] b -> [storage.write] a");
        assert!(top.to_string().contains(&middle.to_string()));
    }

    #[test]
    fn renders_wrap_without_message() {
        let error = AnnotatedError::wrap(site("save"), std::io::Error::other("disk full"), "");
        assert_eq!(error.to_string(), "[storage.save] -> disk full");
    }

    #[test]
    fn renders_alternate_with_locations() {
        let located = site("write").with_location(Location::new("src/storage.rs", 10));
        let root = AnnotatedError::new(located, "a");
        let top = AnnotatedError::wrap(site("save"), root, "b");

        assert_eq!(format!("{top:#}"), "[storage.save] b\n-> [storage.write] a (at src/storage.rs:10)");
    }

    #[test]
    fn renders_joined_cause() {
        let joined = Joined::new(vec![Link::new("timeout"), Link::new("disk full")]);
        let error = AnnotatedError::joined(site("sync"), joined);

        assert_eq!(error.to_string(), "[storage.sync] timeout\ndisk full");
        assert_eq!(format!("{error:#}"), "[storage.sync]\ntimeout\ndisk full");
    }

    #[test]
    fn wrapped_joined_value_keeps_separator() {
        let joined = Joined::new(vec![Link::new("timeout"), Link::new("disk full")]);
        let error = AnnotatedError::wrap(site("save"), Link::Joined(joined.clone()), "");

        assert_eq!(error.to_string(), "[storage.save] -> timeout\ndisk full");
        assert_eq!(format!("{error:#}"), "[storage.save]\n-> timeout\ndisk full");

        let merged = AnnotatedError::joined(site("sync"), joined);
        let wrapped = AnnotatedError::wrap(site("save"), merged, "");
        assert_eq!(wrapped.to_string(), "[storage.save] -> [storage.sync] timeout\ndisk full");
    }

    #[test]
    fn accessors() {
        let error = AnnotatedError::new(site("connect"), "db timeout");
        assert_eq!(error.site(), site("connect"));
        assert_eq!(error.message(), "db timeout");
    }

    #[test]
    fn foreign_cause_is_the_std_source() {
        let error = AnnotatedError::wrap(site("save"), std::io::Error::other("disk full"), "saving file");
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn annotated_cause_is_the_std_source() {
        let root = AnnotatedError::new(site("write"), "a");
        let error = AnnotatedError::wrap(site("save"), root.clone(), "b");
        let source = error.source().unwrap().downcast_ref::<AnnotatedError>().unwrap();
        assert_eq!(source, &root);
    }

    #[test]
    fn root_cause_walks_to_the_end() {
        let root = AnnotatedError::new(site("write"), "a");
        let top = AnnotatedError::wrap(site("save"), AnnotatedError::wrap(site("flush"), root.clone(), "b"), "c");

        assert_eq!(top.root_cause(), Link::from(root.clone()));
        assert_eq!(root.root_cause(), Link::from(root));
    }

    #[test]
    fn is_uses_identity() {
        let root = AnnotatedError::new(site("write"), "a");
        let lookalike = AnnotatedError::new(site("write"), "a");
        let top = AnnotatedError::wrap(site("save"), root.clone(), "b");

        assert!(top.is(&top));
        assert!(top.is(&root));
        assert!(!top.is(&lookalike));
        assert_ne!(root, lookalike);
        assert_eq!(root, root.clone());
    }

    #[test]
    fn contains_and_find_source() {
        let top = AnnotatedError::wrap(site("save"), AnnotatedError::wrap(site("write"), DiskFull, "writing"), "saving");

        assert!(top.contains(&DiskFull));
        assert!(top.find_source::<DiskFull>().is_some());
        assert_eq!(top.find_source::<AnnotatedError>().unwrap().message(), "writing");
        assert!(top.find_source::<std::io::Error>().is_none());
    }

    #[test]
    fn links_visit_whole_chain() {
        let joined = Joined::new(vec![
            Link::from(AnnotatedError::wrap(site("read"), "timeout", "reading")),
            Link::new("disk full"),
        ]);
        let top = AnnotatedError::wrap(site("sync"), AnnotatedError::joined(site("merge"), joined), "syncing");

        let rendered: Vec<_> = top.links().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "[storage.merge] [storage.read] reading -> timeout\ndisk full",
                "[storage.read] reading -> timeout\ndisk full",
                "[storage.read] reading -> timeout",
                "timeout",
                "disk full",
            ]
        );
    }

    #[test]
    fn debug_shows_structure() {
        let error = AnnotatedError::wrap(site("save"), "disk full", "saving");
        let debug = format!("{error:?}");
        assert!(debug.starts_with("AnnotatedError { site: Site { module: \"storage\""));
        assert!(debug.contains("message: \"saving\""));
        assert!(debug.contains("Foreign("));
    }
}
