// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::AnnotatedError;

/// A boxed, thread-safe error, the input type accepted wherever an error is wrapped.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A shared, thread-safe error that this crate does not own.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// One position in an error chain.
///
/// Every cause stored by an [`AnnotatedError`] is a `Link`. Errors created by this
/// crate are linked directly, anything else is held behind a thin [`Link::Foreign`]
/// adapter, and the merged value produced by [`join`](crate::join) is a
/// [`Link::Joined`].
///
/// Links are reference counted; cloning one never copies the chain, and two clones
/// of the same link compare equal with `==`.
///
/// # Examples
///
/// ```rust
/// use errsite::Link;
///
/// let base = Link::new(std::io::Error::other("disk full"));
/// let wrapped = errsite::wrap!(base.clone(), "saving file");
///
/// assert!(wrapped.is(&base));
/// assert_eq!(wrapped.root_cause(), base);
/// ```
#[derive(Clone)]
pub enum Link {
    /// An error created by this crate.
    Annotated(AnnotatedError),
    /// An error owned by someone else.
    Foreign(SharedError),
    /// Several independent errors merged into one value.
    Joined(Joined),
}

impl Link {
    /// Converts any error into a link.
    ///
    /// Errors that already are a [`Link`], an [`AnnotatedError`] or a [`Joined`] are
    /// linked as they are, so their identity is preserved. Everything else, including
    /// plain strings, becomes a [`Link::Foreign`].
    pub fn new<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::from_boxed(error.into())
    }

    fn from_boxed(error: BoxError) -> Self {
        let error = match error.downcast::<Self>() {
            Ok(link) => return *link,
            Err(error) => error,
        };
        let error = match error.downcast::<AnnotatedError>() {
            Ok(annotated) => return Self::Annotated(*annotated),
            Err(error) => error,
        };
        match error.downcast::<Joined>() {
            Ok(joined) => Self::Joined(*joined),
            Err(error) => Self::Foreign(Arc::from(error)),
        }
    }

    /// Returns the immediate cause of this link.
    ///
    /// Foreign errors and joined values have no single cause and return `None`.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        match self {
            Self::Annotated(annotated) => annotated.cause(),
            Self::Foreign(_) | Self::Joined(_) => None,
        }
    }

    /// Follows causes until a link without a further cause is reached.
    #[must_use]
    pub fn root_cause(&self) -> Self {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current.clone()
    }

    /// Returns `true` if `target` is this link or is reachable from it.
    ///
    /// Reachability follows causes and enters every member of a joined value.
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: ChainMember + ?Sized,
    {
        let identity = target.identity();
        self.identity() == identity || self.links().any(|link| link.identity() == identity)
    }

    /// Returns `true` if an error equal to `value` is this link or is reachable from it.
    ///
    /// Unlike [`find_source`](Self::find_source), the linked error itself is compared too.
    /// Foreign errors are searched through their own [`source`](StdError::source) chain.
    pub fn contains<T>(&self, value: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        std::iter::once(self)
            .chain(self.links())
            .any(|link| link.errors().any(|error| error.downcast_ref::<T>() == Some(value)))
    }

    /// Finds the first error of type `T` below this link.
    ///
    /// Only the sources are searched, not the linked error itself; for a foreign error
    /// that is its own [`source`](StdError::source) chain.
    pub fn find_source<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        self.errors()
            .skip(1)
            .chain(self.links().flat_map(Self::errors))
            .find_map(|error| error.downcast_ref::<T>())
    }

    /// Iterates depth first over every link below this one.
    pub fn links(&self) -> Links<'_> {
        Links::below(self)
    }

    /// Returns the annotated error if this link holds one.
    #[must_use]
    pub fn as_annotated(&self) -> Option<&AnnotatedError> {
        match self {
            Self::Annotated(annotated) => Some(annotated),
            Self::Foreign(_) | Self::Joined(_) => None,
        }
    }

    /// Returns the linked error as a standard error trait object.
    #[must_use]
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::Annotated(annotated) => annotated,
            Self::Foreign(error) => error.as_ref(),
            Self::Joined(joined) => joined,
        }
    }

    /// The errors this link stands for when compared by value: the linked error and,
    /// for foreign errors, their own source chain.
    pub(crate) fn errors(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let first: &(dyn StdError + 'static) = self.as_error();
        let descend = matches!(self, Self::Foreign(_));
        std::iter::successors(Some(first), move |error| if descend { (*error).source() } else { None })
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annotated(annotated) => fmt::Debug::fmt(annotated, f),
            Self::Foreign(error) => f.debug_tuple("Foreign").field(error).finish(),
            Self::Joined(joined) => fmt::Debug::fmt(joined, f),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annotated(annotated) => fmt::Display::fmt(annotated, f),
            Self::Foreign(error) => fmt::Display::fmt(error, f),
            Self::Joined(joined) => fmt::Display::fmt(joined, f),
        }
    }
}

impl StdError for Link {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.as_error().source()
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Link {}

impl From<AnnotatedError> for Link {
    fn from(annotated: AnnotatedError) -> Self {
        Self::Annotated(annotated)
    }
}

impl From<Joined> for Link {
    fn from(joined: Joined) -> Self {
        Self::Joined(joined)
    }
}

impl From<SharedError> for Link {
    fn from(error: SharedError) -> Self {
        Self::Foreign(error)
    }
}

/// Several independent errors merged into one value by [`join`](crate::join).
///
/// Members keep their order and their identity; annotated members keep their own
/// site tags, reachable through [`Joined::members`].
#[derive(Clone)]
pub struct Joined {
    members: Arc<[Link]>,
}

impl Joined {
    pub(crate) fn new(members: Vec<Link>) -> Self {
        Self { members: members.into() }
    }

    /// The merged errors, in the order they were joined.
    #[must_use]
    pub fn members(&self) -> &[Link] {
        &self.members
    }
}

impl fmt::Debug for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Joined").field(&self.members).finish()
    }
}

impl fmt::Display for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(member, f)?;
        }
        Ok(())
    }
}

impl StdError for Joined {}

/// Depth-first iterator over the links of a chain.
///
/// Created by [`AnnotatedError::links`] and [`Link::links`]. The starting error is not
/// yielded. Members of a joined value are visited in order.
#[derive(Debug, Clone)]
pub struct Links<'a> {
    pending: Vec<&'a Link>,
}

impl<'a> Links<'a> {
    pub(crate) fn starting_at(first: Option<&'a Link>) -> Self {
        Self {
            pending: first.into_iter().collect(),
        }
    }

    fn below(link: &'a Link) -> Self {
        let mut links = Self { pending: Vec::new() };
        links.push_children(link);
        links
    }

    fn push_children(&mut self, link: &'a Link) {
        match link {
            Link::Annotated(annotated) => self.pending.extend(annotated.cause()),
            Link::Joined(joined) => self.pending.extend(joined.members().iter().rev()),
            Link::Foreign(_) => {}
        }
    }
}

impl<'a> Iterator for Links<'a> {
    type Item = &'a Link;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.pending.pop()?;
        self.push_children(link);
        Some(link)
    }
}

/// Pointer identity of a chain member.
#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(usize);

impl Identity {
    fn of<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

/// Values that can be searched for in a chain by identity.
///
/// Implemented for [`Link`], [`AnnotatedError`] and [`Joined`]. A foreign error is
/// searched for through the [`Link`] it was wrapped in; keep a clone of that link to
/// test membership later.
pub trait ChainMember: sealed::Sealed {
    #[doc(hidden)]
    fn identity(&self) -> Identity;
}

impl ChainMember for Link {
    fn identity(&self) -> Identity {
        match self {
            Self::Annotated(annotated) => annotated.identity(),
            Self::Foreign(error) => Identity::of(Arc::as_ptr(error)),
            Self::Joined(joined) => joined.identity(),
        }
    }
}

impl ChainMember for AnnotatedError {
    fn identity(&self) -> Identity {
        Identity::of(self.frame_ptr())
    }
}

impl ChainMember for Joined {
    fn identity(&self) -> Identity {
        Identity::of(Arc::as_ptr(&self.members))
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Link {}
    impl Sealed for crate::AnnotatedError {}
    impl Sealed for super::Joined {}
}
