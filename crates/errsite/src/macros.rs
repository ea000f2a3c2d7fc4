// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Macros that capture the call site and forward to the annotation functions.

/// Captures the [`Site`](crate::Site) of the code this macro is expanded in.
///
/// The module comes from [`module_path!`]; the function is recovered from the type name of
/// a marker item declared in the caller's body. Inside closures and async blocks the
/// enclosing function is reported. Resolution never panics: unresolvable parts are
/// reported as `unknown`.
///
/// # Examples
///
/// ```rust
/// fn open_database() -> errsite::Site {
///     errsite::site!()
/// }
///
/// assert!(open_database().function().ends_with("open_database"));
/// ```
#[macro_export]
macro_rules! site {
    () => {
        $crate::Site::from_item_path(
            ::core::module_path!(),
            {
                fn __errsite_marker() {}
                ::core::any::type_name_of_val(&__errsite_marker)
            },
            ::core::file!(),
            ::core::line!(),
        )
    };
}

/// Creates an [`AnnotatedError`](crate::AnnotatedError) at the current site.
///
/// The message is every argument joined with a single space. Arguments can be anything
/// implementing `AsRef<str>`.
///
/// # Examples
///
/// ```rust
/// fn connect() -> errsite::AnnotatedError {
///     errsite::new!("db", "timeout")
/// }
///
/// assert!(connect().to_string().ends_with(".connect] db timeout"));
/// ```
#[macro_export]
macro_rules! new {
    () => {
        $crate::AnnotatedError::new($crate::site!(), "")
    };
    ($($part:expr),+ $(,)?) => {
        $crate::create($crate::site!(), [$(::core::convert::AsRef::<str>::as_ref(&$part)),+])
    };
}

/// Creates an [`AnnotatedError`](crate::AnnotatedError) at the current site with a
/// formatted message.
///
/// Accepts the same arguments as [`format!`].
///
/// # Examples
///
/// ```rust
/// fn connect(host: &str) -> errsite::AnnotatedError {
///     errsite::newf!("cannot reach {host} after {} attempts", 3)
/// }
///
/// assert!(connect("db1").to_string().ends_with("] cannot reach db1 after 3 attempts"));
/// ```
#[macro_export]
macro_rules! newf {
    ($($arg:tt)+) => {
        $crate::AnnotatedError::new($crate::site!(), $crate::__private::format_compact!($($arg)+))
    };
}

/// Wraps an error at the current site.
///
/// The first argument is the error to wrap, anything convertible into a boxed error.
/// The remaining arguments are joined with a single space to form the message.
///
/// To wrap an error that may be absent, use [`wrap`](crate::wrap()) or
/// [`Annotate`](crate::Annotate) instead.
///
/// # Examples
///
/// ```rust
/// fn save() -> errsite::AnnotatedError {
///     errsite::wrap!(std::io::Error::other("disk full"), "saving", "file")
/// }
///
/// assert!(save().to_string().ends_with(".save] saving file -> disk full"));
/// ```
#[macro_export]
macro_rules! wrap {
    ($err:expr, $($part:expr),+ $(,)?) => {
        $crate::AnnotatedError::wrap(
            $crate::site!(),
            $err,
            $crate::__private::join_parts([$(::core::convert::AsRef::<str>::as_ref(&$part)),+]),
        )
    };
    ($err:expr $(,)?) => {
        $crate::AnnotatedError::wrap($crate::site!(), $err, "")
    };
}

/// Wraps an error at the current site with a formatted message.
///
/// # Examples
///
/// ```rust
/// fn save(name: &str) -> errsite::AnnotatedError {
///     errsite::wrapf!(std::io::Error::other("disk full"), "saving {name}")
/// }
///
/// assert!(save("a.txt").to_string().ends_with(".save] saving a.txt -> disk full"));
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)+) => {
        $crate::AnnotatedError::wrap($crate::site!(), $err, $crate::__private::format_compact!($($arg)+))
    };
}

/// Merges errors at the current site.
///
/// Each argument is a [`Link`](crate::Link), an [`AnnotatedError`](crate::AnnotatedError),
/// a [`Joined`](crate::Joined), a [`BoxError`](crate::BoxError), a
/// [`SharedError`](crate::SharedError), or an `Option` of one of them. Other foreign
/// errors are converted with [`Link::new`](crate::Link::new) first. Absent arguments are
/// dropped; if none remain the result is `None`.
///
/// # Examples
///
/// ```rust
/// use errsite::Link;
///
/// let timeout = Link::new("timeout");
/// let joined = errsite::join!(timeout.clone(), None::<Link>, errsite::new!("disk full")).unwrap();
/// assert!(joined.is(&timeout));
///
/// assert!(errsite::join!().is_none());
///
/// let read: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
/// assert!(errsite::join!(read.err().map(Link::new), None::<Link>).is_some());
/// ```
#[macro_export]
macro_rules! join {
    () => {
        $crate::join($crate::site!(), ::core::iter::empty::<::core::option::Option<$crate::Link>>())
    };
    ($($err:expr),+ $(,)?) => {
        $crate::join($crate::site!(), [$($crate::IntoMember::into_member($err)),+])
    };
}

/// Returns early with an error created at the current site.
///
/// Accepts the same arguments as [`format!`]. The error is converted with [`From`] into
/// the function's error type.
///
/// # Examples
///
/// ```rust
/// use errsite::AnnotatedError;
///
/// fn check(value: i32) -> Result<i32, AnnotatedError> {
///     if value < 0 {
///         errsite::bail!("value must be non-negative, got {value}");
///     }
///     Ok(value)
/// }
///
/// assert!(check(-1).unwrap_err().to_string().ends_with("] value must be non-negative, got -1"));
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {
        return ::core::result::Result::Err(::core::convert::From::from($crate::newf!($($arg)+)))
    };
}
