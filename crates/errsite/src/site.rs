// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Call-site identity attached to every annotated error.

use std::borrow::Cow;
use std::fmt;

/// Placeholder used when a module or function name cannot be resolved.
pub const UNKNOWN: &str = "unknown";

const PATH_SEPARATOR: &str = "::";
const CLOSURE_SEGMENT: &str = "{{closure}}";

/// Source location information (file and line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// File where the error was annotated
    pub file: &'static str,
    /// Line number where the error was annotated
    pub line: u32,
}

impl Location {
    /// Creates a new location with file and line information.
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The module and function that created or forwarded an error.
///
/// A `Site` renders as `module.function`, which is the tag shown in brackets at the
/// start of every annotated error. The module is the innermost module only; the crate
/// name and parent modules are dropped to keep tags short.
///
/// Sites are normally captured with the [`site!`](crate::site) macro, which every
/// constructor macro of this crate uses internally. Code that prefers to name itself
/// explicitly can use [`Site::new`].
///
/// # Examples
///
/// ```rust
/// use errsite::Site;
///
/// fn load_config() -> Site {
///     errsite::site!()
/// }
///
/// let site = load_config();
/// assert!(site.function().ends_with("load_config"));
///
/// let explicit = Site::new("config", "load");
/// assert_eq!(explicit.to_string(), "config.load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Site {
    module: &'static str,
    owner: Option<&'static str>,
    function: &'static str,
    location: Option<Location>,
}

impl Site {
    /// Creates a site from explicit module and function names.
    ///
    /// Empty names are replaced with `"unknown"`.
    #[must_use]
    pub const fn new(module: &'static str, function: &'static str) -> Self {
        Self {
            module: or_unknown(module),
            owner: None,
            function: or_unknown(function),
            location: None,
        }
    }

    /// Creates a site for a method of `owner`, rendered as `module.Owner::function`.
    ///
    /// An empty owner is dropped; empty module and function names are replaced with
    /// `"unknown"`.
    #[must_use]
    pub const fn method(module: &'static str, owner: &'static str, function: &'static str) -> Self {
        let mut site = Self::new(module, function);
        if !owner.is_empty() {
            site.owner = Some(owner);
        }
        site
    }

    /// Returns the `unknown.unknown` site used when capture fails.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// Attaches the source location of the call site.
    #[must_use]
    pub const fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Resolves a site from the paths produced at a call location.
    ///
    /// `module_path` is the output of [`module_path!`] at the call site and `item_path`
    /// is the type name of a marker fn item declared in the caller's body, e.g.
    /// `my_app::storage::save_file::__marker`. The marker segment is dropped, then the
    /// module path prefix, then any trailing `{{closure}}` segments so closures and
    /// async bodies report their enclosing function.
    ///
    /// Methods keep the last path segment of their self type without generic arguments,
    /// for inherent impls (`Wrapper<_>::get` becomes `Wrapper::get`) and trait impls
    /// (`<app::Disk as app::Store>::save` becomes `Disk::save`) alike.
    ///
    /// Anything that cannot be resolved becomes `"unknown"`; this function never panics.
    #[must_use]
    pub fn from_item_path(module_path: &'static str, item_path: &'static str, file: &'static str, line: u32) -> Self {
        let module = module_path.rsplit(PATH_SEPARATOR).next().unwrap_or_default();
        let (owner, function) = resolve_function(module_path, item_path);

        Self::method(module, owner.unwrap_or_default(), function).with_location(Location::new(file, line))
    }

    /// The innermost module of the call site.
    #[must_use]
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// The function of the call site, including the type for methods (`Type::method`).
    #[must_use]
    pub fn function(&self) -> Cow<'static, str> {
        match self.owner {
            Some(owner) => Cow::Owned(format!("{owner}{PATH_SEPARATOR}{}", self.function)),
            None => Cow::Borrowed(self.function),
        }
    }

    /// The type a method belongs to, when the site was resolved as a method of a
    /// generic type or a trait impl, or created with [`Site::method`].
    #[must_use]
    pub fn owner(&self) -> Option<&'static str> {
        self.owner
    }

    /// The source location of the call site, if it was captured.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns `true` if neither module nor function could be resolved.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.module == UNKNOWN && self.owner.is_none() && self.function == UNKNOWN
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{}.{owner}{PATH_SEPARATOR}{}", self.module, self.function),
            None => write!(f, "{}.{}", self.module, self.function),
        }
    }
}

const fn or_unknown(name: &'static str) -> &'static str {
    if name.is_empty() { UNKNOWN } else { name }
}

/// Splits the enclosing path of a marker into an optional owning type and the function.
fn resolve_function(module_path: &'static str, item_path: &'static str) -> (Option<&'static str>, &'static str) {
    // drop the marker item itself
    let Some((enclosing, _)) = item_path.rsplit_once(PATH_SEPARATOR) else {
        return (None, "");
    };

    if let Some(qualified) = enclosing.strip_prefix('<') {
        return qualified_method(qualified);
    }

    let relative = enclosing
        .strip_prefix(module_path)
        .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
        .unwrap_or_else(|| enclosing.rsplit(PATH_SEPARATOR).next().unwrap_or_default());
    let relative = strip_closures(relative);

    // `Wrapper<_>::get`: a generic self type ahead of the method
    match split_top_level(relative) {
        Some((owner, function)) if owner.contains('<') => (type_segment(owner), function),
        _ => (None, relative),
    }
}

/// Resolves `Type as Trait>::method` from the path of a trait impl method.
fn qualified_method(qualified: &'static str) -> (Option<&'static str>, &'static str) {
    let Some(end) = closing_angle(qualified) else {
        return (None, "");
    };
    let self_type = qualified[..end].split(" as ").next().unwrap_or_default();
    let function = qualified[end + 1..].strip_prefix(PATH_SEPARATOR).unwrap_or_default();

    (type_segment(self_type), strip_closures(function))
}

/// Reduces a type path to its last segment without references or generic arguments.
fn type_segment(path: &'static str) -> Option<&'static str> {
    let path = path.trim_start_matches('&');
    let path = path.strip_prefix("mut ").unwrap_or(path);
    let path = path.strip_prefix("dyn ").unwrap_or(path);
    let path = path.split('<').next().unwrap_or_default();
    let segment = path.rsplit(PATH_SEPARATOR).next().unwrap_or_default();

    (!segment.is_empty()).then_some(segment)
}

/// Byte index of the `>` closing an already opened `<`, skipping nested generics.
fn closing_angle(path: &str) -> Option<usize> {
    let mut depth = 0_usize;
    let mut previous = '\0';
    for (index, c) in path.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if previous == '-' => {}
            '>' if depth == 0 => return Some(index),
            '>' => depth -= 1,
            _ => {}
        }
        previous = c;
    }
    None
}

/// Splits at the first `::` outside generic arguments.
fn split_top_level(path: &'static str) -> Option<(&'static str, &'static str)> {
    let mut depth = 0_usize;
    let bytes = path.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                return Some((&path[..index], &path[index + 2..]));
            }
            _ => {}
        }
    }
    None
}

fn strip_closures(mut function: &'static str) -> &'static str {
    while let Some(outer) = function.strip_suffix(CLOSURE_SEGMENT) {
        function = outer.strip_suffix(PATH_SEPARATOR).unwrap_or(outer);
    }
    function
}
