// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Utilities for testing rendered chains.

/// Asserts that the rendered error matches `pattern` once every site tag is replaced
/// with `[*]`.
///
/// Site tags depend on the module the test lives in, so patterns are written against
/// the normalized text.
///
/// # Example
///
/// ```
/// let error = errsite::wrap!(errsite::new!("timeout"), "loading user");
/// assert_rendered!(error, "[*] loading user -> [*] timeout");
/// ```
#[macro_export]
macro_rules! assert_rendered {
    ($error:expr, $expected:expr) => {{
        let rendered = $error.to_string();
        let re = regex::Regex::new(r"\[\w+\.[\w:]+\]").unwrap();
        let normalized = re.replace_all(&rendered, "[*]");
        assert_eq!(normalized, $expected, "rendered error: {rendered}");
    }};
}
