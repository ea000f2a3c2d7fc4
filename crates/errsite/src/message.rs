// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use compact_str::CompactString;

/// Joins message parts with a single space.
///
/// Used by the `new!` and `wrap!` macros; an empty iterator yields an empty message.
pub fn join_parts<I>(parts: I) -> CompactString
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut message = CompactString::default();
    for (index, part) in parts.into_iter().enumerate() {
        if index > 0 {
            message.push(' ');
        }
        message.push_str(part.as_ref());
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_space() {
        assert_eq!(join_parts(["db", "timeout"]), "db timeout");
        assert_eq!(join_parts(vec![String::from("saving"), String::from("file")]), "saving file");
    }

    #[test]
    fn empty_parts() {
        assert_eq!(join_parts(Vec::<&str>::new()), "");
        assert_eq!(join_parts([""]), "");
        assert_eq!(join_parts(["", "x"]), " x");
    }
}
