// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tests for the assertions exported under the `test-util` feature.

use errsite::{AnnotatedError, assert_chain_sites, assert_site};

fn query() -> AnnotatedError {
    errsite::new!("timeout")
}

fn handle() -> AnnotatedError {
    errsite::wrap!(query(), "loading user")
}

#[test]
fn asserts_captured_site() {
    assert_site!(query(), "test_util.query");
}

#[test]
fn asserts_whole_chain() {
    assert_chain_sites!(handle(), ["test_util.handle", "test_util.query"]);
}

#[test]
#[should_panic(expected = "right: test_util.query")]
fn reports_mismatched_site() {
    assert_site!(query(), "test_util.handle");
}
