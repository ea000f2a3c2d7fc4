// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Call site capture across modules, methods, closures and async bodies.

use errsite::{AnnotatedError, Annotate, Site};

mod storage {
    use errsite::AnnotatedError;

    pub struct Disk;

    impl Disk {
        pub fn write(&self) -> AnnotatedError {
            errsite::new!("disk full")
        }
    }

    pub trait Store {
        fn save(&self) -> AnnotatedError;
    }

    impl Store for Disk {
        fn save(&self) -> AnnotatedError {
            errsite::new!("read only")
        }
    }

    impl std::fmt::Display for Disk {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", errsite::site!())
        }
    }

    pub struct Wrapper<T>(pub T);

    impl<T: Clone> Wrapper<T> {
        pub fn get(&self) -> Result<T, AnnotatedError> {
            Err(errsite::new!("empty"))
        }
    }

    impl<T> Store for Wrapper<T> {
        fn save(&self) -> AnnotatedError {
            let make = || errsite::new!("read only");
            make()
        }
    }

    pub fn flush() -> AnnotatedError {
        errsite::new!("flush failed")
    }

    pub mod nested {
        pub fn deep() -> errsite::Site {
            errsite::site!()
        }
    }
}

fn from_closure() -> AnnotatedError {
    let make = || errsite::new!("inside closure");
    make()
}

#[test]
fn module_is_innermost_segment() {
    assert_eq!(storage::flush().site().to_string(), "storage.flush");
    assert_eq!(storage::nested::deep().to_string(), "nested.deep");
}

#[test]
fn methods_include_their_type() {
    assert_eq!(storage::Disk.write().site().to_string(), "storage.Disk::write");
}

#[test]
fn trait_impl_methods_include_their_type() {
    use storage::Store;

    assert_eq!(storage::Disk.save().site().to_string(), "storage.Disk::save");
    assert_eq!(storage::Disk.to_string(), "storage.Disk::fmt");
    assert_eq!(storage::Wrapper(1_u8).save().site().to_string(), "storage.Wrapper::save");
}

#[test]
fn generic_type_methods_drop_type_arguments() {
    let error = storage::Wrapper(String::from("x")).get().unwrap_err();
    assert_eq!(error.site().to_string(), "storage.Wrapper::get");
    assert_eq!(error.site().owner(), Some("Wrapper"));
    assert_eq!(error.to_string(), "[storage.Wrapper::get] empty");
}

#[test]
fn closures_report_enclosing_function() {
    assert_eq!(from_closure().site().to_string(), "site_capture.from_closure");
}

async fn fetch() -> Site {
    async { errsite::site!() }.await
}

#[tokio::test]
async fn async_blocks_report_enclosing_function() {
    let site = fetch().await;
    assert_eq!(site.function(), "fetch");
    assert_eq!(site.module(), "site_capture");
}

#[test]
fn location_points_at_the_call() {
    let line = line!() + 1;
    let site = errsite::site!();

    let location = site.location().unwrap();
    assert_eq!(location.line, line);
    assert!(location.file.ends_with("site_capture.rs"));
}

#[test]
fn explicit_sites() {
    let error = errsite::create(Site::new("config", "load"), ["missing", "key"]);
    assert_eq!(error.to_string(), "[config.load] missing key");
    assert!(error.site().location().is_none());

    let unknown = AnnotatedError::new(Site::new("", ""), "lost");
    assert!(unknown.site().is_unknown());
    assert_eq!(unknown.to_string(), "[unknown.unknown] lost");
}

#[test]
fn annotate_extension_with_captured_site() {
    let result: Result<(), std::io::Error> = Err(std::io::Error::other("denied"));
    let error = result.annotate(errsite::site!(), "opening file").unwrap_err();
    assert_eq!(error.to_string(), "[site_capture.annotate_extension_with_captured_site] opening file -> denied");
}
