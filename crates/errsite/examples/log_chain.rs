// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Logs an annotated chain produced by a small layered program.
//!
//! The storage layer fails with a foreign I/O error, the repository wraps it, a second
//! independent failure is joined in, and the handler annotates the result. The chain is
//! printed in both rendered forms and logged with one `tracing` event per node.

use errsite::{AnnotatedError, Link, annotate};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod storage {
    use errsite::AnnotatedError;

    pub fn write_block(block: u32) -> Result<(), AnnotatedError> {
        let error = std::io::Error::new(std::io::ErrorKind::StorageFull, "no space left on device");
        Err(errsite::wrapf!(error, "writing block {block}"))
    }

    pub fn sync_index() -> Result<(), AnnotatedError> {
        Err(errsite::new!("index", "locked"))
    }
}

mod repository {
    use errsite::{AnnotatedError, annotate};

    use crate::storage;

    #[annotate("saving user {id}")]
    pub fn save_user(id: u32) -> Result<(), AnnotatedError> {
        let written = storage::write_block(id * 8);
        let synced = storage::sync_index();

        match errsite::join!(written.err(), synced.err()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[annotate("handling request")]
fn handle_request() -> Result<(), AnnotatedError> {
    repository::save_user(42)
}

fn log_chain(error: &AnnotatedError) {
    tracing::error!(site = %error.site(), detail = error.message(), "request failed");

    for link in error.links() {
        match link {
            Link::Annotated(node) => tracing::error!(site = %node.site(), detail = node.message(), "caused by"),
            Link::Foreign(foreign) => tracing::error!(detail = %foreign, "caused by foreign error"),
            Link::Joined(joined) => tracing::error!(members = joined.members().len(), "caused by joined errors"),
        }
    }
}

fn main() {
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()).init();

    let Err(error) = handle_request() else {
        return;
    };

    println!("{error}");
    println!();
    println!("{error:#}");
    println!();

    log_chain(&error);
}
