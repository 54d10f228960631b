//! Types generated from `schemas/showcase.nsd` by the build script.

pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/showcase.rs"));
}

pub use generated::showcase;
