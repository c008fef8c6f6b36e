// src/error.rs

//! Error type shared by the library. Application code (the binary and the
//! frame loop) wraps these in `anyhow::Error` with context.

use crate::actor::ActorId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootError {
    /// An image path that does not exist.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// An image path that points at a directory.
    #[error("the given path points to a folder, not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// An image file whose extension is not one of jpg, jpeg, png, gif.
    #[error("file type '{0}' is not supported (expected jpg, jpeg, png or gif)")]
    UnsupportedFormat(String),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A query that needs a world was made before one was set.
    #[error("create a World first (no active world)")]
    NoWorld,

    /// A kind name that no actor type has been registered under.
    #[error("'{0}' is not a registered actor kind")]
    NotAnActor(String),

    #[error("the key '{0}' was not found; see ferrofoot::all_keys() for valid names")]
    UnknownKey(String),

    #[error("mouse button '{0}' is not one of left, right, middle")]
    UnknownButton(String),

    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// `get_closest` found no other actor of the requested kind.
    #[error("no other actor of kind {0} exists")]
    NoCandidates(&'static str),

    #[error("actor {0:?} is not in this world")]
    UnknownActor(ActorId),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

pub type Result<T, E = FootError> = std::result::Result<T, E>;
