//! # trianglem-reader
//!
//! A reader for TriangleM engine script archives (`.memfs` index +
//! `.membody` payload pairs), recovering the scenes and dialogue text of
//! the engine's `.tat` scripts.
pub mod trianglem;

// Re-export the main types for convenience
pub use trianglem::{
    error::{FormatError, Result},
    models::{DecodedBlob, DialogueUnit, FileEntry, LineKind, Scene},
    ScriptArchive,
};
