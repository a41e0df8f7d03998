//! File entry points built on the stream facade.
//!
//! The file handle lives exactly as long as the call (or the returned
//! reader) and is closed on every exit path when it is dropped.

pub mod load;

pub use load::{detect_file, is_binary_file, open_file, read_file_text};
