//! The base module contains the shared infrastructure of the configuration front end.

pub mod source_file;

mod error;
#[doc(inline)]
pub use error::{Error, Result};

mod file_provider;
pub use file_provider::{FileProvider, FsProvider, MemoryProvider};

pub mod log;
