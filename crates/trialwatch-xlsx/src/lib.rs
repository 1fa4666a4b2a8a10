//! Spreadsheet backend for the Trialwatch datasets.
//!
//! Reads the four oversight workbooks with [`calamine`], joins site
//! locations onto subjects, and memoizes the result until one of the files
//! changes on disk. Parsing runs on tokio's blocking pool so it never stalls
//! the async runtime.

mod decode;
mod schema;
mod source;

pub mod error;

pub use error::{Error, Result};
pub use source::{DataFiles, WorkbookSource};
