//! Document-root filesystem access.
//!
//! [`resolve`] maps request targets to files under the configured root,
//! applying the default-document rule and the traversal guard; [`File`] is
//! the owned read-only handle a successful resolution yields.

mod file;
pub mod resolve;

pub use file::File;
