//! HTTP protocol helpers.
//!
//! Everything in this module is a pure, context-free helper around the
//! reactor: parsing a buffered request line, classifying request errors,
//! mapping file extensions to content types, and formatting/sending
//! responses. None of it owns a socket or participates in readiness
//! handling.
//!
//! - [`request`] — request-line parsing
//! - [`response`] — status codes, header formatting, send and file-transfer loops
//! - [`mime`] — extension → content-type lookup
//! - [`error`] — the request error taxonomy (400/403/404/405/500)

pub mod error;
pub mod mime;
pub mod request;
pub mod response;
