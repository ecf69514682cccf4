//! Image upload gateway
//!
//! Accepts image uploads over HTTP, stores them in an S3 bucket under a key
//! derived from the request fields, and hands out time-limited download links.

/// Upload form parsing, validation and object key derivation
pub mod images;

/// Object storage client and its S3 implementation
pub mod object_store;

/// HTTP routes
pub mod routes;

/// Router construction and server bootstrap
pub mod server;

/// Configuration, errors and extractors
pub mod types;
