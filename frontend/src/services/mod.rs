//! Catalog API services.
//!
//! # Services
//!
//! - [`client`] - configured HTTP client (headers, timeout, retry)
//! - [`search`] - text, image and related-image fetches
//! - [`upload`] - image creation
//! - [`queries`] - reactive hooks wrapping the core caches

pub mod client;
pub mod queries;
pub mod search;
pub mod upload;

pub use client::*;
pub use queries::*;
pub use search::*;
pub use upload::*;
