//! UI components for the Image Hub application.
//!
//! # Layout Components
//! - [`Header`] - title bar with the upload button
//! - [`Footer`] - page footer
//!
//! # Feature Components
//! - [`SearchInput`] - text or image search bar
//! - [`ImageGrid`] - result grid with infinite scroll
//! - [`ImageModal`] - detail view with related images and keyboard navigation
//! - [`UploadModal`] - metadata form and file upload

mod footer;
mod header;
mod image_grid;
mod image_modal;
mod search_input;
mod upload_modal;

pub use footer::*;
pub use header::*;
pub use image_grid::*;
pub use image_modal::*;
pub use search_input::*;
pub use upload_modal::*;
