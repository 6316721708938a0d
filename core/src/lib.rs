//! # Image Hub - client core
//!
//! Platform-independent logic behind the Image Hub search UI. The Leptos
//! frontend drives these types from reactive signals; nothing here touches
//! the browser, so every rule is testable natively.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   SearchEvent   ┌────────────────┐  descriptor  ┌────────────────────┐
//! │ SearchInput  │────────────────▶│ PageController │─────────────▶│ InfiniteQueryCache │
//! │    State     │                 │                │              │  (tickets, pages)  │
//! └──────────────┘                 └───────┬────────┘              └─────────┬──────────┘
//!                                          │ selected                        │ records
//!                                          ▼                                 ▼
//!                                   ┌─────────────┐                  ┌───────────────┐
//!                                   │ RelatedCache│                  │  navigation   │
//!                                   └─────────────┘                  └───────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - API and validation errors
//! - [`config`] - endpoints, page size, timeout and retry policy
//! - [`models`] - image records, search types, upload metadata
//! - [`search`] - search descriptors, cache keys, request shapes
//! - [`pagination`] - the paginated query cache
//! - [`related`] - related-images cache
//! - [`search_input`] - search bar state machine
//! - [`navigation`] - keyboard navigation in the detail modal
//! - [`upload`] - upload draft and validation
//! - [`controller`] - home page state machine

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Searching
pub mod pagination;
pub mod related;
pub mod search;
pub mod search_input;

// Page state
pub mod controller;
pub mod navigation;
pub mod upload;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{HubConfig, RetryPolicy};
pub use controller::{PageController, SearchChange};
pub use error::{ApiError, ApiResult, HubError, HubResult, ValidationError, ValidationResult};
pub use models::{FileInfo, ImageMetadata, ImageRecord, MetadataField, SearchType};
pub use navigation::KeyCommand;
pub use pagination::{flatten_pages, FetchTicket, InfiniteQueryCache, QueryState, Resolution, ResultPage};
pub use related::{RelatedCache, RelatedState, RelatedTicket};
pub use search::{Method, PageRequest, QueryKey, SearchDescriptor, SearchMode};
pub use search_input::{SearchEvent, SearchInputState};
pub use upload::{UploadDraft, UploadPayload, UploadStatus};
