//! Registration backend client for regdesk
//!
//! - [`RegistrationApi`]: the listing and status-update endpoints as an
//!   async trait
//! - [`HttpRegistrationClient`]: `reqwest` implementation with bearer-token
//!   auth and a request timeout
//! - [`JsonFileApi`]: read-only implementation over an exported JSON file
//! - [`Dashboard`]: controller that feeds API responses through the view
//!   state reducer
//!
//! # Architecture
//!
//! ```mermaid
//! graph LR
//!     D[Dashboard] -->|list / update| A[RegistrationApi]
//!     A --> H[HttpRegistrationClient]
//!     A --> F[JsonFileApi]
//!     D -->|Action| S[ViewState]
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod offline;

pub use api::{EventScope, RegistrationApi};
pub use dashboard::{Dashboard, LoadOutcome};
pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, HttpRegistrationClient};
pub use offline::JsonFileApi;
