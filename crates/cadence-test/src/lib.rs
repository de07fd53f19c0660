//! Cadence Test - shared test utilities.
//!
//! Mocks for the collaborators of the router and the dispatcher, and
//! fixtures that lay out a throwaway install tree.
//!
//! ```toml
//! [dev-dependencies]
//! cadence-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use cadence_test::{MockSurface, TestInstall};
//!
//! #[tokio::test]
//! async fn test_play() {
//!     let surface = MockSurface::ready();
//!     let dispatcher = DeepLinkDispatcher::new(surface.clone());
//!     dispatcher.handle("cadence://play/abc123").await;
//!     assert_eq!(surface.sent().len(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
