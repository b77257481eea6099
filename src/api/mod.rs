//! Remote API plumbing.
//!
//! - [`Transport`] — the seam between the fetcher and the wire; fakes
//!   implement it in tests
//! - [`HttpTransport`] — the real blocking HTTP client
//! - [`script`] — VKScript builder for batched history calls

mod transport;

pub mod script;

pub use transport::{HttpTransport, Transport};
