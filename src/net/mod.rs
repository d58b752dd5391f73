//! Networking for the blog REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` performs raw HTTP exchanges, `interceptor` adds the one-shot
//! token refresh on 401, `api` exposes one typed method per endpoint, and
//! `types` defines the wire schema.

pub mod api;
pub mod interceptor;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
