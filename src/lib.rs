//! # blogsphere
//!
//! Client core for the BlogSphere blogging API: an observable session store,
//! an HTTP client that silently refreshes an expired access token once per
//! request, a route table with an auth guard, and typed wrappers for every
//! REST endpoint.
//!
//! The `blogsphere` binary drives the same core from the command line.

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod posts;
pub mod routes;
pub mod state;

pub use app::App;
pub use config::ClientConfig;
pub use error::ApiError;
