//! Shared client-side state.
//!
//! DESIGN
//! ======
//! Only the session lives here; post lists are fetched per view and not
//! cached.

pub mod session;
