//! Gateway services used by the HTTP routes and the client-side plumbing.
//!
//! ARCHITECTURE
//! ============
//! `forward` owns backend request construction/execution so route handlers
//! stay focused on cookie plumbing and response policy. `session` and
//! `learn` are the client side of the product: the session store and the
//! typed API layer the views call.

pub mod forward;
pub mod learn;
pub mod session;
