//! learngate — same-origin gateway for an AI-assisted learning product.
//!
//! SYSTEM CONTEXT
//! ==============
//! All business logic (question generation, scoring, AI chat, user storage)
//! lives in an external backend API. This crate is the thin tier in front of
//! it: the proxy/auth gateway routes that manage the cookie session, plus
//! the client-side plumbing (session store, typed Learn API client) the
//! product's views drive.

pub mod config;
pub mod envelope;
pub mod routes;
pub mod services;
pub mod state;
pub mod token;
