//! HTTP collaborator for the `/users` resource.
//!
//! DESIGN
//! ======
//! `types` owns the wire records, `api` owns the transport. The controller
//! depends only on the [`api::UsersApi`] trait so tests can substitute an
//! in-memory backend.

pub mod api;
pub mod types;
