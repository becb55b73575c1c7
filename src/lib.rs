//! # regform
//!
//! Terminal registration form over a remote `/users` REST resource.
//!
//! The [`controller::FormController`] holds the form fields, the last
//! fetched users, a loading gate, and an auto-dismissing status message.
//! It talks to the backend only through [`net::api::UsersApi`]. The
//! `session` module is the interactive input layer, `render` turns the
//! state into text.

pub mod config;
pub mod controller;
pub mod net;
pub mod render;
pub mod session;
pub mod state;
