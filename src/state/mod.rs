//! Client-side state for the registration form.
//!
//! DESIGN
//! ======
//! State is split by concern so the controller composes small pieces:
//! `form` holds the input fields, `loading` gates user-triggered actions,
//! and `notifier` owns the auto-dismissing status message.

pub mod form;
pub mod loading;
pub mod notifier;
