//! Core business entities as plain data records.
//!
//! Persistence is handled by the repository implementations in
//! `crate::infrastructure::persistence`; entities never talk to the
//! database themselves.

pub mod click;
pub mod short_link;
pub mod user;

pub use click::{Click, NewClick};
pub use short_link::{NewShortLink, ShortLink};
pub use user::User;
