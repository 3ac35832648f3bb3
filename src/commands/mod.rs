//! Command handler layer.
//!
//! ## Files
//! - `convert.rs` — the conversion run (enumerate, transform, splice, write).
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod convert;
