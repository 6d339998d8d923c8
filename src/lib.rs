//! Core pipeline for the hostpie profile viewer.
//!
//! Everything here is pure and builds natively: the profile parser
//! ([`profile`]), the pie-slice geometry ([`pie`]) and the value color scale
//! ([`color`]). The browser glue (drag/drop, canvas rendering, persistence)
//! lives in `crates/hostpie_web` and consumes this crate unchanged.

pub mod color;
pub mod pie;
pub mod profile;
