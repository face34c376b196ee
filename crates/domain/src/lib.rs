//! # emuhub-domain
//!
//! Pure domain model for the emuhub smart-home emulation system.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Device kinds** (the fixed set of five virtual devices) and
//!   their topic/cadence scheme
//! - Define **Device values** and the bit-exact wire payload formats
//! - Define **Room events** (normalized router output consumed by the
//!   presentation layer)
//! - Define **Reading records** (persisted historical readings)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod device;
pub mod event;
pub mod reading;
pub mod value;
