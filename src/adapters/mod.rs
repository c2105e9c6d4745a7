//! Port implementations.
//!
//! `live` talks to the real systems, `recording` wraps live adapters and
//! captures every call into a cassette, and `replaying` serves a cassette
//! back without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
