//! Transit arrivals gateway.
//!
//! Answers "what is arriving at this stop in the next N minutes?". A core
//! node computes arrivals itself; a public node forwards each lookup to a
//! core node using a shared secret.

pub mod cache;
pub mod config;
pub mod domain;
pub mod format;
pub mod gate;
pub mod resolver;
pub mod source;
pub mod upstream;
pub mod web;
