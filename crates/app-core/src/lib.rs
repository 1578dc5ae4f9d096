//! Core application logic for Circely
//!
//! This crate provides the domain services behind the Circely client: the
//! simulated authentication flows, the account service over the REST client,
//! circles, recovery locations and the map model, the personal log, the
//! sobriety counter with its ticker, the daily encouragement message, and
//! the home updates deck content.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod auth;
pub mod checkin;
pub mod circles;
pub mod encouragement;
pub mod journal;
pub mod locations;
pub mod sobriety;
pub mod updates;
