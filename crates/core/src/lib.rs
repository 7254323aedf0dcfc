//! # Salonsync Core
//!
//! Domain layer for the Salonsync booking engine. This crate holds the
//! value types for the salon calendar (services, business hours, exceptions,
//! bookings, settings), the error taxonomy shared by every layer, and the
//! pure scheduling algorithms that turn a day's calendar into bookable slots.
//!
//! Nothing in this crate performs I/O. Persistence lives in `salonsync-db`
//! and the HTTP surface in `salonsync-api`; both call into the functions
//! defined here.

/// Error taxonomy shared across all layers
pub mod errors;
/// Calendar, service, booking and settings value types
pub mod models;
/// Pure scheduling algorithms: day resolution, slot generation, availability
pub mod scheduling;
