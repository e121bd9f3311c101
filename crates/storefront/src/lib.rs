//! Menu Cart Storefront library.
//!
//! Everything in Menu Cart that touches the outside world: environment
//! configuration, the JSON session file, the hosted backend, chat deep links,
//! and the checkout service that ties them to the core cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use checkout::{ChatCheckout, CheckoutService, SubmittedOrder};
pub use error::{CheckoutError, ErrorKind};
