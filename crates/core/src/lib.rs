//! Menu Cart Core - cart, pricing and order logic for a single-vendor storefront.
//!
//! This crate is shared by every Menu Cart component:
//! - `storefront` - Checkout orchestration, file persistence and the hosted backend client
//! - `cli` - Command-line shopper for local catalogs
//!
//! # Architecture
//!
//! The core crate holds domain types and pure logic. The only I/O boundary is
//! the [`persistence::CartStore`] trait, which callers implement. No HTTP, no
//! filesystem, no clock: the current time is always passed in.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and currencies, order statuses
//! - [`catalog`] - Vendor profiles, products and menu items, favorites
//! - [`customization`] - Customization groups and validated selections
//! - [`cart`] - The single-vendor cart and its persisted engine
//! - [`persistence`] - Storage contract for cart sessions
//! - [`pricing`] - Subtotal, delivery and service fees, grand total
//! - [`coupon`] - Coupon validation and discount computation
//! - [`order`] - Order assembly and chat message rendering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod customization;
pub mod order;
pub mod persistence;
pub mod pricing;
pub mod types;

pub use types::*;
