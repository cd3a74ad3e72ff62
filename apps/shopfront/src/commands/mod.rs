//! # Command Module
//!
//! The shopfront's API surface: async functions over focused state
//! types. Each command declares exactly the state it needs, returns
//! `Result<T, ApiError>`, and never panics across the boundary.
//!
//! ## Command Groups
//!
//! - [`product`] - Search, CRUD, stock adjustments, scan lookup, dashboard
//! - [`bundle`] - Bundle view, prefix/bundle filters, duplicate report
//! - [`billing`] - Draft bill lifecycle, finalize, share, print
//! - [`auth`] - Sign-in presence tracking

pub mod auth;
pub mod billing;
pub mod bundle;
pub mod product;
