//! Approval workflow for the AgroBusiness marketplace.
//!
//! Producers and clients propose catalog and order mutations, the
//! proposals live as pending approval records in a remote JSON store,
//! and an administrator approves or rejects them. Only approved
//! proposals are executed against the live collections; admins write
//! to them directly.

pub mod approval;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod memory;
pub mod orders;
pub mod repository;
pub mod service;
pub mod session;
pub mod store;
pub mod utils;
