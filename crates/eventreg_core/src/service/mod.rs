//! Use-case services.
//!
//! # Responsibility
//! - Validate caller input before the aggregate is touched.
//! - Persist the aggregate after every accepted mutation.
//! - Keep callers decoupled from storage details.

pub mod registration_service;
