//! IP allowlist access-control core.
//!
//! Exposes the address parser, the ACL store, the admission evaluator and
//! the admin facade. HTTP routing, session auth and UI rendering live in
//! the embedding service, not here.

pub mod acl;
pub mod addr;
pub mod admin;
pub mod config;
pub mod db;
pub mod error;
