//! Adapter implementations
//!
//! Adapters implement the port traits and wrap external technologies:
//! - File-backed session storage for the SessionStore port
//! - HTTP client for the remote REST backend
//! - Mock backend server for tests

pub mod file_store;
pub mod rest;

#[cfg(test)]
pub mod rest_mock;
