//! Route configuration.

pub mod routes;
