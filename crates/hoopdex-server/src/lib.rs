//! REST API server: routes, DTOs, configuration, startup, and OpenAPI docs.

pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
