// Wellness Control Plane Library
// Decision: Shared library for binaries (API server, OpenAPI export) and HTTP tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Router assembly
pub mod app;
pub use app::build_app;

// Authentication module
pub mod auth;

// Server configuration
pub mod config;

// Services layer
pub mod services;
pub use services::SessionService;

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;
