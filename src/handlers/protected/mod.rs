// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
//
// Every handler here reads the `Principal` the middleware inserted; tenant
// data is always filtered by the principal's company.

pub mod auth;
pub mod catalog;
