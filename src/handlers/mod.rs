// handlers/mod.rs - Two handler tiers
//
// Public (no auth) → Protected (JWT auth, tenant-scoped)
pub mod protected; // JWT authentication required (/api/*)
pub mod public; // No authentication required (/, /health, /auth/*)
