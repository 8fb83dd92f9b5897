// handlers/public/mod.rs - Public handlers (no API key required)
//
// Read-only product access and health checks.

pub mod health;
pub mod products;

pub use health::health;
pub use products::ProductPage;
