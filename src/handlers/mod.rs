// handlers/mod.rs - Two-tier handler layout
//
// Public (no key) → Protected (X-API-Key)
pub mod protected; // POST/PUT/DELETE /products
pub mod public; // GET /products, GET /products/:id, GET /health
pub mod utils;
