// handlers/protected/mod.rs - Protected handlers (X-API-Key required)
//
// Mutating product routes. The router wraps this group in the API key gate.

pub mod products;
