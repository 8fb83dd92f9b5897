pub mod product;

pub use product::{Product, ProductCandidate, ProductValidator, ValidationError};
