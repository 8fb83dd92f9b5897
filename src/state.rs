use std::sync::Arc;

use crate::database::models::ProductValidator;
use crate::database::repository::ProductRepository;

/// Shared handler state. Cloned per request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub validator: ProductValidator,
    /// Expected `X-API-Key` value. `None` rejects every mutating request.
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        validator: ProductValidator,
        api_key: Option<String>,
    ) -> Self {
        Self {
            products,
            validator,
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}
