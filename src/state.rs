use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::store::ProductStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub auth: AuthKeys,
}
