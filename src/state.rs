use std::sync::Arc;

use crate::client::TaskApi;
use crate::snackbar::Snackbar;

/// Collaborators every screen is constructed with.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn TaskApi>,
    pub snackbar: Snackbar,
}

impl AppState {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            snackbar: Snackbar::new(),
        }
    }
}
