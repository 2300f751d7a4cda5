use std::sync::Arc;

use crate::{config::Config, storage::Storage};

/// Facade entry point: configuration, the shared HTTP client, and the
/// injected storage port. Stateless beyond these handles; every operation
/// re-reads its source.
pub struct Portal {
    pub config: Config,
    pub(crate) http: reqwest::Client,
    pub(crate) storage: Arc<dyn Storage>,
}

impl Portal {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            storage,
        }
    }
}
