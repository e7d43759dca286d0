use std::sync::Arc;

use tokio::sync::Mutex;
use vantage_core::providers::finance::FinanceProvider;
use vantage_core::{
    Config, HttpClient, KeyValueStore, OAuthConfig, OrderStore, ReorderController, TokenStore,
    WidgetRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WidgetRegistry>,
    /// Every move is applied to the latest committed order, one at a time.
    pub reorder: Arc<Mutex<ReorderController>>,
    pub tokens: TokenStore,
    pub oauth: Arc<OAuthConfig>,
    pub finance: Arc<FinanceProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, client: Arc<dyn HttpClient>, config: &Config) -> Self {
        let tokens = TokenStore::new(store.clone()).with_default_ttl(std::time::Duration::from_secs(
            config.music.default_ttl_secs,
        ));
        Self {
            registry: Arc::new(WidgetRegistry::new()),
            reorder: Arc::new(Mutex::new(ReorderController::new(OrderStore::new(store)))),
            tokens,
            oauth: Arc::new(OAuthConfig::from(&config.music)),
            finance: Arc::new(FinanceProvider::new(client, config.finance.clone())),
        }
    }
}
