use adintel_core::IntelConfig;

use crate::client::CompetitorClient;
use crate::error::CompetitorError;
use crate::state::CompetitorState;
use crate::storage::{JsonFileStore, WatchlistStore};

/// The competitor intelligence desk: owns the REST client, the explicit
/// state container, and the watchlist persistence port.
///
/// All operations are `&mut self`, so state mutations from one call are
/// fully applied before the next can observe anything. A caller sharing
/// the desk across tasks decides its own interior-mutability strategy.
pub struct CompetitorDesk {
    pub(crate) client: CompetitorClient,
    pub state: CompetitorState,
    pub(crate) store: Box<dyn WatchlistStore>,
    pub(crate) config: IntelConfig,
}

impl CompetitorDesk {
    /// Desk with the JSON-file watchlist store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Http`] if the HTTP client cannot be built.
    pub fn new(config: IntelConfig) -> Result<Self, CompetitorError> {
        let store = Box::new(JsonFileStore::new(config.watchlist_path.clone()));
        Self::with_store(config, store)
    }

    /// Desk with a caller-supplied watchlist store.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Http`] if the HTTP client cannot be built.
    pub fn with_store(
        config: IntelConfig,
        store: Box<dyn WatchlistStore>,
    ) -> Result<Self, CompetitorError> {
        let client = CompetitorClient::new(&config)?;
        Ok(Self {
            client,
            state: CompetitorState::new(),
            store,
            config,
        })
    }
}
