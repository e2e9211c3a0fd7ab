//! Competitor ad intelligence core.
//!
//! Aggregates competitor-ad search results from heterogeneous platforms
//! (Facebook-style ad library, Google Ads Transparency, TikTok Creative
//! Center, generic web search) into one canonical response shape, tracks the
//! ads a user selects for AI analysis, and maintains a persisted watchlist of
//! recurring searches with "has new results" detection.
//!
//! The entry point is [`CompetitorDesk`]: it owns the REST client, the
//! explicit [`state::CompetitorState`] container, and the watchlist
//! persistence port. Consumers read state after awaiting an operation; no
//! global singletons are involved.

pub mod client;
pub mod error;
pub mod history;
pub mod normalize;
pub mod search;
pub mod selection;
pub mod state;
pub mod storage;
pub mod types;
pub mod watchlist;

mod desk;

pub use client::CompetitorClient;
pub use desk::CompetitorDesk;
pub use error::CompetitorError;
pub use state::CompetitorState;
pub use storage::{JsonFileStore, MemoryStore, WatchlistStore};
pub use types::{
    AiProvider, CompetitorAd, ErrorCode, Platform, PlatformResponse, PlatformStatus,
    RawSearchPayload, ResponseMode, SearchQuery, WatchlistActivity, WatchlistItem,
};
pub use watchlist::NewWatchlistItem;
