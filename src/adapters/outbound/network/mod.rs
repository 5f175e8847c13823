/// Network adapters for the remote recalculation API
mod caching_recalculation_client;
mod debounced_recalculator;
mod recalculation_client;
mod token_providers;

pub use caching_recalculation_client::{
    CachingRecalculationClient, RecalculationCacheSettings, RecalculationCacheStats,
};
pub use debounced_recalculator::{DebouncedRecalculator, DEFAULT_DEBOUNCE};
pub use recalculation_client::{GraphRecalculationClient, DEFAULT_TIMEOUT, RECALCULATE_PATH};
pub use token_providers::{EnvTokenProvider, StaticTokenProvider};
