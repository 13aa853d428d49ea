//! Scripted providers for tests of code built on [`crate::ProviderManager`].
//!
//! Enabled by the `test-utils` feature.

mod mock_provider;

pub use mock_provider::{MockBehavior, MockProvider};

use fablewright_interface::StoryProvider;
use std::sync::Arc;

/// Erase mock types into the handles the manager stores.
pub fn handles(mocks: &[&MockProvider]) -> Vec<Arc<dyn StoryProvider>> {
    mocks
        .iter()
        .map(|m| Arc::new((*m).clone()) as Arc<dyn StoryProvider>)
        .collect()
}
