//! Provider adapter trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::providers::{ProviderDetails, ProviderId};
use crate::quotes::QuoteResult;
use crate::routes::RouteParameters;

/// A source of freight quotes for one provider
///
/// Implementations absorb every upstream failure into classified
/// [`QuoteResult::Failure`] entries, so a call never fails as a whole.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
	fn id(&self) -> ProviderId;

	fn details(&self) -> ProviderDetails {
		self.id().details()
	}

	/// Zero, one or two entries: standard and rush offers are separate
	async fn quote(&self, params: &RouteParameters) -> Vec<QuoteResult>;
}
