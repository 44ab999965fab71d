use crate::core::errors::Result;
use crate::core::models::public_key::PublicKey;

/// Port for turning raw key-listing output into key records.
///
/// Only `ColonListingParser` ships today; the trait keeps the invoker
/// independent of the backend's listing format.
pub trait KeyListingParser: Send + Sync {
    /// Parse the full listing into records, in first-seen order.
    fn parse(&self, raw: &str) -> Result<Vec<PublicKey>>;
}
