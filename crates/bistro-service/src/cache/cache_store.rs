//! Cache store trait.

use async_trait::async_trait;
use bistro_core::BistroResult;
use shaku::Interface;

/// Shared key/value store with set-valued collections.
///
/// Values are opaque strings. There is no expiry: entries leave the store
/// only through [`CacheStore::delete`]. No call is transactional and there is
/// no compare-and-swap, so concurrent writers to the same key are
/// last-write-wins.
///
/// Every transport failure (connection, timeout, protocol) is reported as
/// `BistroError::Cache`.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Gets the value stored under `key`.
    async fn get(&self, key: &str) -> BistroResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> BistroResult<()>;

    /// Deletes `key`.
    ///
    /// Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> BistroResult<bool>;

    /// Adds `member` to the set stored under `collection`.
    ///
    /// Returns `true` if the member was not already present.
    async fn set_add(&self, collection: &str, member: &str) -> BistroResult<bool>;

    /// Removes `member` from the set stored under `collection`.
    ///
    /// Returns `true` if the member was present.
    async fn set_remove(&self, collection: &str, member: &str) -> BistroResult<bool>;

    /// Lists the members of the set stored under `collection`.
    async fn set_members(&self, collection: &str) -> BistroResult<Vec<String>>;

    /// Round-trips to the store to confirm it is reachable.
    async fn ping(&self) -> BistroResult<()>;
}
