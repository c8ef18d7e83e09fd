//! Order dispatcher trait definition.

use crate::error::{FetchError, OrderError};
use crate::types::{Order, OrderRequest, Position};
use async_trait::async_trait;

/// Trait for broker order handling.
///
/// The broker owns positions; the bot only reads them and changes them by
/// placing orders.
#[async_trait]
pub trait OrderDispatcher: Send + Sync {
    /// Get all open positions on the account.
    async fn open_positions(&self) -> Result<Vec<Position>, FetchError>;

    /// Place an order.
    ///
    /// # Returns
    /// The broker's receipt with ID and initial status
    async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError>;

    /// Get the current state of a previously placed order.
    async fn get_order(&self, order_id: &str) -> Result<Order, OrderError>;

    /// Get the dispatcher name.
    fn name(&self) -> &str;
}
