//! Read paths over placed orders.

use tracing::debug;

use super::error::{OrderError, OrderResult};
use super::OrderService;
use myshop_core::validation::validate_identifier;
use myshop_core::{Order, Page, PageRequest};

impl OrderService {
    /// One order with its lines in request order.
    pub async fn get_order(&self, order_id: &str) -> OrderResult<Order> {
        validate_identifier("order_id", order_id)?;

        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// A page of the user's orders, newest first, with the total count.
    ///
    /// `page` and `page_size` below 1 or absent fall back to 1 and 10.
    pub async fn get_user_orders(
        &self,
        user_id: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> OrderResult<Page<Order>> {
        validate_identifier("user_id", user_id)?;

        let request = PageRequest::from_params(page, page_size);
        debug!(user_id = %user_id, page = request.page, page_size = request.page_size, "Fetching user orders");

        Ok(self.db.orders().list_by_user(user_id, request).await?)
    }
}
