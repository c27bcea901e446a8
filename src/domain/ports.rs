use crate::domain::model::{
    Order, OrderStatus, Priority, ReportHandle, ReportRow, ServiceResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 訂單持久層
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn fetch_orders_by_user(&self, user_id: u64) -> Result<Vec<Order>>;

    async fn update_order_status(
        &self,
        order_id: u64,
        status: OrderStatus,
        priority: Priority,
    ) -> Result<bool>;
}

/// 遠端服務，每筆 B 類訂單呼叫一次
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn invoke(&self, order_id: u64) -> Result<ServiceResponse>;
}

/// 只能追加的報表輸出
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// 建立報表並寫入標題列
    async fn create_report(&self, name: &str) -> Result<ReportHandle>;

    /// 一次寫入同一筆訂單的所有列
    async fn append_rows(&self, report: &ReportHandle, rows: &[ReportRow]) -> Result<()>;
}
