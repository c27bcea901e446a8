use crate::domain::model::{
    Order, OrderStatus, OrderType, Priority, ReportHandle, ReportRow, ResponseStatus,
    ServiceResponse,
};
use crate::domain::ports::{OrderRepository, RemoteService, ReportSink};
use serde::{Deserialize, Serialize};

/// 分流規則使用的門檻值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRules {
    /// A 類金額超過此值時追加附註列
    pub high_value_note_threshold: f64,
    /// B 類金額低於此值才可能是 processed
    pub small_order_threshold: f64,
    /// B 類遠端 payload 的分界
    pub payload_threshold: f64,
    /// 金額超過此值為高優先
    pub high_priority_threshold: f64,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            high_value_note_threshold: 150.0,
            small_order_threshold: 100.0,
            payload_threshold: 50.0,
            high_priority_threshold: 200.0,
        }
    }
}

/// Per-order decision engine.
///
/// Every collaborator failure that has a status of its own (report append,
/// remote call, status update) is folded into `order.status` here and never
/// returned to the caller.
pub struct OrderRouter<S: RemoteService> {
    remote: S,
    rules: RoutingRules,
}

impl<S: RemoteService> OrderRouter<S> {
    pub fn new(remote: S) -> Self {
        Self::with_rules(remote, RoutingRules::default())
    }

    pub fn with_rules(remote: S, rules: RoutingRules) -> Self {
        Self { remote, rules }
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    /// 單筆訂單完整流程：分流、優先度、寫回
    pub async fn process_order<K, R>(
        &self,
        order: &mut Order,
        sink: &K,
        report: &ReportHandle,
        repository: &R,
    ) where
        K: ReportSink + ?Sized,
        R: OrderRepository + ?Sized,
    {
        self.classify_and_handle(order, sink, report).await;
        self.update_priority(order);
        self.persist_outcome(order, repository).await;
    }

    pub async fn classify_and_handle<K: ReportSink + ?Sized>(
        &self,
        order: &mut Order,
        sink: &K,
        report: &ReportHandle,
    ) {
        let status = match &order.order_type {
            OrderType::A => self.export_row(order, sink, report).await,
            OrderType::B => self.invoke_remote(order).await,
            OrderType::C => Self::resolve_by_flag(order),
            OrderType::Other(code) => {
                tracing::debug!("Order {} has unrecognized type {:?}", order.id(), code);
                OrderStatus::UnknownType
            }
        };

        tracing::debug!(
            "Order {} ({}) resolved to {}",
            order.id(),
            order.order_type,
            status
        );
        order.status = status;
    }

    /// 匯出 A 類訂單；寫入失敗時回傳 export_failed
    pub async fn export_row<K: ReportSink + ?Sized>(
        &self,
        order: &Order,
        sink: &K,
        report: &ReportHandle,
    ) -> OrderStatus {
        let mut rows = vec![ReportRow::from_order(order)];
        if order.amount > self.rules.high_value_note_threshold {
            rows.push(ReportRow::high_value_note());
        }

        match sink.append_rows(report, &rows).await {
            Ok(()) => OrderStatus::Exported,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Export of order {} to {} failed: {}",
                    order.id(),
                    report.name,
                    e
                );
                OrderStatus::ExportFailed
            }
        }
    }

    /// 呼叫遠端服務處理 B 類訂單
    pub async fn invoke_remote(&self, order: &Order) -> OrderStatus {
        match self.remote.invoke(order.id()).await {
            Ok(response) => self.resolve_remote_status(order, &response),
            Err(e) => {
                tracing::warn!("⚠️ Remote call for order {} failed: {}", order.id(), e);
                OrderStatus::ApiFailure
            }
        }
    }

    pub fn resolve_remote_status(&self, order: &Order, response: &ServiceResponse) -> OrderStatus {
        if response.status != ResponseStatus::Success {
            return OrderStatus::ApiError;
        }

        let threshold = self.rules.payload_threshold;
        if response.payload >= threshold && order.amount < self.rules.small_order_threshold {
            OrderStatus::Processed
        } else if response.payload < threshold || order.flag {
            OrderStatus::Pending
        } else {
            OrderStatus::Error
        }
    }

    fn resolve_by_flag(order: &Order) -> OrderStatus {
        if order.flag {
            OrderStatus::Completed
        } else {
            OrderStatus::InProgress
        }
    }

    pub fn update_priority(&self, order: &mut Order) {
        order.priority = if order.amount > self.rules.high_priority_threshold {
            Priority::High
        } else {
            Priority::Low
        };
    }

    /// 寫回狀態；失敗時覆寫為 db_error
    pub async fn persist_outcome<R: OrderRepository + ?Sized>(
        &self,
        order: &mut Order,
        repository: &R,
    ) {
        if let Err(e) = repository
            .update_order_status(order.id(), order.status, order.priority)
            .await
        {
            tracing::warn!(
                "⚠️ Saving order {} as {} failed: {}",
                order.id(),
                order.status,
                e
            );
            order.status = OrderStatus::DbError;
        }
    }
}
