use crate::core::router::{OrderRouter, RoutingRules};
use crate::domain::model::{Order, OrderStatus, ReportHandle};
use crate::domain::ports::{OrderRepository, RemoteService, ReportSink};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use futures::FutureExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// 報表名稱：orders_type_A_<使用者>_<unix 秒>
pub fn report_name(user_id: u64, unix_seconds: i64) -> String {
    format!("orders_type_A_{}_{}", user_id, unix_seconds)
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub user_id: u64,
    pub report: ReportHandle,
    pub orders: Vec<Order>,
}

impl BatchSummary {
    pub fn status_counts(&self) -> BTreeMap<OrderStatus, usize> {
        let mut counts = BTreeMap::new();
        for order in &self.orders {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn contained_failures(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.status.is_contained_failure())
            .count()
    }

    fn log(&self) {
        let counts = self
            .status_counts()
            .iter()
            .map(|(status, count)| format!("{}={}", status, count))
            .collect::<Vec<_>>()
            .join(", ");

        tracing::info!(
            "📊 User {}: {} orders processed, {} contained failures [{}]",
            self.user_id,
            self.orders.len(),
            self.contained_failures(),
            counts
        );
        tracing::info!("📁 Report saved to: {}", self.report.location);
    }
}

#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// 使用者沒有訂單，未建立報表
    Empty,
    Completed(BatchSummary),
}

/// Runs one batch for one user: fetch, report, then every order in fetch order.
pub struct OrderProcessor<R: OrderRepository, S: RemoteService, K: ReportSink> {
    repository: R,
    router: OrderRouter<S>,
    sink: K,
}

impl<R: OrderRepository, S: RemoteService, K: ReportSink> OrderProcessor<R, S, K> {
    pub fn new(repository: R, remote: S, sink: K) -> Self {
        Self::with_rules(repository, remote, sink, RoutingRules::default())
    }

    pub fn with_rules(repository: R, remote: S, sink: K, rules: RoutingRules) -> Self {
        Self {
            repository,
            router: OrderRouter::with_rules(remote, rules),
            sink,
        }
    }

    /// 批次結果只有成功或失敗；單筆訂單的失敗已反映在其狀態上。
    /// 協作者或流程中的 panic 也在此攔截並視為失敗
    pub async fn run(&self, user_id: u64) -> bool {
        let outcome = match AssertUnwindSafe(self.execute(user_id)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                tracing::error!(
                    "❌ Batch for user {} aborted by panic: {}",
                    user_id,
                    panic_message(panic.as_ref())
                );
                return false;
            }
        };

        match outcome {
            Ok(BatchOutcome::Completed(summary)) => {
                summary.log();
                true
            }
            Ok(BatchOutcome::Empty) => {
                tracing::info!("No orders found for user {}", user_id);
                false
            }
            Err(e) => {
                tracing::error!(
                    "❌ Batch for user {} failed: {} (Severity: {:?})",
                    user_id,
                    e,
                    e.severity()
                );
                false
            }
        }
    }

    pub async fn execute(&self, user_id: u64) -> Result<BatchOutcome> {
        tracing::info!("🚀 Starting order batch for user {}", user_id);

        let mut orders = self.repository.fetch_orders_by_user(user_id).await?;
        tracing::debug!("Fetched {} orders for user {}", orders.len(), user_id);

        if orders.is_empty() {
            return Ok(BatchOutcome::Empty);
        }

        for order in &orders {
            order.validate()?;
        }

        let name = report_name(user_id, chrono::Utc::now().timestamp());
        let report = self.sink.create_report(&name).await?;
        tracing::debug!("Created report {} at {}", report.name, report.location);

        for order in orders.iter_mut() {
            self.router
                .process_order(order, &self.sink, &report, &self.repository)
                .await;
        }

        Ok(BatchOutcome::Completed(BatchSummary {
            user_id,
            report,
            orders,
        }))
    }
}
