use crate::domain::model::{Order, OrderStatus, OrderType, Priority};
use crate::domain::ports::OrderRepository;
use crate::utils::error::{OrderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// JSON 檔中的一筆訂單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub amount: f64,
    #[serde(default)]
    pub flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// 以單一 JSON 陣列檔保存訂單；每次更新都整檔重寫。
/// 訂單 id 在整個檔案內必須唯一，不同使用者也不可重複
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<StoredOrder>> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            OrderError::persistence(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let orders: Vec<StoredOrder> = serde_json::from_slice(&data).map_err(|e| {
            OrderError::persistence(format!("cannot parse {}: {}", self.path.display(), e))
        })?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = orders.iter().find(|stored| !seen.insert(stored.id)) {
            return Err(OrderError::persistence(format!(
                "duplicate order id {} in {}",
                duplicate.id,
                self.path.display()
            )));
        }

        Ok(orders)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// 先寫入暫存檔再 rename，寫到一半失敗也不會破壞原檔
    async fn save(&self, orders: &[StoredOrder]) -> Result<()> {
        let data = serde_json::to_vec_pretty(orders)?;
        let staging = self.staging_path();

        tokio::fs::write(&staging, data).await.map_err(|e| {
            OrderError::persistence(format!("cannot write {}: {}", staging.display(), e))
        })?;

        tokio::fs::rename(&staging, &self.path).await.map_err(|e| {
            OrderError::persistence(format!(
                "cannot replace {} with {}: {}",
                self.path.display(),
                staging.display(),
                e
            ))
        })
    }
}

#[async_trait::async_trait]
impl OrderRepository for JsonFileRepository {
    async fn fetch_orders_by_user(&self, user_id: u64) -> Result<Vec<Order>> {
        let _guard = self.lock.lock().await;

        let orders = self
            .load()
            .await?
            .into_iter()
            .filter(|stored| stored.user_id == user_id)
            .map(|stored| Order::new(stored.id, stored.order_type, stored.amount, stored.flag))
            .collect();

        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: u64,
        status: OrderStatus,
        priority: Priority,
    ) -> Result<bool> {
        let _guard = self.lock.lock().await;

        let mut orders = self.load().await?;
        let stored = orders
            .iter_mut()
            .find(|stored| stored.id == order_id)
            .ok_or_else(|| OrderError::persistence(format!("order {} not found", order_id)))?;

        stored.status = Some(status);
        stored.priority = Some(priority);

        self.save(&orders).await?;
        tracing::debug!("Order {} saved as {} / {}", order_id, status, priority);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_store(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    const STORE: &str = r#"[
        {"id": 1, "user_id": 123, "type": "A", "amount": 100.0, "flag": false},
        {"id": 2, "user_id": 456, "type": "B", "amount": 150.0, "flag": true},
        {"id": 3, "user_id": 123, "type": "Z", "amount": 250.0, "flag": false, "status": "completed"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_filters_by_user_and_resets_state() {
        let file = write_store(STORE);
        let repository = JsonFileRepository::new(file.path());

        let orders = repository.fetch_orders_by_user(123).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id(), 1);
        assert_eq!(orders[1].id(), 3);
        assert_eq!(orders[1].order_type, OrderType::Other("Z".to_string()));
        assert_eq!(orders[1].status, OrderStatus::New);
        assert_eq!(orders[1].priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_fetch_unknown_user_is_empty() {
        let file = write_store(STORE);
        let repository = JsonFileRepository::new(file.path());

        assert!(repository.fetch_orders_by_user(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_writes_status_and_priority() {
        let file = write_store(STORE);
        let repository = JsonFileRepository::new(file.path());

        let updated = repository
            .update_order_status(2, OrderStatus::Pending, Priority::High)
            .await
            .unwrap();
        assert!(updated);

        let content = std::fs::read_to_string(file.path()).unwrap();
        let stored: Vec<StoredOrder> = serde_json::from_str(&content).unwrap();
        assert_eq!(stored[1].status, Some(OrderStatus::Pending));
        assert_eq!(stored[1].priority, Some(Priority::High));
        assert_eq!(stored[0].status, None);
    }

    #[tokio::test]
    async fn test_update_unknown_order_fails() {
        let file = write_store(STORE);
        let repository = JsonFileRepository::new(file.path());

        let result = repository
            .update_order_status(42, OrderStatus::Exported, Priority::Low)
            .await;

        assert!(matches!(result, Err(OrderError::PersistenceError { .. })));
    }

    #[tokio::test]
    async fn test_missing_store_is_persistence_error() {
        let repository = JsonFileRepository::new("/nonexistent/orders.json");

        let result = repository.fetch_orders_by_user(1).await;

        assert!(matches!(result, Err(OrderError::PersistenceError { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_store_without_leftover_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders.json");
        std::fs::write(&path, STORE).unwrap();
        let repository = JsonFileRepository::new(&path);

        repository
            .update_order_status(1, OrderStatus::Exported, Priority::Low)
            .await
            .unwrap();
        repository
            .update_order_status(3, OrderStatus::InProgress, Priority::High)
            .await
            .unwrap();

        assert!(!temp_dir.path().join("orders.json.tmp").exists());
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let stored: Vec<StoredOrder> = serde_json::from_str(&content).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].status, Some(OrderStatus::Exported));
        assert_eq!(stored[2].priority, Some(Priority::High));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_intact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders.json");
        std::fs::write(&path, STORE).unwrap();
        // 暫存檔位置被目錄佔用，寫入必定失敗
        std::fs::create_dir(temp_dir.path().join("orders.json.tmp")).unwrap();
        let repository = JsonFileRepository::new(&path);

        let result = repository
            .update_order_status(1, OrderStatus::Exported, Priority::Low)
            .await;

        assert!(matches!(result, Err(OrderError::PersistenceError { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), STORE);
    }

    #[tokio::test]
    async fn test_duplicate_ids_across_users_are_rejected() {
        let file = write_store(
            r#"[
                {"id": 7, "user_id": 123, "type": "A", "amount": 100.0},
                {"id": 7, "user_id": 456, "type": "C", "amount": 20.0, "flag": true}
            ]"#,
        );
        let repository = JsonFileRepository::new(file.path());

        let fetched = repository.fetch_orders_by_user(456).await;
        assert!(matches!(fetched, Err(OrderError::PersistenceError { .. })));

        let updated = repository
            .update_order_status(7, OrderStatus::Completed, Priority::Low)
            .await;
        assert!(matches!(updated, Err(OrderError::PersistenceError { .. })));

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("completed"));
    }
}
