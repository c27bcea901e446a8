use crate::utils::error::{OrderError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 報表標題列
pub const REPORT_HEADER: [&str; 6] = ["ID", "Type", "Amount", "Flag", "Status", "Priority"];

/// 訂單類型；未知代碼保留原值以便記錄
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderType {
    A,
    B,
    C,
    Other(String),
}

impl OrderType {
    pub fn code(&self) -> &str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for OrderType {
    fn from(code: &str) -> Self {
        match code {
            "A" => Self::A,
            "B" => Self::B,
            "C" => Self::C,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderType {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<OrderType> for String {
    fn from(order_type: OrderType) -> Self {
        order_type.code().to_string()
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Exported,
    ExportFailed,
    Processed,
    Pending,
    Error,
    ApiError,
    ApiFailure,
    Completed,
    InProgress,
    UnknownType,
    DbError,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Exported => "exported",
            Self::ExportFailed => "export_failed",
            Self::Processed => "processed",
            Self::Pending => "pending",
            Self::Error => "error",
            Self::ApiError => "api_error",
            Self::ApiFailure => "api_failure",
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::UnknownType => "unknown_type",
            Self::DbError => "db_error",
        }
    }

    /// 是否為協作者失敗後被吸收的狀態
    pub fn is_contained_failure(&self) -> bool {
        matches!(
            self,
            Self::ExportFailed | Self::ApiFailure | Self::DbError
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: u64,
    pub order_type: OrderType,
    pub amount: f64,
    pub flag: bool,
    pub status: OrderStatus,
    pub priority: Priority,
}

impl Order {
    pub fn new(id: u64, order_type: impl Into<OrderType>, amount: f64, flag: bool) -> Self {
        Self {
            id,
            order_type: order_type.into(),
            amount,
            flag,
            status: OrderStatus::New,
            priority: Priority::Low,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Validate for Order {
    fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(OrderError::ValidationError {
                message: format!("order {} has invalid amount {}", self.id, self.amount),
            });
        }
        Ok(())
    }
}

/// 遠端服務回傳的狀態標記；非 "success" 一律視為錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl From<String> for ResponseStatus {
    fn from(tag: String) -> Self {
        if tag == "success" {
            Self::Success
        } else {
            Self::Error
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Success => "success".to_string(),
            ResponseStatus::Error => "error".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: ResponseStatus,
    #[serde(rename = "data")]
    pub payload: f64,
}

impl ServiceResponse {
    pub fn new(status: ResponseStatus, payload: f64) -> Self {
        Self { status, payload }
    }

    pub fn success(payload: f64) -> Self {
        Self::new(ResponseStatus::Success, payload)
    }
}

/// 寫入報表的一列；附註列只填最後兩欄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: Option<u64>,
    pub order_type: Option<String>,
    pub amount: Option<f64>,
    pub flag: Option<bool>,
    pub status: String,
    pub priority: String,
}

impl ReportRow {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: Some(order.id()),
            order_type: Some(order.order_type.code().to_string()),
            amount: Some(order.amount),
            flag: Some(order.flag),
            status: order.status.to_string(),
            priority: order.priority.to_string(),
        }
    }

    pub fn high_value_note() -> Self {
        Self {
            id: None,
            order_type: None,
            amount: None,
            flag: None,
            status: "Note".to_string(),
            priority: "High value order".to_string(),
        }
    }

    pub fn is_annotation(&self) -> bool {
        self.id.is_none()
    }
}

/// 已建立的報表資源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHandle {
    pub name: String,
    pub location: String,
}
