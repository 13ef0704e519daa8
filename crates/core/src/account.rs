//! # Account Module
//!
//! Account đại diện cho một công dân đã đăng ký.
//! Mỗi Account sở hữu nhiều FormSubmission; account không bao giờ bị xóa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tài khoản của công dân.
///
/// Credential không nằm ở đây: nó được lưu và kiểm tra bởi
/// persistence/workflow layer, domain chỉ biết danh tính.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// Số điện thoại, unique trong hệ thống
    pub phone_number: String,
    /// Tên hiển thị
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: i64,
        phone_number: impl Into<String>,
        user_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            phone_number: phone_number.into(),
            user_name: user_name.into(),
            created_at,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - #{})", self.user_name, self.phone_number, self.id)
    }
}
