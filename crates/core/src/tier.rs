//! # Tier Module
//!
//! Định nghĩa Tier (cấp duyệt) và Decision (quyết định) cho approval pipeline.
//! - Admin: cấp duyệt đầu tiên
//! - HigherOfficial: cán bộ cấp cao
//! - SuperOfficial: cán bộ cấp cao nhất

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cấp duyệt có quyền approve hoặc cancel một form.
///
/// Các tier độc lập với nhau: không có tier nào phải chờ tier khác.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Admin,
    HigherOfficial,
    SuperOfficial,
}

impl Tier {
    /// Tất cả tiers theo thứ tự hiển thị
    pub const ALL: [Tier; 3] = [Tier::Admin, Tier::HigherOfficial, Tier::SuperOfficial];

    /// Trả về code string cho DB và HTTP
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Admin => "admin",
            Tier::HigherOfficial => "higher_official",
            Tier::SuperOfficial => "super_official",
        }
    }

    /// Lý do mặc định khi tier cancel mà không ghi lý do
    pub fn default_cancel_reason(&self) -> &'static str {
        match self {
            Tier::Admin => "Cancelled by admin",
            Tier::HigherOfficial => "Cancelled by higher official",
            Tier::SuperOfficial => "Cancelled by super official",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quyết định của một tier trên form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Cancel,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Cancel => "cancel",
        }
    }

    /// Parse quyết định từ request.
    ///
    /// "approve"/"finalized" -> Approve, "cancel"/"cancelled" -> Cancel,
    /// không phân biệt hoa thường. Thiếu hoặc sai giá trị -> `InvalidAction`.
    pub fn parse(raw: Option<&str>) -> CoreResult<Self> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::InvalidAction("missing decision".to_string()))?;

        match raw.to_lowercase().as_str() {
            "approve" | "finalized" => Ok(Decision::Approve),
            "cancel" | "cancelled" => Ok(Decision::Cancel),
            _ => Err(CoreError::InvalidAction(raw.to_string())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
