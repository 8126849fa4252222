// src/models.rs

use crate::error::AppError;
use std::path::PathBuf;

/// 搜索结果里的付费标记，仅作提示，不阻止下载尝试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    Free,
    RestrictedVip,
    Unknown,
}

impl AccessTier {
    /// 酷狗搜索接口: privilege == 0 免费, privilege == 8 VIP
    pub fn from_privilege(privilege: Option<i64>) -> Self {
        match privilege {
            Some(0) => Self::Free,
            Some(8) => Self::RestrictedVip,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Free => Some("免费"),
            Self::RestrictedVip => Some("VIP"),
            Self::Unknown => None,
        }
    }
}

/// 一条搜索结果。创建后不再修改，会话结束即丢弃。
#[derive(Debug, Clone)]
pub struct TrackCandidate {
    pub title: String,
    pub artist: String,
    /// 平台侧的不透明标识（酷狗为文件 hash）
    pub hash: String,
    pub access_tier: AccessTier,
}

impl TrackCandidate {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// 解析成功后交给下载管线的目标，恰好消费一次
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub url: String,
    pub suggested_filename: String,
    /// 直接按 hash 解析时没有搜索上下文
    pub track: Option<TrackCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    Io,
    NoUrl,
    Unexpected,
}

impl FailureKind {
    pub fn message(&self) -> String {
        match self {
            Self::Network => "网络请求失败".to_string(),
            Self::Timeout => "请求超时".to_string(),
            Self::HttpStatus(code) => format!("HTTP 状态码 {}", code),
            Self::Io => "文件写入失败".to_string(),
            Self::NoUrl => "所有接口均无法获取下载链接".to_string(),
            Self::Unexpected => "未知错误".to_string(),
        }
    }
}

impl From<&AppError> for FailureKind {
    fn from(err: &AppError) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            AppError::Network(_) | AppError::NetworkMiddleware(_) => Self::Network,
            AppError::HttpStatus(code) => Self::HttpStatus(*code),
            AppError::Io(_) => Self::Io,
            _ => Self::Unexpected,
        }
    }
}

/// 单次下载尝试的结果，只用于会话级的成功/失败统计
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub success: bool,
    pub bytes_written: u64,
    pub final_path: Option<PathBuf>,
    pub error: Option<FailureKind>,
}

impl DownloadOutcome {
    pub fn succeeded(bytes_written: u64, final_path: PathBuf) -> Self {
        Self {
            success: true,
            bytes_written,
            final_path: Some(final_path),
            error: None,
        }
    }

    pub fn failed(error: FailureKind) -> Self {
        Self {
            success: false,
            bytes_written: 0,
            final_path: None,
            error: Some(error),
        }
    }
}
