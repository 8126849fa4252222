// src/resolver/envelope.rs

use super::ResolvedSource;
use serde_json::Value;

/// 播放接口响应的解析结果。已知两种信封：
/// A: `{data: {play_url | play_backup_url, audio_name}}`
/// B: `{url, fileName}`
/// 按键名识别而不是按接口来源假定，同一个解析器适用于所有层级。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Source(ResolvedSource),
    ApiError { code: i64, message: String },
    Unrecognized,
}

pub fn parse_play_envelope(value: &Value) -> Envelope {
    // 信封 A
    if let Some(data) = value.get("data").and_then(Value::as_object) {
        let play_url = data
            .get("play_url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                data.get("play_backup_url")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            });
        if let Some(url) = play_url {
            let filename = data
                .get("audio_name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("unknown");
            return Envelope::Source(ResolvedSource {
                url: url.to_string(),
                filename: filename.to_string(),
            });
        }
    }

    // 信封 B
    if let Some(url) = value
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        let filename = value
            .get("fileName")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown");
        return Envelope::Source(ResolvedSource {
            url: url.to_string(),
            filename: filename.to_string(),
        });
    }

    // 显式错误信息
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        if !message.is_empty() {
            return Envelope::ApiError {
                code: 0,
                message: message.to_string(),
            };
        }
    }
    if let Some(code) = value.get("err_code").and_then(Value::as_i64) {
        if code != 0 {
            return Envelope::ApiError {
                code,
                message: describe_error_code(code),
            };
        }
    }

    Envelope::Unrecognized
}

/// 已知错误码的文案，未知错误码原样带出
pub fn describe_error_code(code: i64) -> String {
    match code {
        -1 => "歌曲不存在或已下架".to_string(),
        30001 => "需要VIP会员".to_string(),
        30002 => "版权保护，无法下载".to_string(),
        30003 => "区域限制".to_string(),
        other => format!("错误码: {}", other),
    }
}
