// src/resolver/strategies.rs

use super::{
    envelope::{parse_play_envelope, Envelope},
    ResolveRequest, ResolveStrategy, ResolvedSource,
};
use crate::{client::ApiClient, config::AppConfig, constants, constants::endpoints, error::*};
use async_trait::async_trait;
use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;
use std::sync::Arc;

/// 按已知信封解析响应。接口的显式报错（下架/VIP/版权/区域）
/// 带上文案向上传递，但只用于诊断，不参与控制流——
/// 调用方一律按"本层落空、继续下一层"处理。
fn source_from_body(strategy: &str, body: &Value) -> AppResult<Option<ResolvedSource>> {
    match parse_play_envelope(body) {
        Envelope::Source(source) => Ok(Some(source)),
        Envelope::ApiError { code, message } => Err(AppError::ApiSemantic { code, message }),
        Envelope::Unrecognized => {
            debug!("策略 '{}' 响应中没有可用链接", strategy);
            Ok(None)
        }
    }
}

/// 第一层：酷狗桌面端播放接口，按 hash 直查
pub struct KugouDesktopStrategy {
    client: Arc<ApiClient>,
    config: Arc<AppConfig>,
}

impl KugouDesktopStrategy {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ResolveStrategy for KugouDesktopStrategy {
    fn name(&self) -> &'static str {
        "酷狗主接口"
    }

    async fn attempt(&self, request: &ResolveRequest) -> AppResult<Option<ResolvedSource>> {
        let url = self
            .config
            .endpoint(endpoints::KUGOU_PLAY_DATA, &[("hash", request.hash.as_str())])?;
        let body = self.client.get_json_mobile(&url).await?;
        source_from_body(self.name(), &body)
    }
}

/// 第二层：酷狗移动端接口，同一个 hash，另一种响应信封
pub struct KugouMobileStrategy {
    client: Arc<ApiClient>,
    config: Arc<AppConfig>,
}

impl KugouMobileStrategy {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ResolveStrategy for KugouMobileStrategy {
    fn name(&self) -> &'static str {
        "酷狗备用接口"
    }

    async fn attempt(&self, request: &ResolveRequest) -> AppResult<Option<ResolvedSource>> {
        let url = self
            .config
            .endpoint(endpoints::KUGOU_MOBILE_INFO, &[("hash", request.hash.as_str())])?;
        let body = self.client.get_json_mobile(&url).await?;
        source_from_body(self.name(), &body)
    }
}

/// 第三层：第三方聚合接口。不认识 hash，改用"歌手 歌名"作关键词，
/// 因此只在请求携带歌手/歌名时参与降级。
pub struct AggregatorStrategy {
    client: Arc<ApiClient>,
    config: Arc<AppConfig>,
}

impl AggregatorStrategy {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ResolveStrategy for AggregatorStrategy {
    fn name(&self) -> &'static str {
        "第三方聚合接口"
    }

    async fn attempt(&self, request: &ResolveRequest) -> AppResult<Option<ResolvedSource>> {
        let (Some(artist), Some(title)) = (&request.artist, &request.title) else {
            debug!("缺少歌手/歌名，跳过第三方聚合接口");
            return Ok(None);
        };

        let keyword = format!("{} {}", artist, title);
        let encoded = utf8_percent_encode(keyword.trim(), NON_ALPHANUMERIC).to_string();
        let url = self
            .config
            .endpoint(endpoints::AGGREGATOR, &[("keyword", encoded.as_str())])?;

        let body = self.client.get_json(&url).await?;
        // 聚合接口把结果包在数组里，取第一条
        let record = match &body {
            Value::Array(items) => match items.first() {
                Some(first) => first,
                None => return Ok(None),
            },
            other => other,
        };

        Ok(source_from_body(self.name(), record)?.map(|source| ResolvedSource {
            url: source.url,
            // 聚合接口不返回可靠的文件名，用搜索元数据拼一个
            filename: format!("{} - {}.{}", artist, title, constants::AUDIO_EXTENSION),
        }))
    }
}
