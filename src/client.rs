// src/client.rs

use crate::{config::AppConfig, error::*};
use reqwest::{header, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::Value;
use std::sync::Arc;

/// 带重试的 HTTP 客户端。默认携带桌面端 UA 与解析类请求的超时，
/// 移动端接口和媒体下载通过按请求覆盖请求头/超时实现。
#[derive(Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    config: Arc<AppConfig>,
}

impl ApiClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.resolve_timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client, config })
    }

    /// 发送 GET 并把响应体按 JSON 解析。
    /// 非 200 状态、空响应体、非法 JSON 分别映射为独立的错误类型。
    pub async fn get_json(&self, url: &str) -> AppResult<Value> {
        self.get_json_via(self.client.get(url)).await
    }

    /// 同 `get_json`，但携带移动端 UA 与 Referer（酷狗播放接口的要求）
    pub async fn get_json_mobile(&self, url: &str) -> AppResult<Value> {
        let builder = self
            .client
            .get(url)
            .header(header::USER_AGENT, self.config.mobile_user_agent.clone())
            .header(header::REFERER, self.config.mobile_referer.clone());
        self.get_json_via(builder).await
    }

    async fn get_json_via(&self, builder: RequestBuilder) -> AppResult<Value> {
        let res = builder.send().await?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(AppError::HttpStatus(status.as_u16()));
        }
        let url = res.url().to_string();
        let text = res.text().await?;
        if text.trim().is_empty() {
            return Err(AppError::EmptyBody(url));
        }
        serde_json::from_str(&text).map_err(|source| AppError::ApiParseFailed { url, source })
    }

    /// 打开媒体文件的流式响应。超时放宽到下载级别，
    /// 状态码交由下载管线自行判定。
    pub async fn get_media(&self, url: &str) -> AppResult<Response> {
        let res = self
            .client
            .get(url)
            .timeout(self.config.download_timeout)
            .send()
            .await?;
        Ok(res)
    }
}
