// src/resolver/mod.rs

pub mod envelope;
mod strategies;

pub use strategies::{AggregatorStrategy, KugouDesktopStrategy, KugouMobileStrategy};

use crate::{client::ApiClient, config::AppConfig, error::AppResult, models::TrackCandidate, symbols};
use async_trait::async_trait;
use colored::Colorize;
use log::{debug, info, warn};
use std::sync::Arc;

/// 一次链接解析请求。直接按 Hash 下载时没有歌手/歌名，
/// 此时第三方聚合接口（按关键词检索）会被跳过。
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub hash: String,
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl ResolveRequest {
    pub fn from_hash(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            artist: None,
            title: None,
        }
    }

    pub fn from_track(track: &TrackCandidate) -> Self {
        Self {
            hash: track.hash.clone(),
            artist: Some(track.artist.clone()),
            title: Some(track.title.clone()),
        }
    }
}

/// 某一层策略解析出的可播放地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub url: String,
    pub filename: String,
}

/// 降级链中的一层：一个独立接口加上它自己的响应解析
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    /// `Ok(None)` 表示本层无结果（含主动跳过），交给下一层；
    /// `Err` 同样只意味着降级，由调用方记录诊断。
    async fn attempt(&self, request: &ResolveRequest) -> AppResult<Option<ResolvedSource>>;
}

/// 下载链接解析器：固定顺序的策略链，命中即停。
/// 顺序不可配置：桌面接口 → 移动接口 → 第三方聚合接口。
pub struct UrlResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl UrlResolver {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self {
            strategies: vec![
                Box::new(KugouDesktopStrategy::new(client.clone(), config.clone())),
                Box::new(KugouMobileStrategy::new(client.clone(), config.clone())),
                Box::new(AggregatorStrategy::new(client, config)),
            ],
        }
    }

    /// 依次尝试各层，返回第一个非空链接；全部落空返回 `None`。
    /// 单层的失败只产生诊断，不会中断整条链。
    pub async fn resolve(&self, request: &ResolveRequest) -> Option<ResolvedSource> {
        for strategy in &self.strategies {
            match strategy.attempt(request).await {
                Ok(Some(source)) => {
                    info!("策略 '{}' 命中: {}", strategy.name(), source.url);
                    return Some(source);
                }
                Ok(None) => {
                    debug!("策略 '{}' 未返回链接，尝试下一层", strategy.name());
                }
                Err(e) => {
                    warn!("策略 '{}' 失败: {}", strategy.name(), e);
                    eprintln!(
                        "{} {} 获取失败: {}",
                        *symbols::WARN,
                        strategy.name(),
                        e.to_string().yellow()
                    );
                }
            }
        }
        None
    }
}
