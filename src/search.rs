// src/search.rs

use crate::{
    client::ApiClient,
    config::AppConfig,
    constants::endpoints,
    error::AppResult,
    models::{AccessTier, TrackCandidate},
    symbols,
};
use colored::Colorize;
use log::{info, warn};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    status: Option<i64>,
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    info: Option<Vec<SearchRecord>>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    songname: Option<String>,
    singername: Option<String>,
    hash: Option<String>,
    privilege: Option<i64>,
}

/// 关键词搜索。一次调用对应一次网络请求，
/// 任何失败都退化为空结果加一条控制台诊断，绝不让程序崩溃。
pub struct SearchResolver {
    client: Arc<ApiClient>,
    config: Arc<AppConfig>,
}

impl SearchResolver {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }

    pub async fn search(&self, keyword: &str) -> AppResult<Vec<TrackCandidate>> {
        let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC).to_string();
        let pagesize = self.config.page_size.to_string();
        let url = self.config.endpoint(
            endpoints::KUGOU_SEARCH,
            &[("keyword", encoded.as_str()), ("pagesize", pagesize.as_str())],
        )?;

        info!("搜索关键词 '{}': {}", keyword, url);
        let body = match self.client.get_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("搜索请求失败: {}", e);
                eprintln!("{} 搜索失败: {}", *symbols::ERROR, e.to_string().red());
                return Ok(vec![]);
            }
        };

        Ok(self.parse_results(body))
    }

    fn parse_results(&self, body: Value) -> Vec<TrackCandidate> {
        let envelope: SearchEnvelope = match serde_json::from_value(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("搜索响应结构异常: {}", e);
                eprintln!("{} 搜索API返回了无法识别的数据。", *symbols::ERROR);
                return vec![];
            }
        };

        if envelope.status != Some(1) {
            warn!("搜索响应缺少成功标记: status={:?}", envelope.status);
            eprintln!("{} 未找到相关歌曲", *symbols::WARN);
            return vec![];
        }

        let records = envelope.data.and_then(|d| d.info).unwrap_or_default();
        if records.is_empty() {
            eprintln!("{} 未找到相关歌曲", *symbols::WARN);
            return vec![];
        }

        // 保留 API 给出的顺序，排序是对方的职责
        records
            .into_iter()
            .filter_map(|record| {
                let hash = record.hash?;
                if hash.is_empty() {
                    return None;
                }
                Some(TrackCandidate {
                    title: record.songname.unwrap_or_else(|| "未知歌曲".to_string()),
                    artist: record.singername.unwrap_or_else(|| "未知歌手".to_string()),
                    hash,
                    access_tier: AccessTier::from_privilege(record.privilege),
                })
            })
            .collect()
    }
}
