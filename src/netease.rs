// src/netease.rs

use crate::{
    config::AppConfig,
    constants::endpoints,
    error::{AppError, AppResult},
    models::DownloadTarget,
};

/// 网易云没有搜索/降级链，直接用公开的外链模板拼出下载地址
pub fn direct_target(config: &AppConfig, song_id: &str) -> AppResult<DownloadTarget> {
    let id = song_id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::UserInputError(format!(
            "无效的网易云歌曲 ID: '{}' (应为纯数字)",
            song_id
        )));
    }
    let url = config.endpoint(endpoints::NETEASE_OUTER, &[("id", id)])?;
    Ok(DownloadTarget {
        url,
        suggested_filename: format!("song_{}", id),
        track: None,
    })
}
