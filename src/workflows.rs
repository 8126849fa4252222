// src/workflows.rs

use crate::{
    constants,
    downloader::Downloader,
    error::{AppError, AppResult},
    models::{DownloadTarget, FailureKind, TrackCandidate},
    netease,
    resolver::{ResolveRequest, UrlResolver},
    search::SearchResolver,
    symbols, ui, utils, SessionContext,
};
use colored::*;
use log::{debug, warn};
use std::sync::atomic::Ordering;

/// 非交互搜索模式（--keyword）
pub(crate) async fn run_search(context: SessionContext, keyword: &str) -> AppResult<()> {
    ui::print_header("歌曲搜索");
    let keyword = effective_keyword(keyword);
    let candidates = SearchResolver::new(context.http_client.clone(), context.config.clone())
        .search(&keyword)
        .await?;
    if candidates.is_empty() {
        return Ok(());
    }
    print_candidates(&candidates);

    let selection = context.args.select.clone().unwrap_or_default();
    let indices = select_candidates(&selection, candidates.len());
    if indices.is_empty() {
        println!("\n{} 没有有效的选择", *symbols::WARN);
        return Ok(());
    }
    download_candidates(&context, &candidates, &indices).await
}

/// Hash 直接下载模式（--hash）
pub(crate) async fn run_hash_batch(context: SessionContext, raw_hashes: &str) -> AppResult<()> {
    ui::print_header("Hash 直接下载");
    let hashes: Vec<String> = raw_hashes
        .split(',')
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    if hashes.is_empty() {
        return Err(AppError::UserInputError("未输入有效的 Hash。".to_string()));
    }
    let name_override = if hashes.len() == 1 {
        context.args.name.clone()
    } else {
        None
    };
    download_hashes(&context, &hashes, name_override.as_deref()).await
}

/// 网易云直链下载模式（--netease-id）
pub(crate) async fn run_netease(context: SessionContext, raw_ids: &str) -> AppResult<()> {
    ui::print_header("网易云直链下载");
    let ids: Vec<String> = raw_ids
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(AppError::UserInputError("未输入有效的歌曲 ID。".to_string()));
    }

    let downloader = Downloader::new(context.http_client.clone(), context.config.clone());
    context.manager.start_batch(ids.len());
    for (pos, id) in ids.iter().enumerate() {
        check_cancelled(&context)?;
        println!("\n{} [{}/{}] 处理歌曲 ID: {}", *symbols::TRACK, pos + 1, ids.len(), id);
        match netease::direct_target(&context.config, id) {
            Ok(target) => {
                let name = target.suggested_filename.clone();
                let outcome = downloader.fetch(&target).await;
                record_outcome(&context, &name, outcome.success, outcome.error);
            }
            Err(e) => {
                // 非法 ID 只跳过本条，继续处理其余条目
                warn!("跳过无效的网易云 ID '{}': {}", id, e);
                eprintln!("{} {}", *symbols::WARN, e.to_string().yellow());
                context.manager.record_failure(id, "无效的歌曲 ID");
            }
        }
        pace(&context, pos, ids.len()).await;
    }
    context.manager.print_report();
    Ok(())
}

/// 交互模式：先选下载方式，再逐步输入
pub(crate) async fn run_interactive(context: SessionContext) -> AppResult<()> {
    ui::print_header("酷狗音乐 MP3 下载器");
    let modes = vec![
        "搜索歌曲下载 (推荐)".to_string(),
        "通过 Hash 直接下载".to_string(),
    ];
    let choice = ui::selection_menu(&modes, "请选择下载模式", "请输入数字选择模式", "1");

    if choice.trim() == "2" {
        println!("\n提示: Hash 是酷狗歌曲的唯一标识符，");
        println!("可在酷狗网页版播放歌曲时从 URL 的 hash 参数中获取。");
        let input = ui::prompt("请输入歌曲 Hash (多个用逗号分隔)", None)
            .map_err(|_| AppError::UserInterrupt)?;
        let hashes: Vec<String> = input
            .split(',')
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if hashes.is_empty() {
            println!("\n{} 未输入 Hash。", *symbols::WARN);
            return Ok(());
        }
        let name_override = if hashes.len() == 1 {
            let name = ui::prompt("歌曲名称 (可选，直接回车跳过)", None)
                .map_err(|_| AppError::UserInterrupt)?;
            if name.is_empty() { None } else { Some(name) }
        } else {
            None
        };
        return download_hashes(&context, &hashes, name_override.as_deref()).await;
    }

    let keyword = ui::prompt("请输入歌曲名称", Some(constants::DEFAULT_KEYWORD))
        .map_err(|_| AppError::UserInterrupt)?;
    let keyword = effective_keyword(&keyword);
    let candidates = SearchResolver::new(context.http_client.clone(), context.config.clone())
        .search(&keyword)
        .await?;
    if candidates.is_empty() {
        return Ok(());
    }
    print_candidates(&candidates);

    let selection = ui::prompt(
        "请选择要下载的歌曲编号 (如 '1,2,5' 或 '1-3'，直接回车下载第1首)",
        None,
    )
    .map_err(|_| AppError::UserInterrupt)?;
    let indices = select_candidates(&selection, candidates.len());
    if indices.is_empty() {
        println!("\n{} 没有有效的选择", *symbols::WARN);
        return Ok(());
    }
    println!("\n将下载 {} 首歌曲", indices.len());
    download_candidates(&context, &candidates, &indices).await
}

fn effective_keyword(keyword: &str) -> String {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        debug!("关键词为空，使用默认关键词");
        constants::DEFAULT_KEYWORD.to_string()
    } else {
        trimmed.to_string()
    }
}

fn print_candidates(candidates: &[TrackCandidate]) {
    println!("\n找到 {} 首相关歌曲：", candidates.len());
    for (i, track) in candidates.iter().enumerate() {
        let tag = track
            .access_tier
            .label()
            .map_or(String::new(), |label| format!(" [{}]", label));
        println!(
            "{}. {} - {}{}",
            i + 1,
            track.title,
            track.artist,
            tag.yellow()
        );
    }
}

/// 解析选择串并打印被丢弃 token 的诊断
fn select_candidates(selection: &str, total: usize) -> Vec<usize> {
    let parsed = utils::parse_selection_indices(selection, total);
    for token in &parsed.rejected {
        eprintln!(
            "{} 无效的编号或超出范围: '{}'",
            *symbols::WARN,
            token.yellow()
        );
    }
    parsed.indices
}

/// 逐条解析并下载选中的搜索结果，条目间固定间隔
async fn download_candidates(
    context: &SessionContext,
    candidates: &[TrackCandidate],
    indices: &[usize],
) -> AppResult<()> {
    let resolver = UrlResolver::new(context.http_client.clone(), context.config.clone());
    let downloader = Downloader::new(context.http_client.clone(), context.config.clone());

    context.manager.start_batch(indices.len());
    for (pos, &idx) in indices.iter().enumerate() {
        check_cancelled(context)?;
        let track = &candidates[idx];
        let name = track.display_name();
        println!(
            "\n{} [{}/{}] 正在获取《{}》的下载链接...",
            *symbols::TRACK,
            pos + 1,
            indices.len(),
            name
        );

        match resolver.resolve(&ResolveRequest::from_track(track)).await {
            Some(source) => {
                let target = DownloadTarget {
                    url: source.url,
                    suggested_filename: source.filename,
                    track: Some(track.clone()),
                };
                let outcome = downloader.fetch(&target).await;
                record_outcome(context, &name, outcome.success, outcome.error);
            }
            None => {
                eprintln!(
                    "{} 跳过: 所有接口均无法获取下载链接 (可能需要VIP会员)",
                    *symbols::WARN
                );
                context
                    .manager
                    .record_failure(&name, &FailureKind::NoUrl.message());
            }
        }
        pace(context, pos, indices.len()).await;
    }
    context.manager.print_report();
    Ok(())
}

/// 逐条解析并下载一组 Hash。没有歌手/歌名，第三方聚合层会被自动跳过。
async fn download_hashes(
    context: &SessionContext,
    hashes: &[String],
    name_override: Option<&str>,
) -> AppResult<()> {
    let resolver = UrlResolver::new(context.http_client.clone(), context.config.clone());
    let downloader = Downloader::new(context.http_client.clone(), context.config.clone());

    context.manager.start_batch(hashes.len());
    for (pos, hash) in hashes.iter().enumerate() {
        check_cancelled(context)?;
        let fallback_name = name_override.map_or_else(
            || format!("song_{}", hash.chars().take(8).collect::<String>()),
            |n| n.to_string(),
        );
        println!(
            "\n{} [{}/{}] 处理 Hash: {}",
            *symbols::TRACK,
            pos + 1,
            hashes.len(),
            utils::truncate_text(hash, constants::ITEM_TRUNCATE_LENGTH)
        );

        match resolver.resolve(&ResolveRequest::from_hash(hash)).await {
            Some(source) => {
                // 接口没给出可用文件名时退回用户提供的歌曲名
                let filename = if source.filename == "unknown" {
                    fallback_name.clone()
                } else {
                    source.filename
                };
                let target = DownloadTarget {
                    url: source.url,
                    suggested_filename: filename,
                    track: None,
                };
                let outcome = downloader.fetch(&target).await;
                record_outcome(context, &fallback_name, outcome.success, outcome.error);
            }
            None => {
                eprintln!("{} 无法获取下载链接", *symbols::ERROR);
                context
                    .manager
                    .record_failure(&fallback_name, &FailureKind::NoUrl.message());
            }
        }
        pace(context, pos, hashes.len()).await;
    }
    context.manager.print_report();
    Ok(())
}

fn record_outcome(
    context: &SessionContext,
    name: &str,
    success: bool,
    error: Option<FailureKind>,
) {
    if success {
        context.manager.record_success();
    } else {
        let reason = error.map_or_else(|| FailureKind::Unexpected.message(), |k| k.message());
        context.manager.record_failure(name, &reason);
    }
}

fn check_cancelled(context: &SessionContext) -> AppResult<()> {
    if context.cancellation_token.load(Ordering::Relaxed) {
        return Err(AppError::UserInterrupt);
    }
    Ok(())
}

/// 条目之间的固定停顿，最后一条之后不再等待
async fn pace(context: &SessionContext, pos: usize, total: usize) {
    if pos + 1 < total {
        tokio::time::sleep(context.config.request_interval).await;
    }
}
