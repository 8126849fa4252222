// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod models;
pub mod netease;
pub mod resolver;
pub mod search;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    client::ApiClient,
    config::AppConfig,
    downloader::DownloadManager,
    error::AppResult,
};
use log::debug;
use std::sync::{atomic::AtomicBool, Arc};

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct SessionContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<ApiClient>,
    pub args: Arc<Cli>,
    pub cancellation_token: Arc<AtomicBool>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);
    let http_client = Arc::new(ApiClient::new(config.clone())?);

    let context = SessionContext {
        manager: DownloadManager::new(),
        config,
        http_client,
        args: args.clone(),
        cancellation_token,
    };

    if args.interactive {
        workflows::run_interactive(context).await?;
    } else if let Some(keyword) = &args.keyword {
        workflows::run_search(context, keyword).await?;
    } else if let Some(hashes) = &args.hash {
        workflows::run_hash_batch(context, hashes).await?;
    } else if let Some(ids) = &args.netease_id {
        workflows::run_netease(context, ids).await?;
    }

    Ok(())
}
