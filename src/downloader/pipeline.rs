// src/downloader/pipeline.rs

use crate::{
    client::ApiClient,
    config::AppConfig,
    error::AppError,
    models::{DownloadOutcome, DownloadTarget, FailureKind},
    symbols, utils,
};
use colored::Colorize;
use futures::StreamExt;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use log::{error, info};
use reqwest::StatusCode;
use std::{
    fs::{self, File},
    io::Write as IoWrite,
    sync::Arc,
};
use url::Url;

/// 下载管线：把一个已解析的 URL 流式写入本地文件。
/// 所有错误都折叠进 `DownloadOutcome`，失败时已写入的部分文件留在磁盘上
/// （单次运行的工具，不做回滚）。
pub struct Downloader {
    client: Arc<ApiClient>,
    config: Arc<AppConfig>,
}

impl Downloader {
    pub fn new(client: Arc<ApiClient>, config: Arc<AppConfig>) -> Self {
        Self { client, config }
    }

    pub async fn fetch(&self, target: &DownloadTarget) -> DownloadOutcome {
        match self.try_fetch(target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("下载 '{}' 出错: {}", target.url, e);
                eprintln!("{} 下载出错: {}", *symbols::ERROR, e.to_string().red());
                DownloadOutcome::failed(FailureKind::from(&e))
            }
        }
    }

    async fn try_fetch(&self, target: &DownloadTarget) -> Result<DownloadOutcome, AppError> {
        let url = Url::parse(&target.url)?;
        let safe_name =
            utils::ensure_audio_extension(&utils::sanitize_filename(&target.suggested_filename));
        fs::create_dir_all(&self.config.save_dir)?;
        let file_path = self.config.save_dir.join(&safe_name);

        info!("开始下载 '{}' -> {:?}", url, file_path);
        let res = self.client.get_media(url.as_str()).await?;
        if res.status() != StatusCode::OK {
            let code = res.status().as_u16();
            eprintln!("{} 下载失败，状态码: {}", *symbols::ERROR, code);
            return Ok(DownloadOutcome::failed(FailureKind::HttpStatus(code)));
        }

        // 有 Content-Length 时显示百分比进度，没有就只计字节数
        let pbar = match res.content_length().filter(|len| *len > 0) {
            Some(len) => ProgressBar::new(len).with_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
                )
                .unwrap()
                .progress_chars("=>-"),
            ),
            None => ProgressBar::new_spinner()
                .with_style(ProgressStyle::with_template("{msg} {spinner} {bytes}").unwrap()),
        };
        pbar.set_message(utils::truncate_text(&safe_name, 40));

        let mut file = File::create(&file_path)?;
        let mut bytes_written: u64 = 0;
        let mut stream = res.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk)?;
            bytes_written += chunk.len() as u64;
            pbar.inc(chunk.len() as u64);
        }
        pbar.finish_and_clear();

        println!(
            "{} 成功下载到: {} ({})",
            *symbols::OK,
            file_path.display(),
            HumanBytes(bytes_written)
        );
        Ok(DownloadOutcome::succeeded(bytes_written, file_path))
    }
}
