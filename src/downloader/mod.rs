// src/downloader/mod.rs

mod pipeline;

pub use pipeline::Downloader;

use crate::{symbols, ui};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// 会话级的成功/失败统计。单个条目的失败只记账，从不中断批次。
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn start_batch(&self, total_tasks: usize) {
        info!("开始新一批下载任务，总数: {}", total_tasks);
        let mut stats = self.stats.lock().unwrap();
        *stats = DownloadStats {
            total: total_tasks,
            ..Default::default()
        };
        self.failed_downloads.lock().unwrap().clear();
    }

    pub fn record_success(&self) {
        self.stats.lock().unwrap().success += 1;
    }

    pub fn record_failure(&self, name: &str, reason: &str) {
        log::error!("'{}' 下载失败，原因: {}", name, reason);
        self.stats.lock().unwrap().failed += 1;
        self.failed_downloads
            .lock()
            .unwrap()
            .push((name.to_string(), reason.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let failed = self.failed_downloads.lock().unwrap();
        info!(
            "下载报告: Total={}, Success={}, Failed={}",
            stats.total, stats.success, stats.failed
        );

        if !failed.is_empty() {
            println!("\n{} 失败的歌曲 ({}首):", *symbols::ERROR, stats.failed);
            print_grouped_failures(&failed);
        }
        ui::print_sub_header("下载完成");
        println!(
            "{} | {}",
            format!("成功: {} 首", stats.success).green(),
            format!("失败: {} 首", stats.failed).red()
        );
    }
}

fn print_grouped_failures(items: &[(String, String)]) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (name, reason) in items {
        grouped.entry(reason).or_default().push(name);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", format!("原因: {}", reason).red());
        let mut names = grouped.get(reason).unwrap().clone();
        names.sort();
        for name in names {
            println!("    - {}", name);
        }
    }
}
