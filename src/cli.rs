// src/cli.rs

use crate::constants;
use clap::{crate_version, Parser, ValueEnum};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["interactive", "keyword", "hash", "netease_id"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 启动交互式会话 (推荐)
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,
    /// 按关键词搜索酷狗并下载
    #[arg(short = 'k', long, value_name = "KEYWORD", help_heading = "Mode")]
    pub keyword: Option<String>,
    /// 通过酷狗歌曲 Hash 直接下载 (多个用逗号分隔)
    #[arg(long, value_name = "HASH[,HASH...]", help_heading = "Mode")]
    pub hash: Option<String>,
    /// 通过网易云歌曲 ID 直接下载 (多个用逗号分隔)
    #[arg(long, value_name = "ID[,ID...]", help_heading = "Mode")]
    pub netease_id: Option<String>,

    // --- 下载选项 (Options) ---
    /// [搜索模式] 指定下载项 (例如 '1,3', '2-4', 'all'；默认第 1 首)
    #[arg(long, value_name = "SELECTION", help_heading = "Options")]
    pub select: Option<String>,
    /// [Hash模式] 为单个 Hash 指定歌曲名，用于显示和文件名兜底
    #[arg(long, value_name = "NAME", help_heading = "Options")]
    pub name: Option<String>,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
