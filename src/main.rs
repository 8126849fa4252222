// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use music_dl::{cli::Cli, logging, run_from_cli};
use std::{
    env,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let ctrlc_token = cancellation_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        ctrlc_token.store(true, Ordering::Relaxed);
        println!("\n{} 用户强制中断程序。", "[!]".yellow());
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::process::exit(130);
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "music-dl".to_string());

    let after_help = format!(
        "示例:\n  # 启动交互模式 (推荐)\n  {bin} -i\n\n  # 搜索并下载第 1-3 首\n  {bin} -k \"周杰伦 晴天\" --select 1-3\n\n  # 通过酷狗 Hash 直接下载\n  {bin} --hash ABC123DEF456 --name \"晴天\"\n\n  # 通过网易云歌曲 ID 下载\n  {bin} --netease-id 347230",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = Arc::new(Cli::from_arg_matches(&cmd.get_matches()).unwrap());

    logging::setup_logging(args.log_level);

    if let Err(e) = run_from_cli(args, cancellation_token).await {
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
