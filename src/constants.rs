// src/constants.rs

pub const UI_WIDTH: usize = 72;
pub const ITEM_TRUNCATE_LENGTH: usize = 60;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const DEFAULT_SAVE_DIR: &str = "downloaded_music";
pub const AUDIO_EXTENSION: &str = "mp3";
pub const SEARCH_PAGE_SIZE: u32 = 10;
pub const DEFAULT_KEYWORD: &str = "郎朗 黄河04 钢琴协奏";

/// 桌面端 UA：用于搜索与媒体下载
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
/// 移动端 UA：酷狗播放接口要求移动端请求头
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_2_3 like Mac OS X) AppleWebKit/605.1.15";
pub const MOBILE_REFERER: &str = "http://m.kugou.com/";

pub const CONNECT_TIMEOUT_SECS: u64 = 10;
/// 元数据/链接解析类请求的超时
pub const RESOLVE_TIMEOUT_SECS: u64 = 10;
/// 媒体文件下载请求的超时
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
pub const MAX_RETRIES: u32 = 3;
/// 相邻两次网络任务之间的固定间隔，避免请求过快
pub const REQUEST_INTERVAL_SECS: u64 = 1;

/// 接口模板的键名，模板本体见 `config::AppConfig`
pub mod endpoints {
    pub const KUGOU_SEARCH: &str = "KUGOU_SEARCH";
    pub const KUGOU_PLAY_DATA: &str = "KUGOU_PLAY_DATA";
    pub const KUGOU_MOBILE_INFO: &str = "KUGOU_MOBILE_INFO";
    pub const AGGREGATOR: &str = "AGGREGATOR";
    pub const NETEASE_OUTER: &str = "NETEASE_OUTER";
}
