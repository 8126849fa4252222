// src/config.rs

use crate::{cli::Cli, constants, error::AppResult};
use anyhow::anyhow;
use std::{collections::HashMap, path::PathBuf, time::Duration};

/// 运行期配置。全部由命令行参数和内置默认值推导，
/// 不读取配置文件，也不读取环境变量。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub mobile_user_agent: String,
    pub mobile_referer: String,
    pub connect_timeout: Duration,
    pub resolve_timeout: Duration,
    pub download_timeout: Duration,
    pub max_retries: u32,
    pub request_interval: Duration,
    pub save_dir: PathBuf,
    pub page_size: u32,
    pub url_templates: HashMap<String, String>,
}

fn default_url_templates() -> HashMap<String, String> {
    use constants::endpoints as ep;
    HashMap::from([
        (
            ep::KUGOU_SEARCH.into(),
            "http://mobilecdn.kugou.com/api/v3/search/song?format=json&keyword={keyword}&page=1&pagesize={pagesize}".into(),
        ),
        (
            ep::KUGOU_PLAY_DATA.into(),
            "http://www.kugou.com/yy/index.php?r=play/getdata&hash={hash}".into(),
        ),
        (
            ep::KUGOU_MOBILE_INFO.into(),
            "http://m.kugou.com/app/i/getSongInfo.php?cmd=playInfo&hash={hash}".into(),
        ),
        (
            ep::AGGREGATOR.into(),
            "https://api.injahow.cn/meting/?type=url&id={keyword}".into(),
        ),
        (
            ep::NETEASE_OUTER.into(),
            "http://music.163.com/song/media/outer/url?id={id}.mp3".into(),
        ),
    ])
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        Ok(Self {
            user_agent: constants::DESKTOP_USER_AGENT.into(),
            mobile_user_agent: constants::MOBILE_USER_AGENT.into(),
            mobile_referer: constants::MOBILE_REFERER.into(),
            connect_timeout: Duration::from_secs(constants::CONNECT_TIMEOUT_SECS),
            resolve_timeout: Duration::from_secs(constants::RESOLVE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(constants::DOWNLOAD_TIMEOUT_SECS),
            max_retries: constants::MAX_RETRIES,
            request_interval: Duration::from_secs(constants::REQUEST_INTERVAL_SECS),
            save_dir: args.output.clone(),
            page_size: constants::SEARCH_PAGE_SIZE,
            url_templates: default_url_templates(),
        })
    }

    /// 按键名取出接口模板并填充 `{param}` 占位符。
    /// 参数值需由调用方自行完成 URL 编码。
    pub fn endpoint(&self, key: &str, params: &[(&str, &str)]) -> AppResult<String> {
        let template = self
            .url_templates
            .get(key)
            .ok_or_else(|| anyhow!("未知的接口模板: {}", key))?;
        let mut url = template.clone();
        for (name, value) in params {
            url = url.replace(&format!("{{{}}}", name), value);
        }
        Ok(url)
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            mobile_user_agent: "test-agent-mobile/1.0".to_string(),
            mobile_referer: constants::MOBILE_REFERER.to_string(),
            connect_timeout: Duration::from_secs(5),
            resolve_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(15),
            max_retries: 0,
            request_interval: Duration::from_millis(0),
            save_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            page_size: constants::SEARCH_PAGE_SIZE,
            url_templates: default_url_templates(),
        }
    }
}
