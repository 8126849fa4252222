// tests/url_resolver_test.rs

use music_dl::{
    client::ApiClient,
    config::AppConfig,
    constants::endpoints,
    models::{AccessTier, TrackCandidate},
    resolver::{ResolveRequest, UrlResolver},
};
use std::sync::Arc;

/// 把三层策略的接口模板全部指向模拟服务器
fn resolver_config(server_url: &str) -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.url_templates.insert(
        endpoints::KUGOU_PLAY_DATA.to_string(),
        format!("{}/primary?hash={{hash}}", server_url),
    );
    config.url_templates.insert(
        endpoints::KUGOU_MOBILE_INFO.to_string(),
        format!("{}/mobile?hash={{hash}}", server_url),
    );
    config.url_templates.insert(
        endpoints::AGGREGATOR.to_string(),
        format!("{}/aggregator?id={{keyword}}", server_url),
    );
    Arc::new(config)
}

fn make_resolver(config: Arc<AppConfig>) -> UrlResolver {
    let client = Arc::new(ApiClient::new(config.clone()).expect("client"));
    UrlResolver::new(client, config)
}

fn track(hash: &str) -> TrackCandidate {
    TrackCandidate {
        title: "晴天".to_string(),
        artist: "周杰伦".to_string(),
        hash: hash.to_string(),
        access_tier: AccessTier::Free,
    }
}

#[tokio::test]
async fn test_primary_hit_short_circuits_chain() {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;
    let primary = server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::UrlEncoded("hash".into(), "abc123".into()))
        .with_status(200)
        .with_body(r#"{"data": {"play_url": "http://x/y.mp3", "audio_name": "Song"}}"#)
        .create_async()
        .await;
    // 第一层命中后，后两层绝不能被调用
    let mobile = server.mock("GET", "/mobile").match_query(mockito::Matcher::Any).expect(0).create_async().await;
    let aggregator = server.mock("GET", "/aggregator").match_query(mockito::Matcher::Any).expect(0).create_async().await;

    let resolver = make_resolver(resolver_config(&server.url()));

    // --- Act ---
    let source = resolver
        .resolve(&ResolveRequest::from_track(&track("abc123")))
        .await
        .expect("应当解析出链接");

    // --- Assert ---
    assert_eq!(source.url, "http://x/y.mp3");
    assert_eq!(source.filename, "Song");
    primary.assert_async().await;
    mobile.assert_async().await;
    aggregator.assert_async().await;
}

#[tokio::test]
async fn test_falls_back_to_mobile_envelope() {
    let mut server = mockito::Server::new_async().await;
    // 第一层返回已知错误码（需要VIP），按"本层无结果"降级
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"err_code": 30001}"#)
        .create_async()
        .await;
    let mobile = server
        .mock("GET", "/mobile")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"url": "http://m/z.mp3", "fileName": "周杰伦 - 晴天"}"#)
        .create_async()
        .await;

    let resolver = make_resolver(resolver_config(&server.url()));
    let source = resolver
        .resolve(&ResolveRequest::from_track(&track("abc123")))
        .await
        .expect("第二层应当命中");

    assert_eq!(source.url, "http://m/z.mp3");
    assert_eq!(source.filename, "周杰伦 - 晴天");
    mobile.assert_async().await;
}

#[tokio::test]
async fn test_aggregator_invoked_once_when_metadata_present() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": 1}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/mobile")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"err_code": -1}"#)
        .create_async()
        .await;
    // 聚合接口把结果包在数组里
    let aggregator = server
        .mock("GET", "/aggregator")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"url": "http://agg/song.mp3"}]"#)
        .expect(1)
        .create_async()
        .await;

    let resolver = make_resolver(resolver_config(&server.url()));
    let source = resolver
        .resolve(&ResolveRequest::from_track(&track("abc123")))
        .await
        .expect("第三层应当命中");

    // 聚合接口不返回可靠文件名，改用搜索元数据拼接
    assert_eq!(source.url, "http://agg/song.mp3");
    assert_eq!(source.filename, "周杰伦 - 晴天.mp3");
    aggregator.assert_async().await;
}

#[tokio::test]
async fn test_aggregator_skipped_without_metadata() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": 1}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/mobile")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": 1}"#)
        .create_async()
        .await;
    // 只有 hash、没有歌手/歌名时，第三层必须被跳过
    let aggregator = server
        .mock("GET", "/aggregator")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let resolver = make_resolver(resolver_config(&server.url()));
    let source = resolver.resolve(&ResolveRequest::from_hash("abc123")).await;

    assert!(source.is_none());
    aggregator.assert_async().await;
}

#[tokio::test]
async fn test_strategy_error_degrades_to_next_tier() {
    let mut server = mockito::Server::new_async().await;
    // 第一层网络层面失败（500），链条继续而不是报错
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/mobile")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"url": "http://m/ok.mp3", "fileName": "ok"}"#)
        .create_async()
        .await;

    let resolver = make_resolver(resolver_config(&server.url()));
    let source = resolver.resolve(&ResolveRequest::from_hash("abc123")).await;
    assert_eq!(source.expect("第二层应当命中").url, "http://m/ok.mp3");
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": {"play_url": "http://x/y.mp3", "audio_name": "Song"}}"#)
        .expect(2)
        .create_async()
        .await;

    let resolver = make_resolver(resolver_config(&server.url()));
    let request = ResolveRequest::from_hash("abc123");

    let first = resolver.resolve(&request).await.expect("第一次解析");
    let second = resolver.resolve(&request).await.expect("第二次解析");
    assert_eq!(first, second);
}
