// tests/download_pipeline_test.rs

use music_dl::{
    client::ApiClient,
    config::AppConfig,
    constants::endpoints,
    downloader::Downloader,
    models::{DownloadTarget, FailureKind},
    resolver::{ResolveRequest, UrlResolver},
};
use std::sync::Arc;
use tempfile::tempdir;

fn make_downloader(config: Arc<AppConfig>) -> Downloader {
    let client = Arc::new(ApiClient::new(config.clone()).expect("client"));
    Downloader::new(client, config)
}

#[tokio::test]
async fn test_fetch_streams_body_to_sanitized_file() {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;
    let payload = vec![0xABu8; 4096];
    let mock = server
        .mock("GET", "/file.mp3")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(payload.clone())
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let mut config = AppConfig::default();
    config.save_dir = dir.path().to_path_buf();
    let downloader = make_downloader(Arc::new(config));

    // 文件名带非法字符，且没有扩展名
    let target = DownloadTarget {
        url: format!("{}/file.mp3", server.url()),
        suggested_filename: "歌手/歌名:最终*版".to_string(),
        track: None,
    };

    // --- Act ---
    let outcome = downloader.fetch(&target).await;

    // --- Assert ---
    mock.assert_async().await;
    assert!(outcome.success);
    assert_eq!(outcome.bytes_written, payload.len() as u64);
    assert!(outcome.error.is_none());

    let path = outcome.final_path.expect("成功时必有最终路径");
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "歌手_歌名_最终_版.mp3"
    );
    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[tokio::test]
async fn test_fetch_rejects_non_200_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/file.mp3")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let mut config = AppConfig::default();
    config.save_dir = dir.path().to_path_buf();
    let downloader = make_downloader(Arc::new(config));

    let target = DownloadTarget {
        url: format!("{}/file.mp3", server.url()),
        suggested_filename: "Song".to_string(),
        track: None,
    };
    let outcome = downloader.fetch(&target).await;

    assert!(!outcome.success);
    assert_eq!(outcome.bytes_written, 0);
    assert_eq!(outcome.error, Some(FailureKind::HttpStatus(403)));
    // 非 200 时不应创建文件
    assert!(!dir.path().join("Song.mp3").exists());
}

#[tokio::test]
async fn test_fetch_without_content_length_still_writes() {
    let mut server = mockito::Server::new_async().await;
    // chunked 响应没有 Content-Length，进度上报被跳过但写入照常进行
    let payload = b"mp3-bytes-without-length".to_vec();
    server
        .mock("GET", "/file.mp3")
        .with_status(200)
        .with_chunked_body(move |w| w.write_all(b"mp3-bytes-without-length"))
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let mut config = AppConfig::default();
    config.save_dir = dir.path().to_path_buf();
    let downloader = make_downloader(Arc::new(config));

    let target = DownloadTarget {
        url: format!("{}/file.mp3", server.url()),
        suggested_filename: "NoLength.mp3".to_string(),
        track: None,
    };
    let outcome = downloader.fetch(&target).await;

    assert!(outcome.success);
    assert_eq!(outcome.bytes_written, payload.len() as u64);
    assert_eq!(
        std::fs::read(dir.path().join("NoLength.mp3")).unwrap(),
        payload
    );
}

/// 端到端：hash → 第一层信封 A → 管线写出 `Song.mp3`
#[tokio::test]
async fn test_resolve_then_download_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let media_url = format!("{}/media/y.mp3", server.url());
    server
        .mock("GET", "/primary")
        .match_query(mockito::Matcher::UrlEncoded("hash".into(), "abc123".into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"data": {{"play_url": "{}", "audio_name": "Song"}}}}"#,
            media_url
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/media/y.mp3")
        .with_status(200)
        .with_body(vec![1u8; 1024])
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let mut config = AppConfig::default();
    config.save_dir = dir.path().to_path_buf();
    config.url_templates.insert(
        endpoints::KUGOU_PLAY_DATA.to_string(),
        format!("{}/primary?hash={{hash}}", server.url()),
    );
    config.url_templates.insert(
        endpoints::KUGOU_MOBILE_INFO.to_string(),
        format!("{}/mobile?hash={{hash}}", server.url()),
    );
    let config = Arc::new(config);
    let client = Arc::new(ApiClient::new(config.clone()).expect("client"));

    let resolver = UrlResolver::new(client.clone(), config.clone());
    let source = resolver
        .resolve(&ResolveRequest::from_hash("abc123"))
        .await
        .expect("解析出媒体链接");
    assert_eq!(source.url, media_url);
    assert_eq!(source.filename, "Song");

    let downloader = Downloader::new(client, config);
    let outcome = downloader
        .fetch(&DownloadTarget {
            url: source.url,
            suggested_filename: source.filename,
            track: None,
        })
        .await;

    assert!(outcome.success);
    assert!(outcome.bytes_written > 0);
    let path = dir.path().join("Song.mp3");
    assert!(path.exists());
    assert_eq!(outcome.final_path.unwrap(), path);
}
