// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end tests of the crawl pipeline against fake clients and stores

use keyword_crawler::crawl::{
    CrawlError, CrawlStage, CrawlStore, Crawler, CrawlerConfig, KeywordScore, MemoryCrawlStore,
    ReqwestPageClient,
};
use std::sync::Arc;
use std::time::Duration;

use super::support::{
    brotli, crawler, deflate, gzip, spawn_http_server, story_page, zlib, CannedResponse,
    CountingStore, FailingStore, FakeClient, FakeReply, SlowStore,
};

const FOX_PAGE: &str = "<body><p>The quick FOX jumps</p></body>";

#[tokio::test]
async fn test_successful_crawl_scores_keywords() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let store = CountingStore::new();
    let crawler = crawler(client.clone(), store.clone());

    let record = crawler
        .crawl("https://example.com/fox", "fox, quick")
        .await
        .unwrap();

    assert_eq!(record.keywords, vec!["fox", "quick"]);
    assert_eq!(
        record.scores,
        vec![KeywordScore::new("fox", 1), KeywordScore::new("quick", 1)]
    );
    assert!(record.raw_html.contains("The quick FOX jumps"));
    assert_eq!(client.calls(), 1);
    assert_eq!(store.inserts(), 1);

    let stored = store.query_top_recent(10).await.unwrap();
    assert_eq!(stored, vec![record]);
}

#[tokio::test]
async fn test_url_is_stored_exactly() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let crawler = crawler(client, CountingStore::new());

    let url = "https://Example.com/Path/?q=Fox&x=1";
    let record = crawler.crawl(url, "fox").await.unwrap();
    assert_eq!(record.url, url);
}

#[tokio::test]
async fn test_duplicate_keywords_are_scored_separately() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://example.com", "fox,FOX, jumps").await.unwrap();
    assert_eq!(record.keywords, vec!["fox", "fox", "jumps"]);
    assert_eq!(record.scores.len(), record.keywords.len());
    for (score, keyword) in record.scores.iter().zip(&record.keywords) {
        assert_eq!(&score.keyword, keyword);
    }
    assert_eq!(record.scores[0].count, 1);
    assert_eq!(record.scores[1].count, 1);
}

#[tokio::test]
async fn test_empty_url_makes_no_network_call() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let store = CountingStore::new();
    let crawler = crawler(client.clone(), store.clone());

    let result = crawler.crawl("", "fox").await;
    assert!(matches!(result, Err(CrawlError::Validation(_))));
    assert_eq!(client.calls(), 0);
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_blank_keywords_make_no_network_call() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let store = CountingStore::new();
    let crawler = crawler(client.clone(), store.clone());

    for keywords in ["", "   ", " , ,, "] {
        let result = crawler.crawl("https://example.com", keywords).await;
        assert!(matches!(result, Err(CrawlError::Validation(_))));
    }
    assert_eq!(client.calls(), 0);
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_not_found_is_status_error_without_write() {
    let client = FakeClient::new(FakeReply::status(404));
    let store = CountingStore::new();
    let crawler = crawler(client.clone(), store.clone());

    let result = crawler.crawl("https://example.com/missing", "fox").await;
    assert!(matches!(result, Err(CrawlError::HttpStatus { code: 404 })));
    assert_eq!(client.calls(), 1);
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_every_non_success_status_fails_uniformly() {
    for status in [301u16, 403, 429, 500, 503] {
        let client = FakeClient::new(FakeReply::status(status));
        let store = CountingStore::new();
        let crawler = crawler(client, store.clone());

        let error = crawler.crawl("https://example.com", "fox").await.unwrap_err();
        assert_eq!(error.stage(), CrawlStage::Status);
        assert!(matches!(error, CrawlError::HttpStatus { code } if code == status));
        assert_eq!(store.inserts(), 0);
    }
}

#[tokio::test]
async fn test_network_failure_is_terminal() {
    let client = FakeClient::new(FakeReply::NetworkFailure("dns lookup failed"));
    let store = CountingStore::new();
    let crawler = crawler(client, store.clone());

    let error = crawler.crawl("https://nowhere.invalid", "fox").await.unwrap_err();
    assert_eq!(error.stage(), CrawlStage::Fetch);
    assert!(error.to_string().contains("dns lookup failed"));
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_gzip_body_is_decoded() {
    let client = FakeClient::new(FakeReply::encoded("gzip", gzip(FOX_PAGE.as_bytes())));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://example.com", "fox").await.unwrap();
    assert_eq!(record.scores, vec![KeywordScore::new("fox", 1)]);
}

#[tokio::test]
async fn test_invalid_gzip_is_decode_error_without_write() {
    let client = FakeClient::new(FakeReply::encoded("gzip", FOX_PAGE.as_bytes().to_vec()));
    let store = CountingStore::new();
    let crawler = crawler(client, store.clone());

    let result = crawler.crawl("https://example.com", "fox").await;
    assert!(matches!(result, Err(CrawlError::Decode(_))));
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_brotli_body_is_decoded() {
    let client = FakeClient::new(FakeReply::encoded("br", brotli(FOX_PAGE.as_bytes())));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://example.com", "quick").await.unwrap();
    assert_eq!(record.scores, vec![KeywordScore::new("quick", 1)]);
}

#[tokio::test]
async fn test_corrupt_brotli_is_decode_error() {
    let client = FakeClient::new(FakeReply::encoded("br", vec![0x11u8; 64]));
    let store = CountingStore::new();
    let crawler = crawler(client, store.clone());

    let result = crawler.crawl("https://example.com", "fox").await;
    assert!(matches!(result, Err(CrawlError::Decode(_))));
    assert_eq!(store.inserts(), 0);
}

#[tokio::test]
async fn test_compressed_deflate_reaching_pipeline_is_not_persisted() {
    // A client that does not inflate deflate hands the compressed bytes on.
    for paragraphs in [1usize, 12, 150] {
        let page = story_page(paragraphs);
        let client = FakeClient::new(FakeReply::encoded("deflate", deflate(page.as_bytes())));
        let store = CountingStore::new();
        let crawler = crawler(client, store.clone());

        let result = crawler.crawl("https://example.com", "fox").await;
        assert!(
            matches!(result, Err(CrawlError::Parse(_))),
            "{} paragraphs scored as text",
            paragraphs
        );
        assert_eq!(store.inserts(), 0);
    }
}

#[tokio::test]
async fn test_deflate_page_is_inflated_by_http_client() {
    let page = story_page(30);
    let body = zlib(page.as_bytes());
    let addr = spawn_http_server(move |_| {
        CannedResponse::new("200 OK", body.clone())
            .header("Content-Type", "text/html")
            .header("Content-Encoding", "deflate")
    })
    .await;

    let config = CrawlerConfig::default();
    let store = MemoryCrawlStore::new();
    let crawler = Crawler::new(
        Arc::new(ReqwestPageClient::new(&config).unwrap()),
        Arc::new(store.clone()),
        &config,
    );

    let record = crawler
        .crawl(&format!("http://{}/story", addr), "fox, story")
        .await
        .unwrap();
    assert_eq!(
        record.scores,
        vec![KeywordScore::new("fox", 30), KeywordScore::new("story", 30)]
    );
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_unknown_encoding_is_passed_through() {
    let client = FakeClient::new(FakeReply::encoded("identity", FOX_PAGE.as_bytes().to_vec()));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://example.com", "jumps").await.unwrap();
    assert_eq!(record.scores[0].count, 1);
}

#[tokio::test]
async fn test_encyclopedia_region_is_scored() {
    let html = r#"<html><body>
        <nav>fox fox fox</nav>
        <main>fox in the main region</main>
        <div id="mw-content-text"><p>Article about wolves</p></div>
    </body></html>"#;
    let client = FakeClient::new(FakeReply::html(html));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://en.wikipedia.org/wiki/Wolf", "fox, wolves").await.unwrap();
    assert_eq!(
        record.scores,
        vec![KeywordScore::new("fox", 0), KeywordScore::new("wolves", 1)]
    );
    assert!(record.raw_html.contains("fox in the main region"));
}

#[tokio::test]
async fn test_navigation_text_is_not_scored() {
    let html = r#"<body>
        <header>Fox News header</header>
        <nav>fox | fox</nav>
        <div class="story"><p>A single fox story</p></div>
        <footer>fox footer</footer>
    </body>"#;
    let client = FakeClient::new(FakeReply::html(html));
    let crawler = crawler(client, CountingStore::new());

    let record = crawler.crawl("https://example.com", "fox").await.unwrap();
    assert_eq!(record.scores[0].count, 1);
}

#[tokio::test]
async fn test_store_failure_is_persistence_error() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let crawler = crawler(client, Arc::new(FailingStore));

    let error = crawler.crawl("https://example.com", "fox").await.unwrap_err();
    assert_eq!(error.stage(), CrawlStage::Persist);
    assert!(error.to_string().contains("connection reset by store"));
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let inner = MemoryCrawlStore::new();
    let store = Arc::new(SlowStore {
        inner: inner.clone(),
        delay: Duration::from_secs(5),
    });
    let crawler = crawler(client, store).with_persist_timeout(Duration::from_millis(50));

    let result = crawler.crawl("https://example.com", "fox").await;
    assert!(matches!(result, Err(CrawlError::Persistence(_))));
    assert!(inner.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_crawls_share_one_store() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let store = CountingStore::new();
    let crawler = Arc::new(crawler(client.clone(), store.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let crawler = crawler.clone();
        handles.push(tokio::spawn(async move {
            crawler
                .crawl(&format!("https://example.com/{}", i), "fox")
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(client.calls(), 8);
    assert_eq!(store.inserts(), 8);
    assert_eq!(store.query_top_recent(10).await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_results_are_newest_first() {
    let client = FakeClient::new(FakeReply::html(FOX_PAGE));
    let store = CountingStore::new();
    let crawler = crawler(client, store.clone());

    crawler.crawl("https://example.com/first", "fox").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    crawler.crawl("https://example.com/second", "fox").await.unwrap();

    let recent = store.query_top_recent(1).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].url, "https://example.com/second");
}
