//! Integration tests for the session and the catalog resolver

use bsbilibili::api::catalog;
use bsbilibili::{BilibiliError, SessionSettings, UpstreamSession};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({"code": 0, "message": "0", "ttl": 1, "data": data})
}

async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "buvid3=abc; Path=/")
                .set_body_string("<html></html>"),
        )
        .mount(server)
        .await;
}

async fn open_session(server: &MockServer) -> UpstreamSession {
    mount_landing(server).await;
    let settings = SessionSettings::builder()
        .landing_url(format!("{}/", server.uri()))
        .api_base(server.uri())
        .favorites_max_pages(5)
        .build();
    UpstreamSession::open(settings).await.unwrap()
}

#[tokio::test]
async fn test_session_captures_cookie_and_reuses_it() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    assert_eq!(session.cookie_header().as_deref(), Some("buvid3=abc"));

    Mock::given(method("GET"))
        .and(path("/x/web-interface/search/type"))
        .and(header("cookie", "buvid3=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"result": []}))))
        .expect(1)
        .mount(&server)
        .await;

    let records = catalog::search(&session, "anything").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_session_tolerates_missing_cookie_and_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let settings = SessionSettings::builder()
        .landing_url(format!("{}/", server.uri()))
        .api_base(server.uri())
        .build();
    let session = UpstreamSession::open(settings).await.unwrap();
    assert!(session.cookie_header().is_none());
}

#[tokio::test]
async fn test_session_fails_on_transport_error() {
    // Port fermé : la connexion est refusée
    let settings = SessionSettings::builder()
        .landing_url("http://127.0.0.1:1/")
        .build();
    let err = UpstreamSession::open(settings).await.unwrap_err();
    assert!(matches!(err, BilibiliError::Http(_)));
}

#[tokio::test]
async fn test_search_normalizes_records() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/web-interface/search/type"))
        .and(query_param("keyword", "test"))
        .and(query_param("search_type", "video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "result": [
                {"bvid": "BVabc123", "title": "<b>Song</b>", "aid": 1, "author": "A", "mid": 2, "pic": "//img/x.jpg"},
                {"bvid": "", "title": "ghost", "aid": 3, "author": "B", "mid": 4, "pic": "//img/y.jpg"},
                {"bvid": "BVdef456", "title": "Other <em class=\"keyword\">test</em>", "aid": 5, "author": "C", "mid": 6, "pic": "http://img/z.jpg", "duration": "3:25"}
            ]
        }))))
        .mount(&server)
        .await;

    let records = catalog::search(&session, "test").await.unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.id, "abc123");
    assert_eq!(first.title, "Song");
    assert_eq!(first.author_name, "A");
    assert_eq!(first.author_id, 2);
    assert_eq!(first.cover_url, "//img/x.jpg");
    assert_eq!(first.duration_seconds, None);

    let second = &records[1];
    assert_eq!(second.id, "def456");
    assert_eq!(second.title, "Other test");
    assert_eq!(second.cover_url, "//img/z.jpg");
    assert_eq!(second.duration_seconds, Some(205));

    for record in &records {
        assert!(!record.id.is_empty());
        assert!(!record.title.contains('<'));
    }
}

#[tokio::test]
async fn test_search_without_result_is_schema_error() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/web-interface/search/type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"numResults": 0}))))
        .mount(&server)
        .await;

    match catalog::search(&session, "nothing").await {
        Err(BilibiliError::Schema { endpoint, field }) => {
            assert_eq!(endpoint, "search");
            assert_eq!(field, "data.result");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_platform_error_code_is_api_error() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -404,
            "message": "啥都木有",
            "ttl": 1
        })))
        .mount(&server)
        .await;

    match catalog::get_detail(&session, "missing").await {
        Err(BilibiliError::Api { code, message }) => {
            assert_eq!(code, -404);
            assert_eq!(message, "啥都木有");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_detail_adds_prefix_and_strips_title() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .and(query_param("bvid", "BVabc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "bvid": "BVabc123",
            "aid": 1,
            "title": "<i>Detail</i> title",
            "pic": "http://i0.hdslb.com/bfs/archive/x.jpg",
            "duration": 245,
            "owner": {"mid": 99, "name": "Uploader"}
        }))))
        .expect(2)
        .mount(&server)
        .await;

    for id in ["abc123", "BVabc123"] {
        let record = catalog::get_detail(&session, id).await.unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.title, "Detail title");
        assert_eq!(record.author_name, "Uploader");
        assert_eq!(record.author_id, 99);
        assert_eq!(record.cover_url, "//i0.hdslb.com/bfs/archive/x.jpg");
        assert_eq!(record.duration_seconds, Some(245));
    }
}

#[tokio::test]
async fn test_empty_pagelist_is_not_found() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/player/pagelist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;

    let err = catalog::resolve_content_index(&session, "abc").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_resolve_playable_chain() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/player/pagelist"))
        .and(query_param("bvid", "BVabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            {"cid": 1001, "page": 1, "part": "P1"},
            {"cid": 1002, "page": 2, "part": "P2"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/x/player/playurl"))
        .and(query_param("bvid", "BVabc"))
        .and(query_param("cid", "1001"))
        .and(query_param("fnval", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "dash": {"audio": [
                {"id": 30280, "baseUrl": "https://upos.example.com/a.m4s?deadline=1&sig=x"},
                {"id": 30216, "baseUrl": "https://upos.example.com/b.m4s"}
            ]}
        }))))
        .mount(&server)
        .await;

    let locator = catalog::resolve_playable(&session, "abc").await.unwrap();
    assert_eq!(locator.content_index, 1001);
    assert_eq!(locator.media_url.host_str(), Some("upos.example.com"));
    assert_eq!(locator.media_url.path(), "/a.m4s");
}

#[tokio::test]
async fn test_playurl_without_dash_is_schema_error() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/player/playurl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "durl": [{"url": "https://upos.example.com/v.flv"}]
        }))))
        .mount(&server)
        .await;

    match catalog::resolve_media_url(&session, "abc", 1).await {
        Err(BilibiliError::Schema { field, .. }) => assert_eq!(field, "data.dash"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_favorite_list_follows_pages() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/v3/fav/resource/list"))
        .and(query_param("media_id", "12345"))
        .and(query_param("pn", "1"))
        .and(query_param("platform", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "info": {"id": 12345, "title": "Mix"},
            "medias": [
                {"bvid": "BV1", "title": "One", "cover": "http://img/1.jpg", "duration": 60, "upper": {"mid": 1, "name": "U1"}},
                {"bvid": "BV2", "title": "Two", "cover": "http://img/2.jpg", "duration": 120, "upper": {"mid": 2, "name": "U2"}}
            ],
            "has_more": true
        }))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/x/v3/fav/resource/list"))
        .and(query_param("media_id", "12345"))
        .and(query_param("pn", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "medias": [
                {"bvid": "BV3", "title": "Three", "cover": "http://img/3.jpg", "duration": 30, "upper": {"mid": 3, "name": "U3"}}
            ],
            "has_more": false
        }))))
        .mount(&server)
        .await;

    let records = catalog::resolve_favorite_list(&session, "12345").await.unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    let total: u32 = records.iter().filter_map(|r| r.duration_seconds).sum();
    assert_eq!(total, 210);
}

#[tokio::test]
async fn test_empty_favorite_folder() {
    let server = MockServer::start().await;
    let session = open_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/x/v3/fav/resource/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "medias": null,
            "has_more": false
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let records = catalog::resolve_favorite_list(&session, "777").await.unwrap();
    assert!(records.is_empty());
}
