use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;

use kosha::api::types::{FetchOutcome, ResultRecord};
use kosha::api::{Category, CategoryFetcher, ClientConfig, KoshaClient, ProxyOptions};

const PATH: &str = "/api/proxy";

fn test_config(server: &ServerGuard, page_size: u32) -> ClientConfig {
    ClientConfig {
        api_key: Some("test-key".to_string()),
        endpoint: format!("{}{}", server.url(), PATH),
        timeout: 5,
        retry_backoff_ms: 0,
        page_size,
        proxy: None,
        ..Default::default()
    }
}

fn client(config: ClientConfig) -> KoshaClient {
    KoshaClient::new(config).unwrap()
}

fn rows(n: u32) -> Matcher {
    Matcher::UrlEncoded("numOfRows".to_string(), n.to_string())
}

fn success_body(items: &str) -> String {
    format!(
        r#"{{
            "response": {{
                "header": {{"resultCode": "00", "resultMsg": "NORMAL SERVICE."}},
                "body": {{"items": {{"item": {}}}, "totalCount": 2}}
            }}
        }}"#,
        items
    )
}

const TWO_ITEMS: &str = r#"[
    {"doc_id": "D1", "title": "제42조(추락의 방지)", "highlight_content": "<em class='smart'>추락</em> 위험", "filepath": "https://example.com/d1"},
    {"doc_id": "D2", "title": "제43조(개구부 등의 방호 조치)", "highlight_content": "작업발판", "filepath": "https://example.com/d2"}
]"#;

#[tokio::test]
async fn test_success_sends_expected_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("serviceKey".to_string(), "test-key".to_string()),
            Matcher::UrlEncoded("searchValue".to_string(), "추락".to_string()),
            Matcher::UrlEncoded("category".to_string(), "4".to_string()),
            rows(7),
            Matcher::UrlEncoded("pageNo".to_string(), "1".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body(TWO_ITEMS))
        .expect(1)
        .create_async()
        .await;

    let client = client(test_config(&server, 7));
    let report = client.fetch_report("추락", Category::SafetyRules).await;

    mock.assert_async().await;
    assert_eq!(report.attempts, 1);
    assert_eq!(report.page_size, 7);
    match report.outcome {
        FetchOutcome::Success(records) => {
            assert_eq!(records.len(), 2);
            assert_eq!(
                records[0],
                ResultRecord {
                    document_id: Some("D1".to_string()),
                    title: "제42조(추락의 방지)".to_string(),
                    highlighted_content: "<em class='smart'>추락</em> 위험".to_string(),
                    source_link: "https://example.com/d1".to_string(),
                }
            );
            assert_eq!(records[1].document_id.as_deref(), Some("D2"));
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_object_item_is_normalized() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(success_body(
            r#"{"doc_id": 77, "title": "단일 항목", "highlight_content": "", "filepath": ""}"#,
        ))
        .create_async()
        .await;

    let records = client(test_config(&server, 7))
        .fetch("비계", Category::Law)
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document_id.as_deref(), Some("77"));
    assert_eq!(records[0].title, "단일 항목");
}

#[tokio::test]
async fn test_blank_items_is_empty_result() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"response": {"header": {"resultCode": "00"}, "body": {"items": "", "totalCount": 0}}}"#,
        )
        .create_async()
        .await;

    let report = client(test_config(&server, 7))
        .fetch_report("없는검색어", Category::All)
        .await;

    assert_eq!(report.outcome, FetchOutcome::EmptyResult);
    assert_eq!(report.attempts, 1);
}

#[tokio::test]
async fn test_oversized_response_shrinks_page_size() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", PATH)
        .match_query(rows(3))
        .with_status(413)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", PATH)
        .match_query(rows(2))
        .with_status(413)
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("GET", PATH)
        .match_query(rows(1))
        .with_status(200)
        .with_body(success_body(TWO_ITEMS))
        .expect(1)
        .create_async()
        .await;

    let report = client(test_config(&server, 3))
        .fetch_report("추락", Category::Law)
        .await;

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
    assert_eq!(report.attempts, 3);
    assert_eq!(report.page_size, 1);
    assert!(matches!(report.outcome, FetchOutcome::Success(ref r) if r.len() == 2));
}

#[tokio::test]
async fn test_oversized_response_stops_at_floor() {
    let mut server = Server::new_async().await;
    let at_two = server
        .mock("GET", PATH)
        .match_query(rows(2))
        .with_status(413)
        .expect(1)
        .create_async()
        .await;
    let at_one = server
        .mock("GET", PATH)
        .match_query(rows(1))
        .with_status(413)
        .expect(1)
        .create_async()
        .await;

    let fetcher = client(test_config(&server, 2));
    let report = fetcher.fetch_report("추락", Category::Law).await;

    at_two.assert_async().await;
    at_one.assert_async().await;
    assert_eq!(report.outcome, FetchOutcome::OversizedResponse);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.page_size, 1);
}

#[tokio::test]
async fn test_oversized_response_exhausts_attempts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(413)
        .expect(3)
        .create_async()
        .await;

    let fetcher = client(test_config(&server, 7));
    let report = fetcher.fetch_report("추락", Category::Law).await;

    mock.assert_async().await;
    assert_eq!(report.outcome, FetchOutcome::OversizedResponse);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.page_size, 5);
    assert!(fetcher.fetch("추락", Category::Law).await.is_empty());
}

#[tokio::test]
async fn test_proxy_parameters_shrink_with_page_size() {
    let mut server = Server::new_async().await;
    let oversized = server
        .mock("GET", PATH)
        .match_query(Matcher::AllOf(vec![
            rows(2),
            Matcher::UrlEncoded("maxPage".to_string(), "5".to_string()),
            Matcher::UrlEncoded("lightMode".to_string(), "true".to_string()),
            Matcher::UrlEncoded("dedup".to_string(), "true".to_string()),
            Matcher::UrlEncoded("onError".to_string(), "fallback".to_string()),
        ]))
        .with_status(413)
        .expect(1)
        .create_async()
        .await;
    let smaller = server
        .mock("GET", PATH)
        .match_query(Matcher::AllOf(vec![
            rows(1),
            Matcher::UrlEncoded("maxPage".to_string(), "4".to_string()),
        ]))
        .with_status(200)
        .with_body(success_body(TWO_ITEMS))
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig {
        proxy: Some(ProxyOptions::default()),
        ..test_config(&server, 2)
    };
    let records = client(config).fetch("추락", Category::Law).await;

    oversized.assert_async().await;
    smaller.assert_async().await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let config = ClientConfig {
        api_key: Some("test-key".to_string()),
        endpoint: "http://127.0.0.1:1/api/proxy".to_string(),
        timeout: 5,
        retry_backoff_ms: 0,
        proxy: None,
        ..Default::default()
    };

    let fetcher = client(config);
    let report = fetcher.fetch_report("추락", Category::Law).await;

    assert!(matches!(report.outcome, FetchOutcome::TransportError(_)));
    assert_eq!(report.attempts, 1);
    assert!(fetcher.fetch("추락", Category::Law).await.is_empty());
}

#[tokio::test]
async fn test_other_http_status_is_fatal() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let report = client(test_config(&server, 7))
        .fetch_report("추락", Category::Law)
        .await;

    mock.assert_async().await;
    assert_eq!(report.outcome, FetchOutcome::HttpStatus(500));
    assert_eq!(report.attempts, 1);
}

#[tokio::test]
async fn test_malformed_body_yields_empty() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body>Bad Gateway</body></html>")
        .create_async()
        .await;

    let fetcher = client(test_config(&server, 7));
    let report = fetcher.fetch_report("추락", Category::Law).await;

    assert!(matches!(report.outcome, FetchOutcome::Malformed(_)));
    assert_eq!(report.attempts, 1);
    assert!(fetcher.fetch("추락", Category::Law).await.is_empty());
}

#[tokio::test]
async fn test_service_error_envelope() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"OpenAPI_ServiceResponse": {"cmmMsgHeader": {
                "errMsg": "SERVICE ERROR",
                "returnAuthMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR",
                "returnReasonCode": "30"
            }}}"#,
        )
        .create_async()
        .await;

    let report = client(test_config(&server, 7))
        .fetch_report("추락", Category::Law)
        .await;

    assert_eq!(
        report.outcome,
        FetchOutcome::ApiError {
            code: "30".to_string(),
            message: "SERVICE_KEY_IS_NOT_REGISTERED_ERROR".to_string(),
        }
    );
}

#[tokio::test]
async fn test_domain_error_envelope() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"response": {"header": {"resultCode": "03", "resultMsg": "NODATA_ERROR"}}}"#)
        .create_async()
        .await;

    let fetcher = client(test_config(&server, 7));
    let report = fetcher.fetch_report("추락", Category::Law).await;

    assert_eq!(
        report.outcome,
        FetchOutcome::ApiError {
            code: "03".to_string(),
            message: "NODATA_ERROR".to_string(),
        }
    );
    assert!(fetcher.fetch("추락", Category::Law).await.is_empty());
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    for key in [None, Some("   ".to_string())] {
        let config = ClientConfig {
            api_key: key,
            ..test_config(&server, 7)
        };
        let fetcher = client(config);

        let report = fetcher.fetch_report("추락", Category::Law).await;
        assert_eq!(report.outcome, FetchOutcome::MissingCredential);
        assert_eq!(report.attempts, 0);
        assert!(fetcher.fetch("추락", Category::Law).await.is_empty());
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_keyword_is_passed_through() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .match_query(Matcher::UrlEncoded("searchValue".to_string(), String::new()))
        .with_status(200)
        .with_body(success_body(TWO_ITEMS))
        .expect(1)
        .create_async()
        .await;

    let records = client(test_config(&server, 7))
        .fetch("", Category::All)
        .await;

    mock.assert_async().await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_repeated_fetches_are_identical() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(success_body(TWO_ITEMS))
        .expect(2)
        .create_async()
        .await;

    let fetcher = client(test_config(&server, 7));
    let first = fetcher.fetch("추락", Category::Law).await;
    let second = fetcher.fetch("추락", Category::Law).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
