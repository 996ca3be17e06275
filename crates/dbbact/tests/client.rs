use std::time::Duration;

use dbbact::{ClientConfig, DbBactClient};
use pipeline::{EnrichmentService, Sequence, ServiceUrl, WordcloudError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> DbBactClient {
    DbBactClient::new(&ClientConfig {
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    })
    .unwrap()
}

fn sequences() -> Vec<Sequence> {
    ["TACGTAGGGG", "TACGGAGGAT"]
        .into_iter()
        .map(|s| Sequence::new(s).unwrap())
        .collect()
}

#[tokio::test]
async fn fscores_posts_the_sequences_and_reads_scores() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sequences_fscores"))
        .and(body_json(json!({"sequences": ["TACGTAGGGG", "TACGGAGGAT"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"feces": 0.41, "-saliva": 0.12})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let scores = client().fscores(&url, &sequences()).await.unwrap();

    assert_eq!(scores.scores.ranked(), vec![("feces", 0.41), ("-saliva", 0.12)]);
}

#[tokio::test]
async fn fscores_reads_term_counts_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sequences_fscores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fscore": {"soil": 0.2},
            "recall": {"soil": 0.3},
            "precision": {"soil": 0.1},
            "term_count": {"soil": 14}
        })))
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let scores = client().fscores(&url, &sequences()).await.unwrap();

    assert_eq!(scores.scores.ranked(), vec![("soil", 0.2)]);
    assert_eq!(scores.term_counts.clamped("soil"), 10);
}

#[tokio::test]
async fn error_status_surfaces_the_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sequences_fscores"))
        .respond_with(ResponseTemplate::new(400).set_body_string("sequence too short"))
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let err = client().fscores(&url, &sequences()).await.unwrap_err();

    match err {
        WordcloudError::RemoteService { message } => assert_eq!(message, "sequence too short"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_remote_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sequences_fscores"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not dbBact</html>"))
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let err = client().fscores(&url, &sequences()).await.unwrap_err();

    assert_eq!(err.kind(), "remote_service");
}

#[tokio::test]
async fn unreachable_server_is_a_remote_service_error() {
    let url = ServiceUrl::new("http://127.0.0.1:9").unwrap();
    let err = client().fscores(&url, &sequences()).await.unwrap_err();

    assert_eq!(err.kind(), "remote_service");
    assert!(err.to_string().contains("127.0.0.1:9"));
}

#[tokio::test]
async fn stats_are_read_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": {"NumSequences": 1200, "NumExperiments": 30, "Database": "dbBact"}
        })))
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let stats = client().stats(&url).await.unwrap();
    let rows: Vec<(String, String)> = stats.rows().collect();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], ("NumSequences".to_string(), "1200".to_string()));
    assert_eq!(rows[2], ("Database".to_string(), "dbBact".to_string()));
    assert_eq!(rows[3].0, "query_timestamp");
}

#[tokio::test]
async fn stats_without_the_stats_member_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let err = client().stats(&url).await.unwrap_err();

    assert_eq!(err.kind(), "remote_service");
}

#[tokio::test]
async fn stats_error_status_surfaces_the_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats/stats"))
        .respond_with(ResponseTemplate::new(503).set_body_string("database is being rebuilt"))
        .expect(1)
        .mount(&server)
        .await;

    let url = ServiceUrl::new(&server.uri()).unwrap();
    let err = client().stats(&url).await.unwrap_err();

    assert_eq!(err.kind(), "remote_service");
    assert_eq!(err.to_string(), "database is being rebuilt");
}
