use std::path::{Path, PathBuf};

use cli::{run_local, Config, RunArgs};
use pipeline::{manifest::param_keys, FileKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: &str = r#"{
    "format": "Biological Observation Matrix 1.0.0",
    "rows": [{"id": "TACGTAGGGG"}, {"id": "TACGGAGGAT"}, {"id": "TACGAAGGGT"}],
    "columns": [{"id": "S1"}, {"id": "S2"}, {"id": "S3"}],
    "matrix_type": "dense",
    "shape": [3, 3],
    "data": [[4, 1, 9], [0, 2, 3], [0, 0, 5]]
}"#;

fn font_available() -> bool {
    // Rendering needs at least one installed font.
    render::FontFace::system_sans_serif().is_ok()
}

/// Writes the table and a manifest naming it artifact `7`.
fn workspace(dir: &Path, provenance: &str) -> PathBuf {
    std::fs::write(dir.join("table.biom"), TABLE).unwrap();
    let manifest = dir.join("artifacts.json");
    std::fs::write(
        &manifest,
        json!({
            "7": {
                "name": provenance,
                "type": "BIOM",
                "files": {"biom": ["table.biom"]}
            }
        })
        .to_string(),
    )
    .unwrap();
    manifest
}

fn args(manifest: PathBuf, out_dir: PathBuf, server: &str) -> RunArgs {
    RunArgs {
        manifest,
        artifact: "7".into(),
        out_dir,
        params: vec![
            (param_keys::SERVER_URL.into(), server.into()),
            (param_keys::API_URL.into(), server.into()),
            (param_keys::MIN_OCCURRENCE.into(), "0.333".into()),
        ],
    }
}

fn config() -> Config {
    Config::parse("[dbbact]\ntimeout_secs = 5\n\n[wordcloud.layout]\nseed = 7\n").unwrap()
}

async fn dbbact() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sequences_fscores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fscore": {"feces": 0.42, "-saliva": 0.17, "human": 0.09},
            "term_count": {"feces": 12, "human": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": {"NumSequences": 1200, "NumAnnotations": 64}
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn deblur_table_produces_four_files() {
    if !font_available() {
        return;
    }
    let server = dbbact().await;
    let dir = tempfile::tempdir().unwrap();
    let manifest = workspace(dir.path(), "deblur final table");
    let out = dir.path().join("out");

    let outcome = run_local(&config(), &args(manifest, out.clone(), &server.uri()))
        .await
        .unwrap();

    assert!(outcome.success, "{}", outcome.message);
    let artifacts = outcome.artifacts.unwrap();
    assert_eq!(
        artifacts[0].files,
        vec![
            (out.join("wordcloud.png"), FileKind::ImageBitmap),
            (out.join("wordcloud.svg"), FileKind::ImageVector),
            (out.join("fscores.tsv"), FileKind::TabularText),
            (out.join("stats.tsv"), FileKind::Log),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(out.join("fscores.tsv")).unwrap(),
        "term\tfscore\nfeces\t0.42\n-saliva\t0.17\nhuman\t0.09\n"
    );
    let stats = std::fs::read_to_string(out.join("stats.tsv")).unwrap();
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"NumSequences\t1200"));
    assert!(lines.contains(&"NumAnnotations\t64"));
    assert!(lines[2].starts_with("query_timestamp\t"));
    let svg = std::fs::read_to_string(out.join("wordcloud.svg")).unwrap();
    assert!(svg.contains("feces"));
}

#[tokio::test]
async fn foreign_provenance_fails_with_the_deblur_message() {
    if !font_available() {
        return;
    }
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let manifest = workspace(dir.path(), "closed reference table");

    let outcome = run_local(
        &config(),
        &args(manifest, dir.path().join("out"), &server.uri()),
    )
    .await
    .unwrap();

    assert!(!outcome.success);
    assert!(outcome.artifacts.is_none());
    assert_eq!(
        outcome.message,
        "Currently, dbBact queries within Qiita are only possible for artifacts that have been produced via \"deblur\"."
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unrelated_server_is_a_remote_failure() {
    if !font_available() {
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>a blog</html>"))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let manifest = workspace(dir.path(), "deblur reference hit table");
    let out = dir.path().join("out");

    let outcome = run_local(&config(), &args(manifest, out.clone(), &server.uri()))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(!outcome.message.is_empty());
    assert!(!out.exists());
}

#[tokio::test]
async fn invalid_parameters_fail_the_run_not_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = workspace(dir.path(), "deblur final table");
    let mut run = args(manifest, dir.path().join("out"), "http://localhost:1");
    run.params
        .push((param_keys::RELATIVE_SCALING.into(), "2.5".into()));

    let outcome = run_local(&config(), &run).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.message.contains(param_keys::RELATIVE_SCALING));
}

#[tokio::test]
async fn missing_manifest_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let run = args(
        dir.path().join("absent.json"),
        dir.path().join("out"),
        "http://localhost:1",
    );

    assert!(run_local(&config(), &run).await.is_err());
}

#[tokio::test]
async fn unknown_colors_and_huge_canvases_fail_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = workspace(dir.path(), "deblur final table");
    let out = dir.path().join("out");
    for (key, value) in [
        (param_keys::BACKGROUND, "notacolor"),
        (param_keys::WIDTH, "100000"),
    ] {
        let mut run = args(manifest.clone(), out.clone(), "http://localhost:1");
        run.params.push((key.into(), value.into()));

        let outcome = run_local(&config(), &run).await.unwrap();

        assert!(!outcome.success, "{key}={value}");
        assert!(outcome.message.contains(key), "{}", outcome.message);
        assert!(!out.exists());
    }
}
