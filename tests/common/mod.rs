//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::TempDir;
use tower::ServiceExt;

use wimbledon_api::config::{ProducerConfig, ServiceConfig};

pub const API_KEY: &str = "test-key";
pub const USERNAME: &str = "umpire";
pub const PASSWORD: &str = "hawk-eye";

/// A small slice of the real table, including dash variants, a row without a
/// tiebreak value and one malformed row.
pub const FINALS_CSV: &str = "\
year,champion,runner_up,score,sets,tiebreak
2021,Novak Djokovic,Matteo Berrettini,\"6\u{2013}7(4\u{2013}7), 6\u{2013}4, 6\u{2013}4, 6\u{2013}3\",4,1
2019,Novak Djokovic,Roger Federer,\"7-6(7-5), 1-6, 7-6(7-4), 4-6, 13-12(7-3)\",5,
2017,Roger Federer,Marin Cilic,\"6-3, 6-1, 6-4\",3,0
2008,Rafael Nadal,Roger Federer,\"6\u{2014}4, 6\u{2014}4, 6\u{2014}7(5\u{2014}7), 6\u{2014}7(8\u{2014}10), 9\u{2014}7\",5,1
2003,Roger Federer,Mark Philippoussis,\"7-6(7-5), 6-2, 7-6(7-3)\",3,1
1980,Bjorn Borg,John McEnroe,\"1-6, 7-5, 6-3, 6-7(16-18), 8-6\",5,1
19x5,Broken,Row,6-0,1,0
";

/// Temporary directory holding a dataset file.
pub struct TestDataset {
    tmp: TempDir,
    pub path: PathBuf,
}

impl TestDataset {
    pub fn dir(&self) -> &Path {
        self.tmp.path()
    }
}

/// A dataset populated with `FINALS_CSV`.
pub fn dataset() -> TestDataset {
    let dataset = empty_dataset();
    std::fs::write(&dataset.path, FINALS_CSV).unwrap();
    dataset
}

/// A temp dir whose dataset path does not exist yet.
pub fn empty_dataset() -> TestDataset {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wimbledon_finals.csv");
    TestDataset { tmp: dir, path }
}

/// Protected configuration pointing at `path`, with the producer disabled.
pub fn config_for(path: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.api_key = Some(API_KEY.into());
    config.auth.username = Some(USERNAME.into());
    config.auth.password = Some(PASSWORD.into());
    config.dataset.path = path.to_path_buf();
    config.dataset.producer.enabled = false;
    config
}

/// A producer that runs `script` through `sh -c`.
pub fn shell_producer(script: String, timeout_secs: u64) -> ProducerConfig {
    ProducerConfig {
        enabled: true,
        program: "sh".into(),
        args: vec!["-c".into(), script],
        working_dir: None,
        timeout_secs,
    }
}

/// A producer that atomically copies `source` to `target` through a
/// per-process temp file, so concurrent runs never share one.
pub fn copy_producer(source: &Path, target: &Path) -> ProducerConfig {
    shell_producer(
        format!(
            "cp '{src}' '{dst}'.tmp.$$ && mv '{dst}'.tmp.$$ '{dst}'",
            src = source.display(),
            dst = target.display()
        ),
        10,
    )
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Send a GET through the router and decode the JSON body.
pub async fn get(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let mut request = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_slice(&body).unwrap_or_else(
            |_| serde_json::json!({ "raw_body": String::from_utf8_lossy(&body).to_string() }),
        )
    };
    (status, headers, json)
}

/// GET authenticated with the API key header.
pub async fn get_with_key(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = get(app, uri, &[("x-api-key", API_KEY)]).await;
    (status, json)
}
