#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use collection_crawler::{CollectionKind, CrawlerConfig, NormalizedRecord, RecordSink, Result};

/// Well-formed response body for each collection
pub fn fixture_body(kind: CollectionKind) -> Value {
    match kind {
        CollectionKind::Posts => json!([
            {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"},
            {"userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore"}
        ]),
        CollectionKind::Comments => json!([
            {"postId": 1, "id": 1, "name": "id labore", "email": "Eliseo@gardner.biz", "body": "laudantium"},
            {"postId": 1, "id": 2, "name": "quo vero", "email": "Jayne_Kuhic@sydney.com", "body": "est natus"},
            {"postId": 1, "id": 3, "name": "odio adipisci", "email": "Nikita@garfield.biz", "body": "quia molestiae"}
        ]),
        CollectionKind::Albums => json!([
            {"userId": 1, "id": 1, "title": "quidem molestiae enim"}
        ]),
        CollectionKind::Photos => json!([
            {
                "albumId": 1,
                "id": 1,
                "title": "accusamus beatae",
                "url": "https://via.placeholder.com/600/92c952",
                "thumbnailUrl": "https://via.placeholder.com/150/92c952"
            },
            {
                "albumId": 1,
                "id": 2,
                "title": "reprehenderit est",
                "url": "https://via.placeholder.com/600/771796",
                "thumbnailUrl": "https://via.placeholder.com/150/771796"
            }
        ]),
        CollectionKind::Users => json!([
            {
                "id": 1,
                "name": "Leanne Graham",
                "username": "Bret",
                "email": "Sincere@april.biz",
                "address": {
                    "street": "Kulas Light",
                    "suite": "Apt. 556",
                    "city": "Gwenborough",
                    "zipcode": "92998-3874",
                    "geo": {"lat": "-37.3159", "lng": "81.1496"}
                },
                "phone": "1-770-736-8031 x56442",
                "website": "hildegard.org",
                "company": {
                    "name": "Romaguera-Crona",
                    "catchPhrase": "Multi-layered client-server neural-net",
                    "bs": "harness real-time e-markets"
                }
            }
        ]),
    }
}

/// Number of records in a collection's fixture body
pub fn fixture_len(kind: CollectionKind) -> usize {
    fixture_body(kind).as_array().map(Vec::len).unwrap_or(0)
}

pub async fn mount(server: &MockServer, kind: CollectionKind, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", kind.name())))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Serve every collection's fixture, except those listed in `overrides`
pub async fn start_api(overrides: Vec<(CollectionKind, ResponseTemplate)>) -> MockServer {
    let server = MockServer::start().await;
    for (kind, template) in overrides.iter().cloned() {
        mount(&server, kind, template).await;
    }
    for kind in CollectionKind::ALL {
        if overrides.iter().any(|(k, _)| *k == kind) {
            continue;
        }
        mount(
            &server,
            kind,
            ResponseTemplate::new(200).set_body_json(fixture_body(kind)),
        )
        .await;
    }
    server
}

pub fn crawler_config(server: &MockServer, output_dir: &Path) -> CrawlerConfig {
    CrawlerConfig {
        base_url: server.uri(),
        output_dir: output_dir.to_path_buf(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Lines of a JSON lines file, or none if the file does not exist
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn delayed(body: Value, delay: Duration) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(body)
        .set_delay(delay)
}

/// Sink that records every call instead of writing files
#[derive(Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<(PathBuf, Vec<NormalizedRecord>)>>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<(PathBuf, Vec<NormalizedRecord>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_with(&self, file_name: &str) -> bool {
        self.calls()
            .iter()
            .any(|(path, _)| path.file_name().is_some_and(|n| n == file_name))
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn append(&self, path: &Path, records: &[NormalizedRecord]) -> Result<usize> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), records.to_vec()));
        Ok(records.len())
    }
}

/// Thread-safe in-memory buffer for capturing log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture log output on the current thread until the guard is dropped
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
