use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use journeyscope::config::ServiceConfig;
use journeyscope::service::HttpJourneyService;

#[allow(dead_code)]
pub fn service_for(server: &MockServer) -> HttpJourneyService {
    let config = ServiceConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    };
    HttpJourneyService::new(&config).expect("failed to build http service")
}

#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Two steps sent out of order, with a placeholder event and a video
#[allow(dead_code)]
pub fn onboarding_steps() -> Value {
    json!({
        "success": true,
        "steps": [
            {
                "id": "checkout",
                "name": "Checkout",
                "description": "Payment page",
                "order": 2,
                "events": [
                    { "id": "e9", "name": "Order Placed", "status": "live", "timestamp": 1714557609000_i64 }
                ]
            },
            {
                "id": "onboarding",
                "name": "Onboarding",
                "description": "First run",
                "order": "1",
                "events": [
                    { "id": null, "name": null },
                    {
                        "id": "e7",
                        "name": "Signup Submitted",
                        "status": "live",
                        "timestamp": 1714557605000_i64,
                        "video_url": "https://cdn.example.com/s__1714557600000.webm",
                        "properties": [
                            {
                                "name": "context",
                                "properties": [
                                    { "name": "plan", "type": "string", "order": 2 },
                                    { "name": "source", "type": "string", "order": 1, "value": "ads" }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
