use serde_json::json;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use journeyscope::error::{error_kind, JourneyError};
use journeyscope::service::{endpoints, JourneyService};

mod common;
use common::{mount_json, onboarding_steps, service_for};

fn is_data_unavailable(err: &anyhow::Error) -> bool {
    matches!(error_kind(err), Some(JourneyError::DataUnavailable(_)))
}

#[tokio::test]
async fn test_list_journeys_posts_org_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoints::GET_ORG_JOURNEYS))
        .and(body_json(json!({ "org_id": "org-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "journeys": [
                { "id": "j1", "name": "Signup", "description": "New users", "step_count": 4, "updated_at": "2024-05-01T10:00:00Z" },
                { "id": "j2", "name": "Checkout", "description": null, "step_count": "2", "updated_at": "not a date" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let journeys = service.list_journeys("org-1").await.unwrap();

    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0].step_count.as_deref(), Some("4"));
    assert_eq!(journeys[1].description, None);
}

#[tokio::test]
async fn test_journey_steps_are_parsed_leniently() {
    let server = MockServer::start().await;
    mount_json(&server, endpoints::GET_JOURNEY_STEPS, onboarding_steps()).await;

    let steps = service_for(&server).journey_steps("j1").await.unwrap();

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].order, Some(1));
    assert!(!steps[1].events[0].is_configured());
    assert_eq!(steps[1].events[1].parameter_count(), 2);
}

#[tokio::test]
async fn test_resolve_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoints::GET_USER))
        .and(body_json(json!({ "auth0_id": "auth0|abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": "u1", "org_id": "org-7", "email": "a@example.com" }
        })))
        .mount(&server)
        .await;

    let user = service_for(&server).resolve_user("auth0|abc").await.unwrap();
    assert_eq!(user.org_id, "org-7");
    assert_eq!(user.email.as_deref(), Some("a@example.com"));
}

#[tokio::test]
async fn test_server_error_is_data_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoints::GET_JOURNEY_STEPS))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = service_for(&server).journey_steps("j1").await.unwrap_err();
    assert!(is_data_unavailable(&err));
}

#[tokio::test]
async fn test_success_false_is_data_unavailable() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        endpoints::GET_EVENT_DETAILS,
        json!({ "success": false, "message": "Event not found" }),
    )
    .await;

    let err = service_for(&server)
        .event_details("j1", "e1")
        .await
        .unwrap_err();
    assert!(is_data_unavailable(&err));
    assert!(err.to_string().contains("Event not found"));
}

#[tokio::test]
async fn test_malformed_body_is_data_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoints::GET_ORG_JOURNEYS))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = service_for(&server).list_journeys("org").await.unwrap_err();
    assert!(is_data_unavailable(&err));
}

#[tokio::test]
async fn test_missing_payload_field_is_data_unavailable() {
    let server = MockServer::start().await;
    mount_json(&server, endpoints::GET_JOURNEY_STEPS, json!({ "success": true })).await;

    let err = service_for(&server).journey_steps("j1").await.unwrap_err();
    assert!(is_data_unavailable(&err));
}

#[tokio::test]
async fn test_recording_found() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        endpoints::GET_SESSION_RECORDING,
        json!({
            "success": true,
            "recording": {
                "id": "r1",
                "journeyId": "j1",
                "startTime": "2024-05-01T10:00:00Z",
                "duration": 42500,
                "events": [
                    { "eventId": "e7", "timestamp": 1714557601500_i64, "parameters": { "plan": "pro" } }
                ]
            }
        }),
    )
    .await;

    let recording = service_for(&server)
        .session_recording("j1", "e7")
        .await
        .unwrap();
    assert_eq!(recording.duration, 42_500);
    assert_eq!(recording.events[0].event_id, "e7");
}

#[tokio::test]
async fn test_recording_absent_is_not_found() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        endpoints::GET_SESSION_RECORDING,
        json!({ "success": true, "message": "No recording found" }),
    )
    .await;

    let err = service_for(&server)
        .session_recording("j1", "e7")
        .await
        .unwrap_err();
    assert!(matches!(error_kind(&err), Some(JourneyError::NotFound(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_data_unavailable() {
    let server = MockServer::start().await;
    let service = service_for(&server);
    drop(server);

    let err = service.list_journeys("org").await.unwrap_err();
    assert!(is_data_unavailable(&err));
}
