//! ApiClient against a mock REST backend

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use volunteer_application::ports::{
    ActivityRepository, AssignmentRepository, TaskRepository, UserDirectory,
};
use volunteer_domain::entities::{CreatorSnapshot, TaskDraft};
use volunteer_domain::errors::DomainError;
use volunteer_domain::value_objects::{ActivityId, Progress, TaskId, TaskStatus, UserId};
use volunteer_http::{ApiClient, HttpConfig};

async fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(HttpConfig::fast(format!("{}/api", server.uri()))).unwrap()
}

#[tokio::test]
async fn test_fetch_activity_decodes_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "River cleanup",
            "organization_name": "Green Hands",
            "start_date": "2024-06-01",
            "end_date": "not-a-date",
            "is_public": true,
            "created_by": 2,
            "participant_count": 1,
            "max_participants": 10,
            "participants": [{"id": 3, "name": "Sam", "email": "sam@example.org"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let activity = client(&server)
        .await
        .fetch_activity(ActivityId::new(5))
        .await
        .unwrap();

    assert_eq!(activity.title(), "River cleanup");
    assert!(activity.start_date().is_some());
    assert!(activity.end_date().is_none());
    assert!(activity.has_participant(UserId::new(3)));
    assert_eq!(activity.max_participants(), Some(10));
}

#[tokio::test]
async fn test_status_codes_map_to_domain_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/activities/403"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/activities/500"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server).await;

    let err = api.fetch_activity(ActivityId::new(404)).await.unwrap_err();
    assert_eq!(err, DomainError::not_found("activity", 404));

    let err = api.fetch_activity(ActivityId::new(403)).await.unwrap_err();
    assert!(matches!(err, DomainError::AccessDenied { .. }));

    // exactly one request: no retry
    let err = api.fetch_activity(ActivityId::new(500)).await.unwrap_err();
    assert!(matches!(err, DomainError::CollaboratorUnavailable { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_collaborator_unavailable() {
    let api = ApiClient::new(HttpConfig::fast("http://127.0.0.1:1/")).unwrap();
    let err = api.list_users().await.unwrap_err();
    assert!(matches!(err, DomainError::CollaboratorUnavailable { .. }));
}

#[tokio::test]
async fn test_list_tasks_folds_completed_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities/1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "activity_id": 1, "title": "Sort", "status": "pending",
             "completed": true, "created_by": 2},
            {"id": 11, "activity_id": 1, "title": "Carry", "status": "in_progress",
             "created_by": 1, "creator_role": 0}
        ])))
        .mount(&server)
        .await;

    let tasks = client(&server)
        .await
        .list_tasks(ActivityId::new(1))
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].status(), TaskStatus::Completed);
    assert_eq!(tasks[1].status(), TaskStatus::InProgress);
    assert!(tasks[1].creator().was_admin());
}

#[tokio::test]
async fn test_create_task_posts_creator_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activities/1/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30, "activity_id": 1, "title": "Paint", "status": "pending",
            "completed": false, "created_by": 1, "creator_role": 0, "creator_user_type": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client(&server)
        .await
        .create_task(
            ActivityId::new(1),
            &TaskDraft::titled("Paint").with_hours(2),
            CreatorSnapshot::new(UserId::new(1), true),
        )
        .await
        .unwrap();
    assert_eq!(task.id(), TaskId::new(30));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["creator_role"], json!(0));
    assert_eq!(sent["creator_user_type"], json!("admin"));
    assert_eq!(sent["completed"], json!(false));
    assert_eq!(sent["total_hours"], json!(2));
}

#[tokio::test]
async fn test_assignment_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/7/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"task_id": 7, "user_id": 3, "status": "assigned"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/7/assignments"))
        .and(body_json(json!({"user_id": 4, "status": "assigned"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/7/assignments/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server).await;
    let listed = api.list_assignments(TaskId::new(7)).await.unwrap();
    assert_eq!(listed[0].user_id, UserId::new(3));

    api.add_assignment(TaskId::new(7), UserId::new(4)).await.unwrap();
    api.remove_assignment(TaskId::new(7), UserId::new(3)).await.unwrap();
}

#[tokio::test]
async fn test_join_accepts_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activities/2/join"))
        .and(body_json(json!({"user_id": 9})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let participant = client(&server)
        .await
        .join_activity(ActivityId::new(2), UserId::new(9))
        .await
        .unwrap();
    assert_eq!(participant.user_id, UserId::new(9));
}

#[tokio::test]
async fn test_save_progress_puts_activity() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/4"))
        .and(body_json(json!({"progress": 40})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/5"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let api = client(&server).await;
    api.save_progress(ActivityId::new(4), Progress::new(40))
        .await
        .unwrap();
    let err = api
        .save_progress(ActivityId::new(5), Progress::new(40))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AccessDenied { .. }));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Ada", "user_type": "admin"},
            {"id": 2, "name": "Bo", "is_active": false}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpConfig::fast(format!("{}/api/", server.uri())).with_auth_token("s3cret");
    let users = ApiClient::new(config).unwrap().list_users().await.unwrap();

    assert!(users[0].is_admin);
    assert!(users[0].is_active);
    assert!(!users[1].is_active);
}

#[tokio::test]
async fn test_rejected_update_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities/1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "activity_id": 1, "title": "Sort", "created_by": 2}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/10"))
        .respond_with(ResponseTemplate::new(422).set_body_string("title too long"))
        .mount(&server)
        .await;

    let api = client(&server).await;
    let task = api.list_tasks(ActivityId::new(1)).await.unwrap().remove(0);
    let err = api.update_task(&task).await.unwrap_err();
    assert!(matches!(err, DomainError::ValidationError { .. }));
}
