//! Activity aggregate driven end to end through the REST client

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use volunteer_application::{
    ActivityAggregate, AggregateState, ApplicationError, AssignmentOp, FixedClock,
    InMemoryEventPublisher,
};
use volunteer_domain::entities::Actor;
use volunteer_domain::value_objects::{ActivityId, ActivityStatus, TaskId, TaskStatus, UserId};
use volunteer_http::{ApiClient, HttpConfig};

const ACTIVITY: i64 = 21;
const OWNER: i64 = 2;

fn task_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "activity_id": ACTIVITY,
        "title": format!("Task {}", id),
        "status": status,
        "completed": status == "completed",
        "created_by": OWNER,
        "creator_user_type": "user"
    })
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/activities/{}", ACTIVITY)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": ACTIVITY,
            "title": "Food drive",
            "organization_name": "Northside Pantry",
            "start_date": "2024-06-01T08:00:00Z",
            "end_date": "2024-06-30T18:00:00Z",
            "is_public": true,
            "created_by": OWNER,
            "participant_count": 1,
            "max_participants": 12,
            "participants": [{"user_id": 3, "name": "Robin", "email": "robin@example.org"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/activities/{}/tasks", ACTIVITY)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(10, "completed"), task_json(11, "pending")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Owner", "email": "owner@example.org"},
            {"id": 3, "name": "Robin", "email": "robin@example.org"},
            {"id": 6, "name": "Kim", "email": "kim@example.org"},
            {"id": 9, "name": "Former", "email": "former@example.org", "is_active": false}
        ])))
        .mount(&server)
        .await;
    server
}

async fn mount_assignments(server: &MockServer, task: i64, users: &[i64], times: Option<u64>) {
    let body: Vec<Value> = users
        .iter()
        .map(|u| json!({"task_id": task, "user_id": u, "status": "assigned"}))
        .collect();
    let mock = Mock::given(method("GET"))
        .and(path(format!("/api/tasks/{}/assignments", task)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

fn aggregate(
    server: &MockServer,
    events: Arc<InMemoryEventPublisher>,
) -> ActivityAggregate<ApiClient, InMemoryEventPublisher> {
    aggregate_as(server, Actor::member(UserId::new(OWNER)), events)
}

fn aggregate_as(
    server: &MockServer,
    actor: Actor,
    events: Arc<InMemoryEventPublisher>,
) -> ActivityAggregate<ApiClient, InMemoryEventPublisher> {
    let client = ApiClient::new(HttpConfig::fast(format!("{}/api", server.uri()))).unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    ActivityAggregate::new(
        ActivityId::new(ACTIVITY),
        actor,
        Arc::new(client),
        events,
        Arc::new(clock),
    )
}

#[tokio::test]
async fn test_load_then_complete_last_task() {
    let server = backend().await;
    mount_assignments(&server, 10, &[3], None).await;
    mount_assignments(&server, 11, &[], None).await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(11, "completed")))
        .expect(1)
        .mount(&server)
        .await;

    let events = Arc::new(InMemoryEventPublisher::new());
    let mut aggregate = aggregate(&server, events.clone());
    aggregate.load().await.unwrap();

    assert!(matches!(aggregate.state(), AggregateState::Ready));
    assert_eq!(aggregate.status(), ActivityStatus::Ongoing);
    assert_eq!(aggregate.progress().value(), 50);
    assert_eq!(aggregate.assignees(TaskId::new(10)), Some(vec![UserId::new(3)]));

    // the creator sees the directory, minus inactive users
    let roster: Vec<i64> = aggregate.roster().iter().map(|u| u.id.get()).collect();
    assert_eq!(roster, vec![2, 3, 6]);

    events.clear();
    aggregate
        .set_task_status(TaskId::new(11), TaskStatus::Completed)
        .await
        .unwrap();

    assert_eq!(aggregate.status(), ActivityStatus::Completed);
    assert_eq!(aggregate.progress().value(), 100);
    assert!(events.event_types().contains(&"ActivityCompleted"));
}

#[tokio::test]
async fn test_partial_assignment_failure_refreshes_from_server() {
    let server = backend().await;
    mount_assignments(&server, 10, &[3], Some(1)).await;
    mount_assignments(&server, 10, &[6], None).await;
    mount_assignments(&server, 11, &[], None).await;

    Mock::given(method("POST"))
        .and(path("/api/tasks/10/assignments"))
        .and(body_json(json!({"user_id": 6, "status": "assigned"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/10/assignments"))
        .and(body_json(json!({"user_id": 7, "status": "assigned"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/10/assignments/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let events = Arc::new(InMemoryEventPublisher::new());
    let mut aggregate = aggregate(&server, events);
    aggregate.load().await.unwrap();

    let err = aggregate
        .set_assignees(TaskId::new(10), [UserId::new(6), UserId::new(7)])
        .await
        .unwrap_err();

    match err {
        ApplicationError::PartialBatchFailure { task_id, failures } => {
            assert_eq!(task_id, TaskId::new(10));
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].user_id, UserId::new(7));
            assert_eq!(failures[0].op, AssignmentOp::Add);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(aggregate.assignees(TaskId::new(10)), Some(vec![UserId::new(6)]));
}

#[tokio::test]
async fn test_unreachable_activity_leaves_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/activities/{}", ACTIVITY)))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let events = Arc::new(InMemoryEventPublisher::new());
    let mut aggregate = aggregate(&server, events.clone());
    let err = aggregate.load().await.unwrap_err();

    assert!(matches!(err, ApplicationError::TransientNetwork(_)));
    assert!(matches!(aggregate.state(), AggregateState::Error(_)));
    assert!(aggregate.view().is_none());
    assert!(events.events().is_empty());
}

#[tokio::test]
async fn test_admin_authored_task_survives_bare_update_reply() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/activities/{}/tasks", ACTIVITY)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 10,
            "activity_id": ACTIVITY,
            "title": "Unload truck",
            "status": "pending",
            "created_by": 1,
            "creator_role": 0
        }])))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_assignments(&server, 10, &[], None).await;

    // the backend echoes the task without any creator role fields
    for status in ["in-progress", "completed"] {
        Mock::given(method("PUT"))
            .and(path("/api/tasks/10"))
            .and(body_partial_json(json!({"status": status, "creator_role": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 10,
                "activity_id": ACTIVITY,
                "title": "Unload truck",
                "status": status,
                "created_by": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let events = Arc::new(InMemoryEventPublisher::new());
    let mut aggregate = aggregate_as(&server, Actor::admin(UserId::new(1)), events);
    aggregate.load().await.unwrap();

    aggregate
        .set_task_status(TaskId::new(10), TaskStatus::InProgress)
        .await
        .unwrap();
    assert!(aggregate.task(TaskId::new(10)).unwrap().creator().was_admin());

    aggregate
        .set_task_status(TaskId::new(10), TaskStatus::Completed)
        .await
        .unwrap();
    let task = aggregate.task(TaskId::new(10)).unwrap();
    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.creator().was_admin());
}
