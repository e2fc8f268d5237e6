use super::*;
use crate::board::tests::ScriptedConfirm;
use crate::client::tests::{Harness, idea_json};
use crate::route::AppRoute;
use crate::session::AuthPhase;
use crate::transport::tests::MockTransport;
use ideahub_shared::Role;
use ideahub_shared::protocol::HttpMethod;
use serde_json::json;

const MY_IDEAS: &str = "/api/Entrepreneur/my-ideas";
const CREATE: &str = "/api/Entrepreneur/create-idea";

fn board(h: &Harness, answer: bool) -> (EntrepreneurBoard<MockTransport>, Rc<ScriptedConfirm>) {
    let confirm = Rc::new(ScriptedConfirm::answering(answer));
    (EntrepreneurBoard::new(h.client.clone(), confirm.clone()), confirm)
}

fn draft(title: &str, description: &str) -> IdeaDraft {
    IdeaDraft {
        title: title.into(),
        description: description.into(),
        tags: "green, city".into(),
        category: "Energy".into(),
        budget: 5000.0,
    }
}

fn titles(board: &EntrepreneurBoard<MockTransport>) -> Vec<String> {
    board.state().ideas.iter().map(|i| i.title.clone()).collect()
}

async fn loaded_board(h: &Harness, answer: bool) -> (EntrepreneurBoard<MockTransport>, Rc<ScriptedConfirm>) {
    h.transport.mock_response(
        HttpMethod::Get,
        MY_IDEAS,
        200,
        json!({
            "success": true,
            "data": [
                idea_json(1, "Solar kiosk", "Energy", false, false),
                idea_json(2, "Farm drones", "Agriculture", false, false)
            ]
        }),
    );
    let (board, confirm) = board(h, answer);
    board.load().await.unwrap();
    (board, confirm)
}

#[tokio::test]
async fn load_fills_the_list() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = loaded_board(&h, true).await;
    let state = board.state();
    assert!(!state.loading);
    assert_eq!(titles(&board), vec!["Solar kiosk", "Farm drones"]);
}

#[tokio::test]
async fn load_failure_keeps_server_message() {
    let h = Harness::signed_in(Role::Entrepreneur);
    h.transport.mock_response(
        HttpMethod::Get,
        MY_IDEAS,
        500,
        json!({ "success": false, "message": "Database offline" }),
    );
    let (board, _) = board(&h, true);
    assert!(board.load().await.is_err());
    assert_eq!(board.state().error.as_deref(), Some("Database offline"));
    assert!(!board.state().loading);
}

#[tokio::test]
async fn blank_title_is_rejected_without_a_request() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = board(&h, true);

    let err = board.create(&draft("", "x")).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    let err = board.create(&draft("Title", "   ")).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    assert!(h.transport.calls().is_empty());
    assert_eq!(
        board.state().error.as_deref(),
        Some("Title and description are required")
    );
}

#[tokio::test]
async fn unreadable_budget_is_rejected_without_a_request() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = board(&h, true);

    for budget in [f64::NAN, f64::INFINITY] {
        let mut bad = draft("Title", "Body");
        bad.budget = budget;
        let err = board.create(&bad).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    assert!(h.transport.calls().is_empty());
    assert_eq!(
        board.state().error.as_deref(),
        Some("Budget must be a valid number")
    );
}

#[tokio::test]
async fn blank_tags_and_category_are_sent_as_defaults() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = board(&h, true);
    h.transport.mock_response(
        HttpMethod::Post,
        CREATE,
        201,
        json!({ "success": true, "data": idea_json(3, "Water taxi", "Startup", false, false) }),
    );

    let mut plain = draft("Water taxi", "Boats");
    plain.tags = "  ".into();
    plain.category = String::new();
    board.create(&plain).await.unwrap();

    let body: serde_json::Value =
        serde_json::from_str(h.transport.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body["Tags"], "General");
    assert_eq!(body["Category"], "Startup");
}

#[tokio::test]
async fn dismissing_the_notice_keeps_the_error() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = loaded_board(&h, true).await;
    h.transport.mock_response(
        HttpMethod::Post,
        CREATE,
        201,
        json!({ "success": true, "data": idea_json(3, "Water taxi", "Transport", false, false) }),
    );
    board.create(&draft("Water taxi", "Boats")).await.unwrap();
    // 提示还在时又出现校验错误
    assert!(board.create(&draft("", "x")).await.is_err());
    assert!(board.state().notice.is_some());

    board.dismiss_notice();
    let state = board.state();
    assert!(state.notice.is_none());
    assert_eq!(state.error.as_deref(), Some("Title and description are required"));

    board.dismiss_messages();
    assert!(board.state().error.is_none());
}

#[tokio::test]
async fn create_prepends_and_sends_pascal_case() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = loaded_board(&h, true).await;
    h.transport.mock_response(
        HttpMethod::Post,
        CREATE,
        201,
        json!({ "success": true, "data": idea_json(3, "Water taxi", "Transport", false, false) }),
    );

    let created = board.create(&draft("  Water taxi ", "Boats")).await.unwrap();
    assert_eq!(created.id, Id::Number(3));
    assert_eq!(titles(&board), vec!["Water taxi", "Solar kiosk", "Farm drones"]);
    assert!(!board.state().saving);
    assert!(board.state().notice.is_some());

    let body: serde_json::Value =
        serde_json::from_str(h.transport.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body["Title"], "Water taxi");
    assert_eq!(body["Description"], "Boats");
    assert_eq!(body["Budget"], 5000.0);
}

#[tokio::test]
async fn create_failures_map_to_distinct_messages() {
    let cases = [
        (
            409,
            json!({ "success": false }),
            "An idea with this title already exists. Please use a different title.",
        ),
        (
            400,
            json!({ "success": false, "message": "Budget must be positive" }),
            "Invalid data. Please check your input and try again.",
        ),
        (
            500,
            json!({ "success": false, "message": "Quota exceeded" }),
            "Quota exceeded",
        ),
        (500, json!({}), "Failed to create idea. Please try again."),
        (
            200,
            json!({ "success": false, "message": "Limit reached" }),
            "Limit reached",
        ),
    ];

    for (status, body, expected) in cases {
        let h = Harness::signed_in(Role::Entrepreneur);
        h.transport.mock_response(HttpMethod::Post, CREATE, status, body);
        let (board, _) = board(&h, true);

        assert!(board.create(&draft("Title", "Body")).await.is_err());
        assert_eq!(board.state().error.as_deref(), Some(expected), "status {}", status);
        assert!(board.state().ideas.is_empty());
    }
}

#[tokio::test]
async fn create_with_expired_session_asks_to_login_again() {
    let h = Harness::signed_in(Role::Entrepreneur);
    h.transport
        .mock_response(HttpMethod::Post, CREATE, 401, json!({ "success": false }));
    let (board, _) = board(&h, true);

    let err = board.create(&draft("Title", "Body")).await.unwrap_err();
    assert!(err.is(ErrorKind::SessionExpired));
    assert_eq!(
        board.state().error.as_deref(),
        Some("Please login again to create ideas.")
    );
    assert_eq!(h.session().phase(), AuthPhase::Unauthenticated);
    assert_eq!(h.navigator.last(), Some(AppRoute::Login));
}

#[tokio::test]
async fn update_replaces_in_place() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = loaded_board(&h, true).await;
    h.transport.mock_raw(
        HttpMethod::Put,
        "/api/Entrepreneur/update-idea/2",
        204,
        "",
    );

    let updated = board
        .update(&Id::Number(2), &draft("Farm drones v2", "Cheaper"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Farm drones v2");
    assert_eq!(updated.category, "Energy");
    assert_eq!(titles(&board), vec!["Solar kiosk", "Farm drones v2"]);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, confirm) = loaded_board(&h, false).await;

    assert_eq!(board.delete(&Id::Number(1)).await.unwrap(), false);
    assert_eq!(*confirm.prompts.borrow(), vec![DELETE_PROMPT.to_string()]);
    assert_eq!(h.transport.calls(), vec![format!("GET {}", MY_IDEAS)]);
    assert_eq!(board.state().ideas.len(), 2);
}

#[tokio::test]
async fn delete_removes_only_after_acknowledgment() {
    let h = Harness::signed_in(Role::Entrepreneur);
    let (board, _) = loaded_board(&h, true).await;
    h.transport.mock_response(
        HttpMethod::Delete,
        "/api/Entrepreneur/delete-idea/1",
        500,
        json!({ "success": false }),
    );

    assert!(board.delete(&Id::Number(1)).await.is_err());
    assert_eq!(board.state().ideas.len(), 2);
    assert_eq!(board.state().error.as_deref(), Some("Failed to delete idea"));

    h.transport.mock_response(
        HttpMethod::Delete,
        "/api/Entrepreneur/delete-idea/1",
        200,
        json!({ "success": true }),
    );
    assert!(board.delete(&Id::Number(1)).await.unwrap());
    assert_eq!(titles(&board), vec!["Farm drones"]);
}

#[tokio::test]
async fn late_load_after_unmount_changes_nothing() {
    let h = Harness::signed_in(Role::Entrepreneur);
    h.transport.mock_response(
        HttpMethod::Get,
        MY_IDEAS,
        200,
        json!({ "success": true, "data": [idea_json(1, "Solar kiosk", "Energy", false, false)] }),
    );
    let gate = h.transport.hold(HttpMethod::Get, MY_IDEAS);
    let (board, _) = board(&h, true);
    let before = board.state();

    let pending = board.load();
    let finish = async {
        board.unmount();
        let _ = gate.send(());
    };
    let (result, _) = futures::join!(pending, finish);

    assert!(result.is_ok());
    // 卸载前 load 已把 loading 置为 true，之后的结果不再写入
    assert!(board.state().ideas.is_empty());
    assert_eq!(board.state().error, before.error);
}
