use super::*;
use crate::client::tests::{Harness, idea_json};
use crate::error::ErrorKind;
use crate::transport::tests::MockTransport;
use ideahub_shared::protocol::HttpMethod;
use serde_json::json;

const HISTORY: &str = "/api/Investor/messages/501";
const SEND: &str = "/api/Investor/message";

fn investor_chat(h: &Harness) -> ChatOverlay<MockTransport> {
    ChatOverlay::for_role(h.client.clone(), Role::Investor).unwrap()
}

fn target() -> ConversationTarget {
    let idea: Idea = serde_json::from_value(idea_json(1, "Solar kiosk", "Energy", false, false)).unwrap();
    ConversationTarget::idea_owner(&idea).unwrap()
}

fn history() -> serde_json::Value {
    // 服务端返回的顺序不保证
    json!({
        "success": true,
        "data": [
            { "id": 11, "content": "second", "sender": "entrepreneur", "timestamp": "2024-05-01T10:05:00Z" },
            { "id": 10, "content": "first", "sender": "investor", "timestamp": "2024-05-01T10:00:00Z" }
        ]
    })
}

async fn opened(h: &Harness) -> ChatOverlay<MockTransport> {
    h.transport.mock_response(HttpMethod::Get, HISTORY, 200, history());
    let chat = investor_chat(h);
    chat.open(target()).await.unwrap();
    chat
}

fn contents(chat: &ChatOverlay<MockTransport>) -> Vec<String> {
    chat.state().messages.iter().map(|m| m.content.clone()).collect()
}

#[test]
fn admin_has_no_chat() {
    let h = Harness::signed_in(Role::Admin);
    assert!(ChatOverlay::for_role(h.client.clone(), Role::Admin).is_none());
}

#[test]
fn targets_come_from_the_idea() {
    let target = target();
    assert_eq!(target.peer_id, Id::Number(501));
    assert_eq!(target.peer_name, "Founder");
    assert_eq!(target.idea_id, Some(Id::Number(1)));

    let idea: Idea = serde_json::from_value(idea_json(1, "Solar kiosk", "Energy", false, false)).unwrap();
    assert!(ConversationTarget::interested_investor(&idea).is_none());
}

#[tokio::test]
async fn open_loads_history_in_timestamp_order() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    let state = chat.state();

    assert!(!state.loading);
    assert_eq!(contents(&chat), vec!["first", "second"]);
    assert_eq!(state.messages[0].id, MessageId::Confirmed(Id::Number(10)));
    assert_eq!(state.messages[1].sender_role, Some(Role::Entrepreneur));
    assert_eq!(state.revision, 2);
}

#[tokio::test]
async fn blank_messages_are_not_sent() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    let before = chat.state();

    let err = chat.send("   \n").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(chat.state(), before);
    assert_eq!(h.transport.calls(), vec![format!("GET {}", HISTORY)]);
}

#[tokio::test]
async fn send_is_optimistic_then_confirmed() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    h.transport.mock_response(
        HttpMethod::Post,
        SEND,
        200,
        json!({ "success": true, "data": { "id": 42, "sentAt": "2024-05-01T11:00:00Z" } }),
    );
    let gate = h.transport.hold(HttpMethod::Post, SEND);
    chat.set_draft("hello there");

    let sending = chat.send_draft();
    let inspect = async {
        // 请求挂起期间：草稿已清空，消息以临时 id 出现在末尾
        let state = chat.state();
        assert!(state.draft.is_empty());
        assert!(state.sending);
        let last = state.messages.last().unwrap();
        assert_eq!(last.content, "hello there");
        assert!(last.pending);
        assert!(matches!(last.id, MessageId::Tentative(_)));
        let _ = gate.send(());
    };
    let (result, _) = futures::join!(sending, inspect);
    result.unwrap();

    let state = chat.state();
    assert!(!state.sending);
    let last = state.messages.last().unwrap();
    assert_eq!(last.id, MessageId::Confirmed(Id::Number(42)));
    assert!(!last.pending);
    assert_eq!(contents(&chat), vec!["first", "second", "hello there"]);

    let body: serde_json::Value =
        serde_json::from_str(h.transport.last_request().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "toUserId": 501, "content": "hello there", "chatSessionId": 1 })
    );
}

#[tokio::test]
async fn second_send_while_in_flight_is_rejected() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    h.transport
        .mock_response(HttpMethod::Post, SEND, 200, json!({ "success": true }));
    let gate = h.transport.hold(HttpMethod::Post, SEND);

    let first = chat.send("one");
    let second = async {
        let err = chat.send("two").await.unwrap_err();
        let _ = gate.send(());
        err
    };
    let (first, err) = futures::join!(first, second);

    first.unwrap();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(contents(&chat), vec!["first", "second", "one"]);
    // 服务端没有返回 id 时保留临时 id，但标记为已发送
    assert!(!chat.state().messages[2].pending);
}

#[tokio::test]
async fn failed_send_removes_only_the_optimistic_message() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    let before = chat.state().messages;
    h.transport.mock_response(
        HttpMethod::Post,
        SEND,
        500,
        json!({ "success": false, "message": "boom" }),
    );

    assert!(chat.send("lost").await.is_err());
    let state = chat.state();
    assert_eq!(state.messages, before);
    assert_eq!(state.error.as_deref(), Some(SEND_FAILED));
    assert!(!state.sending);
}

#[tokio::test]
async fn every_list_change_bumps_the_revision() {
    let h = Harness::signed_in(Role::Investor);
    let chat = opened(&h).await;
    h.transport
        .mock_response(HttpMethod::Post, SEND, 200, json!({ "success": true }));
    let start = chat.state().revision;

    chat.send("ping").await.unwrap();
    // 追加一次，确认一次
    assert_eq!(chat.state().revision, start + 2);

    chat.close();
    assert_eq!(chat.state().revision, start + 3);
    assert!(!chat.state().is_open());
}

#[tokio::test]
async fn send_is_rejected_while_history_is_loading() {
    let h = Harness::signed_in(Role::Investor);
    h.transport.mock_response(HttpMethod::Get, HISTORY, 200, history());
    h.transport
        .mock_response(HttpMethod::Post, SEND, 200, json!({ "success": true }));
    let gate = h.transport.hold(HttpMethod::Get, HISTORY);
    let chat = investor_chat(&h);
    chat.set_draft("typed while loading");

    let opening = chat.open(target());
    let typing = async {
        let err = chat.send_draft().await.unwrap_err();
        let state = chat.state();
        assert!(state.loading);
        assert!(!state.can_send());
        assert_eq!(state.draft, "typed while loading");
        let _ = gate.send(());
        err
    };
    let (opened, err) = futures::join!(opening, typing);

    opened.unwrap();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(h.transport.calls(), vec![format!("GET {}", HISTORY)]);
    assert_eq!(contents(&chat), vec!["first", "second"]);

    // 加载完成后草稿仍在，可以正常发送
    chat.send_draft().await.unwrap();
    assert_eq!(contents(&chat), vec!["first", "second", "typed while loading"]);
}

#[tokio::test]
async fn unrecognised_senders_still_load() {
    let h = Harness::signed_in(Role::Investor);
    h.transport.mock_response(
        HttpMethod::Get,
        HISTORY,
        200,
        json!({
            "success": true,
            "data": [
                { "id": 1, "content": "welcome", "sender": "System", "timestamp": "2024-05-01T09:00:00.1234567" },
                { "id": 2, "content": "hi", "sender": "Investor", "timestamp": "2024-05-01T09:01:00" }
            ]
        }),
    );
    let chat = investor_chat(&h);
    chat.open(target()).await.unwrap();

    let state = chat.state();
    assert!(state.error.is_none());
    assert_eq!(contents(&chat), vec!["welcome", "hi"]);
    assert_eq!(state.messages[0].sender_role, None);
    assert_eq!(state.messages[1].sender_role, Some(Role::Investor));
}

#[tokio::test]
async fn history_arriving_after_close_is_ignored() {
    let h = Harness::signed_in(Role::Investor);
    h.transport.mock_response(HttpMethod::Get, HISTORY, 200, history());
    let gate = h.transport.hold(HttpMethod::Get, HISTORY);
    let chat = investor_chat(&h);

    let opening = chat.open(target());
    let closing = async {
        chat.close();
        let _ = gate.send(());
    };
    let (result, _) = futures::join!(opening, closing);

    assert!(result.is_ok());
    let state = chat.state();
    assert!(state.target.is_none());
    assert!(state.messages.is_empty());
    assert!(!state.loading);
}

#[tokio::test]
async fn entrepreneur_channel_uses_its_own_endpoints() {
    let h = Harness::signed_in(Role::Entrepreneur);
    h.transport.mock_response(
        HttpMethod::Get,
        "/api/Entrepreneur/messages/77",
        200,
        json!({ "success": true, "data": [] }),
    );
    h.transport.mock_response(
        HttpMethod::Post,
        "/api/Entrepreneur/message",
        200,
        json!({ "success": true, "data": "sent" }),
    );
    let chat = ChatOverlay::for_role(h.client.clone(), Role::Entrepreneur).unwrap();

    let mut idea = idea_json(5, "Water taxi", "Transport", false, false);
    idea["investorId"] = json!(77);
    let idea: Idea = serde_json::from_value(idea).unwrap();
    chat.open(ConversationTarget::interested_investor(&idea).unwrap())
        .await
        .unwrap();
    chat.send("thanks").await.unwrap();

    let last = chat.state().messages.pop().unwrap();
    assert_eq!(last.sender_role, Some(Role::Entrepreneur));
    // 回执不是对象时保留临时 id
    assert!(matches!(last.id, MessageId::Tentative(_)));
    assert_eq!(
        h.transport.calls(),
        vec![
            "GET /api/Entrepreneur/messages/77".to_string(),
            "POST /api/Entrepreneur/message".to_string(),
        ]
    );
}
