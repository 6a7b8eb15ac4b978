//! End-to-end tests driving the real router over both transports.
//!
//! Each test wires a fresh hub, serves it on an ephemeral port, and talks
//! to it the way a real client would: identify, chat, and JSON-RPC over
//! the WebSocket channel, plus JSON-RPC over the HTTP endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream};

use irori_server::{
    domain::MessageIdFactory,
    infrastructure::{
        dto::websocket::{ChatPayloadDto, ClientEvent, IdentifyDto, ServerEvent},
        pusher::WebSocketBroadcaster,
        repository::{InMemoryMessageLog, InMemoryPresenceRegistry},
    },
    rpc::{
        methods::{GetActiveUsersMethod, GetMessagesMethod, SendMessageMethod},
        RpcDispatcher,
    },
    ui::{build_router, state::AppState},
    usecase::{
        DisconnectUserUseCase, GetActiveUsersUseCase, GetMessagesUseCase, IdentifyUserUseCase,
        SendChatMessageUseCase,
    },
};
use irori_shared::time::SystemClock;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Wire a fresh hub and serve it on an ephemeral port.
async fn spawn_hub() -> SocketAddr {
    let registry = Arc::new(InMemoryPresenceRegistry::new());
    let message_log = Arc::new(InMemoryMessageLog::new());
    let broadcaster = Arc::new(WebSocketBroadcaster::new());

    let identify_usecase = Arc::new(IdentifyUserUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUserUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatMessageUseCase::new(
        message_log.clone(),
        broadcaster.clone(),
        Arc::new(MessageIdFactory::new()),
        Arc::new(SystemClock),
    ));

    let mut dispatcher = RpcDispatcher::new();
    dispatcher.register(
        "chat.getMessages",
        Arc::new(GetMessagesMethod::new(Arc::new(GetMessagesUseCase::new(
            message_log,
        )))),
    );
    dispatcher.register(
        "chat.sendMessage",
        Arc::new(SendMessageMethod::new(send_chat_usecase.clone())),
    );
    dispatcher.register(
        "chat.getActiveUsers",
        Arc::new(GetActiveUsersMethod::new(Arc::new(
            GetActiveUsersUseCase::new(registry),
        ))),
    );

    let app = build_router(Arc::new(AppState {
        identify_usecase,
        disconnect_usecase,
        send_chat_usecase,
        dispatcher: Arc::new(dispatcher),
        broadcaster,
    }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    ws
}

async fn send_event(ws: &mut WsClient, event: ClientEvent) {
    ws.send(Message::Text(event.to_frame().into())).await.unwrap();
}

async fn identify(ws: &mut WsClient, id: &str, name: &str) {
    send_event(
        ws,
        ClientEvent::Identify(IdentifyDto {
            id: Some(id.to_string()),
            display_name: Some(name.to_string()),
            avatar_url: None,
        }),
    )
    .await;
}

/// Read the next text frame as a typed server event.
async fn next_event(ws: &mut WsClient) -> ServerEvent {
    loop {
        let message = tokio::time::timeout(EVENT_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for server event")
            .expect("connection closed while waiting for server event")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("unparseable server event");
        }
    }
}

/// Call a JSON-RPC method over the channel transport and return the result.
async fn rpc_over_channel(ws: &mut WsClient, method: &str, params: Value, id: Value) -> Value {
    let envelope = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id.clone(),
    });
    send_event(ws, ClientEvent::JsonRpc(envelope.to_string())).await;

    loop {
        if let ServerEvent::JsonRpc(raw) = next_event(ws).await {
            let response: Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(response["id"], id, "response correlates by envelope id");
            return response;
        }
    }
}

#[tokio::test]
async fn test_health_check() {
    // given:
    let addr = spawn_hub().await;

    // when:
    let response = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap();

    // then:
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_identify_announces_join_and_roster() {
    // given:
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;

    // when:
    identify(&mut alice, "u1", "Alice").await;

    // then: the joining connection observes its own join and the roster
    let ServerEvent::UserConnected(user) = next_event(&mut alice).await else {
        panic!("expected user:connected first");
    };
    assert_eq!(user.id, "u1");
    assert_eq!(user.display_name, "Alice");
    assert_eq!(user.status, "online");

    let ServerEvent::UsersUpdated(roster) = next_event(&mut alice).await else {
        panic!("expected users:updated second");
    };
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, "u1");
}

#[tokio::test]
async fn test_presence_scenario_join_join_leave() {
    // given: alice identified
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await; // user:connected u1
    next_event(&mut alice).await; // users:updated [u1]

    // when: bob identifies on a second connection
    let mut bob = connect(addr).await;
    identify(&mut bob, "u2", "Bob").await;

    // then: alice sees the join and the grown roster, in order
    let ServerEvent::UserConnected(user) = next_event(&mut alice).await else {
        panic!("expected user:connected for bob");
    };
    assert_eq!(user.id, "u2");
    let ServerEvent::UsersUpdated(roster) = next_event(&mut alice).await else {
        panic!("expected users:updated");
    };
    let ids: Vec<&str> = roster.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2"]);

    // when: alice disconnects
    alice.close(None).await.unwrap();
    drop(alice);

    // then: bob sees the departure and the shrunk roster
    // (skip bob's own join events first)
    next_event(&mut bob).await; // user:connected u2
    next_event(&mut bob).await; // users:updated [u1, u2]
    let ServerEvent::UserDisconnected(user_id) = next_event(&mut bob).await else {
        panic!("expected user:disconnected for alice");
    };
    assert_eq!(user_id, "u1");
    let ServerEvent::UsersUpdated(roster) = next_event(&mut bob).await else {
        panic!("expected users:updated");
    };
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, "u2");
}

#[tokio::test]
async fn test_chat_message_fans_out_to_all_connections() {
    // given: two identified connections
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await;
    next_event(&mut alice).await;

    let mut bob = connect(addr).await;
    identify(&mut bob, "u2", "Bob").await;
    next_event(&mut alice).await; // bob joined
    next_event(&mut alice).await;
    next_event(&mut bob).await;
    next_event(&mut bob).await;

    // when: bob sends a chat message
    send_event(
        &mut bob,
        ClientEvent::ChatMessage(ChatPayloadDto {
            content: "hello from bob".to_string(),
        }),
    )
    .await;

    // then: both connections receive it, sender included
    for ws in [&mut alice, &mut bob] {
        let ServerEvent::ChatMessage(message) = next_event(ws).await else {
            panic!("expected chat message");
        };
        assert_eq!(message.content, "hello from bob");
        assert_eq!(message.sender.id, "u2");
        assert_eq!(message.sender.display_name, "Bob");
        assert!(!message.id.is_empty());
    }
}

#[tokio::test]
async fn test_rpc_over_channel_send_then_read_back() {
    // given: an identified connection
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await;
    next_event(&mut alice).await;

    // when: sending over RPC, then reading the history back
    let send_response = rpc_over_channel(
        &mut alice,
        "chat.sendMessage",
        json!({"content": "hi"}),
        json!(1),
    )
    .await;

    // then: the send is accepted and carries the connection's identity
    assert_eq!(send_response["result"]["accepted"], json!(true));
    assert_eq!(send_response["result"]["message"]["sender"]["id"], json!("u1"));

    let history = rpc_over_channel(
        &mut alice,
        "chat.getMessages",
        json!({"limit": 10, "offset": 0}),
        json!(2),
    )
    .await;
    let page = history["result"].as_array().unwrap();
    let last = page.last().unwrap();
    assert_eq!(last["content"], json!("hi"));
    assert_eq!(last["sender"]["id"], json!("u1"));
}

#[tokio::test]
async fn test_rpc_over_channel_get_active_users() {
    // given:
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await;
    next_event(&mut alice).await;

    // when:
    let response =
        rpc_over_channel(&mut alice, "chat.getActiveUsers", json!({}), json!("r1")).await;

    // then:
    let roster = response["result"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"], json!("u1"));
}

#[tokio::test]
async fn test_rpc_over_http_shares_the_same_hub() {
    // given: a message sent over HTTP RPC
    let addr = spawn_hub().await;
    let client = reqwest::Client::new();
    let send: Value = client
        .post(format!("http://{addr}/rpc"))
        .body(
            json!({
                "jsonrpc": "2.0",
                "method": "chat.sendMessage",
                "params": {"content": "from http"},
                "id": 1,
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(send["result"]["accepted"], json!(true));
    // HTTP carries no connection identity
    assert_eq!(send["result"]["message"]["sender"]["id"], json!("anonymous"));

    // when: the history is read over the channel transport
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await;
    next_event(&mut alice).await;
    let history = rpc_over_channel(
        &mut alice,
        "chat.getMessages",
        json!({"limit": 10, "offset": 0}),
        json!(2),
    )
    .await;

    // then: both transports see one log
    let page = history["result"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["content"], json!("from http"));
}

#[tokio::test]
async fn test_rpc_over_http_unknown_method() {
    // given:
    let addr = spawn_hub().await;
    let client = reqwest::Client::new();

    // when:
    let response: Value = client
        .post(format!("http://{addr}/rpc"))
        .body(json!({"jsonrpc": "2.0", "method": "chat.unknown", "id": 5}).to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then: an error envelope with the matching id and no result
    assert_eq!(response["id"], json!(5));
    assert_eq!(response["error"]["code"], json!(-32601));
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_rpc_over_http_notification_yields_no_content() {
    // given:
    let addr = spawn_hub().await;
    let client = reqwest::Client::new();

    // when: a request without an id
    let response = client
        .post(format!("http://{addr}/rpc"))
        .body(
            json!({
                "jsonrpc": "2.0",
                "method": "chat.sendMessage",
                "params": {"content": "fire and forget"},
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    // then: empty body, no-content status
    assert_eq!(response.status(), 204);
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_malformed_rpc_body_yields_parse_error_envelope() {
    // given:
    let addr = spawn_hub().await;
    let client = reqwest::Client::new();

    // when:
    let response: Value = client
        .post(format!("http://{addr}/rpc"))
        .body("{not json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then:
    assert_eq!(response["error"]["code"], json!(-32700));
    assert_eq!(response["id"], Value::Null);
}

#[tokio::test]
async fn test_malformed_ws_frame_does_not_kill_the_connection() {
    // given: an identified connection
    let addr = spawn_hub().await;
    let mut alice = connect(addr).await;
    identify(&mut alice, "u1", "Alice").await;
    next_event(&mut alice).await;
    next_event(&mut alice).await;

    // when: garbage, then a valid chat message
    alice
        .send(Message::Text("{not a frame".to_string().into()))
        .await
        .unwrap();
    send_event(
        &mut alice,
        ClientEvent::ChatMessage(ChatPayloadDto {
            content: "still alive".to_string(),
        }),
    )
    .await;

    // then: the connection survives and the valid message arrives
    let ServerEvent::ChatMessage(message) = next_event(&mut alice).await else {
        panic!("expected chat message");
    };
    assert_eq!(message.content, "still alive");
}
