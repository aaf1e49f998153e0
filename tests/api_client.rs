use chrono::NaiveDate;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

use gestao::api::ApiClient;
use gestao::config::TokenStorage;
use gestao::core::appointment;
use gestao::core::call::{CallOrder, Upload};
use gestao::core::status::CallStatus;
use gestao::core::user::{Role, User};
use gestao::pages::appointments::AppointmentsView;
use gestao::pages::call_details::CallDetailsView;
use gestao::pages::calls::CallsView;
use gestao::pages::client_detail::ClientDetailView;
use gestao::pages::layout::Route;
use gestao::pages::login::{self, LoginForm};
use gestao::pages::tasks::TasksView;
use gestao::session::store::SessionStore;
use gestao::session::{Session, SessionProvider};

fn signed_in(id: i64, role: Role) -> SessionProvider {
    SessionProvider::with_session(Session {
        token: "tok-123".into(),
        user: User {
            id,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            role,
            contact: None,
            position: None,
            admission_date: None,
        },
    })
}

fn client(server: &MockServer, session: SessionProvider) -> ApiClient {
    ApiClient::new(&server.base_url(), session).unwrap()
}

#[tokio::test]
async fn every_request_carries_token_and_ngrok_header() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/tasks/list")
                .header("authorization", "Bearer tok-123")
                .header("ngrok-skip-browser-warning", "true");
            then.status(200).json_body(json!([]));
        })
        .await;

    let api = client(&server, signed_in(1, Role::Admin));
    let tasks = api.list_tasks().await.unwrap();
    assert!(tasks.is_empty());
    list.assert_async().await;
}

#[tokio::test]
async fn server_errors_surface_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/list");
            then.status(500).body("boom");
        })
        .await;

    let api = client(&server, signed_in(1, Role::Admin));
    let err = api.list_projects().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn login_persists_and_activates_session() {
    let server = MockServer::start_async().await;
    let login_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({"email": "ana@x.com", "password": "s3nha"}));
            then.status(200).json_body(json!({
                "access_token": "fresh",
                "user": {"id": 7, "name": "Ana", "email": "ana@x.com", "role": "colaborador"}
            }));
        })
        .await;

    let session = SessionProvider::new();
    let api = client(&server, session.clone());
    let dir = std::env::temp_dir().join(format!("gestao-login-{}", std::process::id()));
    let store = SessionStore::new(dir.join("session.json"), TokenStorage::File, server.base_url());
    let form = LoginForm {
        email: " ana@x.com ".into(),
        password: "s3nha".into(),
    };

    let (outcome, route) = login::submit(&api, &store, &form).await;
    assert!(outcome.is_done());
    assert_eq!(route, Route::HOME);
    assert_eq!(session.token().as_deref(), Some("fresh"));
    let stored = store.load().await.unwrap().unwrap();
    assert_eq!(stored.user.id, 7);
    login_mock.assert_async().await;
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn colaborador_task_is_assigned_to_self() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/tasks/create")
                .json_body_partial(r#"{"title": "Backup", "assigned_to_user_id": 5, "status": "Pendente", "priority": "Baixa"}"#);
            then.status(201).json_body(json!({"id": 40}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/tasks/list");
            then.status(200).json_body(json!([]));
        })
        .await;

    let mut view = TasksView::new(client(&server, signed_in(5, Role::Colaborador)));
    view.open_create().unwrap();
    view.form.title = "Backup".into();
    view.form.assigned_to_user_id = Some(99);
    assert!(view.save().await.is_done());
    create.assert_async().await;
}

#[tokio::test]
async fn overlapping_appointment_never_reaches_the_server() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/appointments");
            then.status(200).json_body(json!([{
                "id": 1, "title": "Standup",
                "start": "2024-01-17 09:00:00", "end": "2024-01-17 10:00:00",
                "assigned_to": {"id": 5, "name": "Ana"}
            }]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/appointments");
            then.status(201);
        })
        .await;

    let day = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
    let mut view = AppointmentsView::new(client(&server, signed_in(5, Role::Colaborador)), day);
    // users, clients and projects are not mocked; those loads just report
    view.load().await;
    assert_eq!(view.appointments.len(), 1);

    view.open_create(day).unwrap();
    view.form.title = "Cliente".into();
    view.form.user_id = Some(5);
    view.form.start_time = appointment::parse_time("09:30");
    view.form.end_time = appointment::parse_time("10:30");
    assert!(view.save().await.is_rejected());
    create.assert_hits_async(0).await;

    // back-to-back is fine
    view.form.start_time = appointment::parse_time("10:00");
    view.form.end_time = appointment::parse_time("11:00");
    assert!(view.save().await.is_done());
    create.assert_hits_async(1).await;
}

#[tokio::test]
async fn copy_day_shows_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/appointments");
            then.status(200).json_body(json!([]));
        })
        .await;
    let copy = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/appointments/copy")
                .json_body(json!({"source_date": "2024-01-17", "target_date": "2024-01-18"}));
            then.status(200).json_body(json!({"message": "3 compromissos copiados"}));
        })
        .await;

    let day = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
    let mut view = AppointmentsView::new(client(&server, signed_in(1, Role::Admin)), day);
    let outcome = view.copy_day(day, day.succ_opt().unwrap()).await;
    assert_eq!(outcome.notice().message, "3 compromissos copiados");
    copy.assert_async().await;
}

#[tokio::test]
async fn card_reorder_sends_full_order() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/clients/3");
            then.status(200).json_body(json!({"id": 3, "name": "Padaria"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/clients/3/accesses");
            then.status(200).json_body(json!([
                {"id": 1, "card_name": "A", "card_order": 0, "field_name": "f", "field_value": "1"},
                {"id": 2, "card_name": "B", "card_order": 1, "field_name": "f", "field_value": "2"},
                {"id": 3, "card_name": "C", "card_order": 2, "field_name": "f", "field_value": "3"}
            ]));
        })
        .await;
    let reorder = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/clients/3/cards/reorder")
                .json_body(json!({"order": ["B", "C", "A"]}));
            then.status(200);
        })
        .await;

    let mut view = ClientDetailView::new(client(&server, signed_in(1, Role::Admin)), 3);
    assert!(view.load().await.is_empty());
    let outcome = view.move_card(0, 2).await.unwrap();
    assert!(outcome.is_done());
    reorder.assert_async().await;
    let names: Vec<&str> = view.cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[tokio::test]
async fn failed_reorder_keeps_local_order() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/clients/3/accesses");
            then.status(200).json_body(json!([
                {"id": 1, "card_name": "A", "card_order": 0, "field_name": "f", "field_value": "1"},
                {"id": 2, "card_name": "B", "card_order": 1, "field_name": "f", "field_value": "2"}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/clients/3/cards/reorder");
            then.status(500);
        })
        .await;

    let mut view = ClientDetailView::new(client(&server, signed_in(1, Role::Admin)), 3);
    view.load().await;
    let outcome = view.move_card(1, 0).await.unwrap();
    assert!(!outcome.is_done());
    assert_eq!(view.cards[0].name, "B");
}

#[tokio::test]
async fn card_delete_carries_name_in_body() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/clients/3/cards/delete")
                .json_body(json!({"card_name": "Servidor"}));
            then.status(200);
        })
        .await;

    let api = client(&server, signed_in(1, Role::Admin));
    api.delete_card(3, "Servidor").await.unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn calls_query_sends_filters_and_page() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/calls")
                .query_param("page", "1")
                .query_param("per_page", "6")
                .query_param("status", "Aberto")
                .query_param("search", "vpn")
                .query_param("order", "priority_desc");
            then.status(200).json_body(json!({
                "items": [{"id": 9, "title": "VPN caiu", "status": "Aberto"}],
                "page": 1,
                "pages": 4
            }));
        })
        .await;

    let mut view = CallsView::new(client(&server, signed_in(1, Role::Admin)));
    view.query.page = 3;
    view.set_status(Some(CallStatus::Aberto));
    view.set_search("vpn");
    view.set_order(Some(CallOrder::PriorityDesc));
    assert!(view.fetch().await.is_none());
    list.assert_async().await;
    assert_eq!(view.pages, 4);
    assert_eq!(view.calls[0].id, 9);
}

#[tokio::test]
async fn follow_up_is_posted_as_multipart_then_thread_reloads() {
    let server = MockServer::start_async().await;
    let post = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/calls/8/follow_ups")
                .header_exists("authorization")
                .body_contains("name=\"description\"")
                .body_contains("Cabo trocado")
                .body_contains("name=\"type\"")
                .body_contains("solucao")
                .body_contains("filename=\"foto.png\"");
            then.status(201);
        })
        .await;
    let call = server
        .mock_async(|when, then| {
            when.method(GET).path("/calls/8");
            then.status(200).json_body(json!({"id": 8, "title": "Rede", "status": "Concluído"}));
        })
        .await;
    let thread = server
        .mock_async(|when, then| {
            when.method(GET).path("/calls/8/follow_ups");
            then.status(200).json_body(json!([
                {"id": 1, "description": "Cabo trocado", "type": "solucao",
                 "attachments": [{"file_name": "foto.png", "file_url": "u1.png"}]}
            ]));
        })
        .await;

    let mut view = CallDetailsView::new(client(&server, signed_in(1, Role::Colaborador)), 8);
    view.draft.description = "Cabo trocado".into();
    view.draft.kind = gestao::core::call::FollowUpKind::Solucao;
    view.draft.file = Some(Upload {
        file_name: "foto.png".into(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    });
    assert!(view.add_follow_up().await.is_done());
    post.assert_async().await;
    call.assert_async().await;
    thread.assert_async().await;
    assert_eq!(view.follow_ups.len(), 1);
    assert!(view.draft.description.is_empty());
    let links = view.attachments(&view.follow_ups[0]);
    assert_eq!(links[0].url, format!("{}/calls/uploads/u1.png", server.base_url()));
}
