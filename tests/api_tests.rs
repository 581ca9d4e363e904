use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use casetrack::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

const BOUNDARY: &str = "casetrack-test-boundary";

async fn spawn_app() -> Router {
    let root = std::env::temp_dir().join(format!("casetrack-api-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&root).unwrap();

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", root.join("test.db").display());
    config.uploads.upload_dir = root.join("uploads").to_string_lossy().into_owned();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = casetrack::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    casetrack::api::router(state)
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// (field name, optional filename, content)
fn multipart_request(
    method: &str,
    uri: &str,
    cookie: &str,
    parts: &[(&str, Option<&str>, &str)],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("{}; boundary={BOUNDARY}", mime::MULTIPART_FORM_DATA),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("login should set a session cookie")
        .to_string()
}

async fn create_case(app: &Router, cookie: &str, client_name: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/cases",
            cookie,
            &[
                ("client_name", None, client_name),
                ("case_status", None, "Open"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/api/cases", "/api/cases/1", "/api/auth/me", "/api/uploads/a.pdf"] {
        let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/system/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_list_cases() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &serde_json::json!({ "username": "clerk", "password": "secret1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = login(&app, "clerk", "secret1").await;

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["username"], "clerk");

    let response = app
        .clone()
        .oneshot(get_request("/api/cases", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app().await;
    let payload = serde_json::json!({ "username": "clerk", "password": "secret1" });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bootstrap_admin_can_log_in() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "admin", "password": "wrong1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    login(&app, "admin", "password").await;
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/logout",
            Some(&cookie),
            &serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/cases", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_case_upload_is_served_back() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/cases",
            &cookie,
            &[
                ("client_name", None, "Acme"),
                ("case_status", None, "Open"),
                ("case_file", Some("brief.pdf"), "%PDF-1.4 test"),
                ("interim_orders_file", Some(""), ""),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let case = body_json(response).await["data"].clone();
    assert_eq!(case["client_name"], "Acme");
    assert!(case["interim_orders_file"].is_null());
    let stored_name = case["case_file"].as_str().unwrap().to_string();
    assert!(stored_name.ends_with("_brief.pdf"));

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/uploads/{stored_name}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4 test");

    let response = app
        .clone()
        .oneshot(get_request("/api/uploads/..%2Fconfig.toml", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disallowed_extension_rejected() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/cases",
            &cookie,
            &[
                ("client_name", None, "Acme"),
                ("case_status", None, "Open"),
                ("case_file", Some("payload.exe"), "MZ"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/api/cases", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_overlong_client_name_rejected() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;
    let too_long = "x".repeat(101);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/cases",
            &cookie,
            &[
                ("client_name", None, too_long.as_str()),
                ("case_status", None, "Open"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Client name too long");
}

#[tokio::test]
async fn test_proceedings_lifecycle() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;
    let case = create_case(&app, &cookie, "Acme").await;
    let case_id = case["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/cases/{case_id}/proceedings"),
            Some(&cookie),
            &serde_json::json!({ "proceeding_date": "not-a-date", "description": "Hearing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/cases/{case_id}/proceedings"),
            Some(&cookie),
            &serde_json::json!({
                "proceeding_date": "2024-01-15",
                "description": "Hearing",
                "tentative_date": ""
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let proceeding = body_json(response).await["data"].clone();
    assert_eq!(proceeding["proceeding_date"], "2024-01-15");
    assert!(proceeding["tentative_date"].is_null());
    let proceeding_id = proceeding["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/proceedings/{proceeding_id}"),
            Some(&cookie),
            &serde_json::json!({
                "proceeding_date": "2024-01-20",
                "description": "Adjourned",
                "tentative_date": "2024-02-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["tentative_date"], "2024-02-01");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/cases/{case_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await["data"].clone();
    assert_eq!(detail["client_name"], "Acme");
    assert_eq!(detail["proceedings"].as_array().unwrap().len(), 1);
    assert_eq!(detail["proceedings"][0]["description"], "Adjourned");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/proceedings/{proceeding_id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/proceedings/{proceeding_id}"),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_case_twice() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;
    let case = create_case(&app, &cookie, "Acme").await;
    let case_id = case["id"].as_i64().unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/cases/{case_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        format!("Case {case_id} not found")
    );
}

#[tokio::test]
async fn test_case_form_requires_text_fields() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;

    let response = app
        .clone()
        .oneshot(multipart_request("POST", "/api/cases", &cookie, &[]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "client_name is required");

    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/cases",
            &cookie,
            &[("client_name", None, "Acme")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "case_status is required");

    let response = app
        .clone()
        .oneshot(get_request("/api/cases", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));

    let case = create_case(&app, &cookie, "").await;
    assert_eq!(case["client_name"], "");

    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            &format!("/api/cases/{}", case["id"]),
            &cookie,
            &[("case_status", None, "Closed")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "client_name is required");
}

#[tokio::test]
async fn test_proceeding_payload_errors_use_error_envelope() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "password").await;
    let case = create_case(&app, &cookie, "Acme").await;
    let uri = format!("/api/cases/{}/proceedings", case["id"]);

    for payload in [
        serde_json::json!({ "proceeding_date": "2024-01-15" }),
        serde_json::json!({ "description": "Hearing" }),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, Some(&cookie), &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("missing field"), "{body}");
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .header(header::COOKIE, &cookie)
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/cases/{}", case["id"]), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["data"]["proceedings"],
        serde_json::json!([])
    );
}

#[tokio::test]
async fn test_credentials_payload_errors_use_error_envelope() {
    let app = spawn_app().await;

    for uri in ["/api/auth/register", "/api/auth/login"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                uri,
                None,
                &serde_json::json!({ "username": "clerk" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["success"], false);
    }
}
