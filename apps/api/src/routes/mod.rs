pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::images::handlers::{self as images, UPLOAD_BODY_LIMIT};
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/auth/signup", post(auth::handle_signup))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/update-profile", put(auth::handle_update_profile))
        // Resumes
        .route("/SaveResume", post(resumes::handle_save_resume))
        .route("/resumes/:user_id", get(resumes::handle_list_resumes))
        .route(
            "/resumes/:user_id/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/resumes/:user_id/:id/pdf", get(resumes::handle_resume_pdf))
        .route("/pdf", post(resumes::handle_preview_pdf))
        // Templates
        .route("/templates", get(resumes::handle_list_templates))
        .route("/templates/:id", get(resumes::handle_get_template))
        // Images
        .route(
            "/images",
            post(images::handle_upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/images/:file_name", delete(images::handle_delete_image))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::in_memory(&Config::local()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart(field: &str, content: &[u8]) -> Request<Body> {
        let boundary = "folio-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"photo\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/images")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "folio-api");
    }

    #[tokio::test]
    async fn test_signup_login_round_trip() {
        let app = app();
        let signup = json!({"name": "Ada", "email": "Ada@Example.com", "password": "pw-123"});
        let response = send(&app, Method::POST, "/auth/signup", Some(signup)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("passwordHash").is_none());

        let login = json!({"email": "ada@example.com", "password": "pw-123"});
        let response = send(&app, Method::POST, "/auth/login", Some(login)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let logged_in = body_json(response).await;
        assert_eq!(logged_in["message"], "Login successful");
        assert_eq!(logged_in["user"]["userId"], body["user"]["userId"]);
    }

    #[tokio::test]
    async fn test_signup_validation_and_duplicates() {
        let app = app();
        let blank = json!({"name": " ", "email": "a@example.com", "password": "pw"});
        let response = send(&app, Method::POST, "/auth/signup", Some(blank)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let signup = json!({"name": "A", "email": "a@example.com", "password": "pw"});
        let response = send(&app, Method::POST, "/auth/signup", Some(signup)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let again = json!({"name": "B", "email": " A@EXAMPLE.COM", "password": "pw2"});
        let response = send(&app, Method::POST, "/auth/signup", Some(again)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_rejections() {
        let app = app();
        let signup = json!({"name": "A", "email": "a@example.com", "password": "right"});
        send(&app, Method::POST, "/auth/signup", Some(signup)).await;

        let wrong = json!({"email": "a@example.com", "password": "wrong"});
        let response = send(&app, Method::POST, "/auth/login", Some(wrong)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Invalid email or password");

        let unknown = json!({"email": "nobody@example.com", "password": "right"});
        let response = send(&app, Method::POST, "/auth/login", Some(unknown)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let blank = json!({"email": "", "password": ""});
        let response = send(&app, Method::POST, "/auth/login", Some(blank)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = app();
        let signup = json!({"name": "A", "email": "a@example.com", "password": "pw"});
        let user = body_json(send(&app, Method::POST, "/auth/signup", Some(signup)).await).await;
        let user_id = user["user"]["userId"].as_str().unwrap().to_string();

        let update = json!({"userId": user_id, "name": "Ada", "profileImageUrl": "https://x.test/a.png"});
        let response = send(&app, Method::PUT, "/auth/update-profile", Some(update)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["message"], "Profile updated successfully");
        assert_eq!(updated["user"]["name"], "Ada");
        assert_eq!(updated["user"]["profileImageUrl"], "https://x.test/a.png");
        assert_eq!(updated["user"]["userId"], user_id.as_str());

        let unknown = json!({"userId": "missing", "name": "X"});
        let response = send(&app, Method::PUT, "/auth/update-profile", Some(unknown)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_then_fetch_resume() {
        let app = app();
        let resume = json!({
            "id": "r1",
            "userId": "u1",
            "templateId": 3,
            "fullName": "Ada Lovelace",
            "skills": "Rust, Analysis",
            "experience": "[{\"Company\":\"Engines Ltd\",\"Position\":\"Analyst\"}]"
        });
        let response = send(&app, Method::POST, "/SaveResume", Some(resume)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let saved = body_json(response).await;

        let response = send(&app, Method::GET, "/resumes/u1/r1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched, saved);
        assert_eq!(fetched["fullName"], "Ada Lovelace");
        assert_eq!(fetched["templateId"], 3);
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_keeps_created_at() {
        let app = app();
        let response = send(&app, Method::POST, "/SaveResume", Some(json!({"userId": "u1"}))).await;
        let first = body_json(response).await;
        let id = first["id"].as_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());

        let update = json!({"id": id, "userId": "u1", "title": "Second", "createdAt": "2000-01-01T00:00:00Z"});
        let second = body_json(send(&app, Method::POST, "/SaveResume", Some(update)).await).await;
        assert_eq!(second["createdAt"], first["createdAt"]);
        assert_eq!(second["title"], "Second");
    }

    #[tokio::test]
    async fn test_save_requires_user_id() {
        let response = send(&app(), Method::POST, "/SaveResume", Some(json!({"id": "r1"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "UserId is required.");
    }

    #[tokio::test]
    async fn test_resumes_partitioned_and_deleted() {
        let app = app();
        for (user, id) in [("u1", "a"), ("u1", "b"), ("u2", "a")] {
            send(&app, Method::POST, "/SaveResume", Some(json!({"id": id, "userId": user}))).await;
        }

        let listed = body_json(send(&app, Method::GET, "/resumes/u1", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
        let empty = body_json(send(&app, Method::GET, "/resumes/nobody", None).await).await;
        assert_eq!(empty, json!([]));

        let response = send(&app, Method::DELETE, "/resumes/u1/a", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, Method::DELETE, "/resumes/u1/a", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/resumes/u2/a", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, Method::GET, "/resumes/u1/a", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stored_resume_pdf() {
        let app = app();
        let resume = json!({"id": "r1", "userId": "u1", "templateId": 7, "fullName": "Ada Lovelace"});
        send(&app, Method::POST, "/SaveResume", Some(resume)).await;

        let response = send(&app, Method::GET, "/resumes/u1/r1/pdf?templateId=2", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Ada_Lovelace_Resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(lopdf::Document::load_mem(&bytes).is_ok());

        let response = send(&app, Method::GET, "/resumes/u1/missing/pdf", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_pdf_with_unknown_template() {
        let resume = json!({"userId": "u1", "fullName": "Preview"});
        let response = send(&app(), Method::POST, "/pdf?templateId=99", Some(resume)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(lopdf::Document::load_mem(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_templates() {
        let app = app();
        let all = body_json(send(&app, Method::GET, "/templates", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 9);

        let one = body_json(send(&app, Method::GET, "/templates/7", None).await).await;
        assert_eq!(one["name"], "Sidebar Template");

        let response = send(&app, Method::GET, "/templates/42", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_upload_and_delete() {
        let app = app();
        let response = app
            .clone()
            .oneshot(multipart("file", b"\x89PNG\r\n\x1a\nrest-of-image"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let file_name = body["fileName"].as_str().unwrap().to_string();
        assert!(file_name.ends_with(".png"));
        assert_eq!(body["url"], format!("memory://images/{file_name}"));

        let uri = format!("/images/{file_name}");
        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_upload_rejections() {
        let app = app();
        let response = app.clone().oneshot(multipart("file", b"%PDF-1.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.clone().oneshot(multipart("other", b"GIF89a")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut oversized = b"GIF89a".to_vec();
        oversized.resize(5 * 1024 * 1024 + 1, 0);
        let response = app.clone().oneshot(multipart("file", &oversized)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
