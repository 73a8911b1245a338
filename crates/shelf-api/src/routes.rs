//! Page routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{auth, dashboard, locations, notifications, settings};

/// Create the application router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .route(
            "/locations/:locationId",
            get(locations::show)
                .delete(locations::delete)
                .post(locations::action),
        )
        .route("/settings", get(settings::show).post(settings::update))
        .route(
            "/settings/profile-picture",
            post(settings::upload_profile_picture),
        )
        .route("/notifications", get(notifications::index))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use crate::test_support::{png_bytes, TestApp};

    async fn json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_post(uri: &str, cookie: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_request_redirects_to_login() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(Request::builder().uri("/locations/loc_1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?redirectTo=%2Flocations%2Floc_1"
        );
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(form_post(
                "/login",
                "",
                "email=jane%40example.com&password=secret123&redirectTo=%2Fsettings",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/settings");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("__authSession="));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(form_post("/login", "", "email=jane%40example.com&password=wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_with_invalid_email() {
        let app = TestApp::new().await;

        let response = app
            .router()
            .oneshot(form_post("/login", "", "email=jane&password="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["errors"]["email"][0], "Please enter a valid email.");
        assert_eq!(body["errors"]["password"][0], "Password is required");
    }

    #[tokio::test]
    async fn test_logout_drops_session() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post("/logout", &cookie, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app.router().oneshot(get("/settings", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_location_page() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(get("/locations/loc_1?page=1&per_page=2", &cookie))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["location"]["name"], "Garage");
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["next"], "?page=2");
    }

    #[tokio::test]
    async fn test_location_page_far_past_the_end() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(get("/locations/loc_1?page=9223372036854775807", &cookie))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["totalItems"], 3);
        assert!(body["items"].as_array().unwrap().is_empty());
        assert_eq!(body["next"], "");
    }

    #[tokio::test]
    async fn test_missing_location_is_not_found() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(get("/locations/nope", &cookie))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_missing_location_is_not_found() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/locations/nope")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_location_flashes_notification() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post("/locations/loc_1", &cookie, "_method=delete"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/locations");
        assert!(response.headers().contains_key(header::SET_COOKIE));
        assert_eq!(app.store.location_count().await, 0);

        let response = app
            .router()
            .oneshot(get("/notifications", &cookie))
            .await
            .unwrap();
        let body = json(response).await;
        assert_eq!(body[0]["title"], "Location deleted");

        let response = app
            .router()
            .oneshot(get("/notifications", &cookie))
            .await
            .unwrap();
        assert_eq!(json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_post_without_delete_intent_is_rejected() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post("/locations/loc_1", &cookie, "name=Attic"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(app.store.location_count().await, 1);
    }

    #[tokio::test]
    async fn test_settings_invalid_email() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post(
                "/settings",
                &cookie,
                "id=u_1&email=not-an-email&username=janedoe",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["errors"]["email"][0], "Please enter a valid email.");
    }

    #[tokio::test]
    async fn test_settings_short_username() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post(
                "/settings",
                &cookie,
                "id=u_1&email=jane%40example.com&username=abc",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["errors"]["username"][0], "Must be at least 4 characters long");
    }

    #[tokio::test]
    async fn test_settings_update() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post(
                "/settings",
                &cookie,
                "id=u_1&email=Jane.Doe%40Example.com&username=janedoe&firstName=Jane",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["email"], "jane.doe@example.com");
        assert_eq!(body["firstName"], "Jane");
    }

    #[tokio::test]
    async fn test_settings_blank_name_clears_it() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        for (body, expected) in [
            ("id=u_1&email=jane%40example.com&username=janedoe&firstName=Jane", serde_json::json!("Jane")),
            ("id=u_1&email=jane%40example.com&username=janedoe", serde_json::json!("Jane")),
            ("id=u_1&email=jane%40example.com&username=janedoe&firstName=", serde_json::Value::Null),
        ] {
            let response = app
                .router()
                .oneshot(form_post("/settings", &cookie, body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json(response).await["firstName"], expected, "after {body}");
        }
    }

    #[tokio::test]
    async fn test_settings_for_another_user_is_forbidden() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app
            .router()
            .oneshot(form_post(
                "/settings",
                &cookie,
                "id=u_2&email=john%40example.com&username=johnny",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_profile_picture_upload() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let boundary = "shelfboundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&png_bytes());
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let response = app
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/settings/profile-picture")
                    .header(header::COOKIE, &cookie)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with(
            "https://abc.supabase.co/storage/v1/object/public/profile-pictures/u_1/profile-"
        ));
        assert!(url.ends_with(".png"));
        assert_eq!(body["updatedUser"]["profilePicture"], url);
        assert_eq!(app.storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let app = TestApp::new().await;
        let cookie = app.login("u_1");

        let response = app.router().oneshot(get("/dashboard", &cookie)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["title"], "Dashboard | shelf.nu");
        assert_eq!(body["totalAssets"], 3);
        assert_eq!(
            body["totalAssetsAtEndOfEachMonth"].as_array().unwrap().len(),
            12
        );
    }
}
