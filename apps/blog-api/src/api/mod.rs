//! API routes, nested under `/api` by `axum_helpers::create_router`

pub mod health;

use axum::Router;
use axum_helpers::JwtAuth;
use domain_blogs::{BlogPolicy, BlogRepository, BlogService};
use domain_users::{BlogDirectory, UserRepository, UserService};
use std::sync::Arc;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    domain_routes(
        Arc::clone(&state.blogs),
        Arc::clone(&state.users),
        state.auth.clone(),
        state.config.blog_policy,
    )
    .merge(health::router(state.mongo_client.clone()))
}

/// Blog, user and login routes over any pair of repositories sharing state
pub fn domain_routes<B, U>(blogs: Arc<B>, users: Arc<U>, auth: JwtAuth, policy: BlogPolicy) -> Router
where
    B: BlogRepository + BlogDirectory + 'static,
    U: UserRepository + 'static,
{
    let blog_service = BlogService::from_shared(Arc::clone(&blogs), Arc::clone(&users), auth.clone())
        .with_policy(policy);
    let user_service = UserService::from_shared(users, blogs, auth);

    Router::new()
        .nest("/blogs", domain_blogs::handlers::router(blog_service))
        .nest("/users", domain_users::handlers::router(user_service.clone()))
        .nest("/login", domain_users::handlers::login_router(user_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::JwtConfig;
    use domain_blogs::InMemoryBlogRepository;
    use domain_users::InMemoryUserRepository;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let auth = JwtAuth::new(&JwtConfig::new("blog-api-test-secret-32-characters!"));
        let routes = domain_routes(
            Arc::new(InMemoryBlogRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            auth,
            BlogPolicy::default(),
        );
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            axum_helpers::create_router::<ApiDoc>(routes).unwrap()
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_register_login_and_post() {
        let app = app();

        let (status, _) = send(
            &app,
            post(
                "/api/users",
                None,
                json!({ "username": "hellas", "name": "Arto Hellas", "password": "salainen" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, login) = send(
            &app,
            post("/api/login", None, json!({ "username": "hellas", "password": "salainen" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = login["token"].as_str().unwrap();

        let (status, created) = send(
            &app,
            post(
                "/api/blogs",
                Some(token),
                json!({ "title": "First class tests", "url": "http://blog.cleancoder.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["user"]["username"], "hellas");

        let (status, users) = send(&app, get("/api/users")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(users[0]["blogs"][0]["title"], "First class tests");

        let (status, blogs) = send(&app, get("/api/blogs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(blogs.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let (status, body) = send(&app(), get("/api/nothing-here")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "unknown endpoint" }));
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let (status, doc) = send(&app(), get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);

        let paths = doc["paths"].as_object().unwrap();
        for path in ["/api/blogs", "/api/blogs/{id}", "/api/users", "/api/login"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
