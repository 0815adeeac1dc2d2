//! Handler tests for the Blogs domain
//!
//! Blog, user and login routers are mounted together over the in-memory repositories,
//! so a request's effects can be checked through the repositories directly.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_blogs::*;
use domain_users::{InMemoryUserRepository, User, UserRepository, UserService, password};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "blog-handler-test-secret-with-32+chars";

struct TestApp {
    router: Router,
    blogs: InMemoryBlogRepository,
    users: InMemoryUserRepository,
    auth: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        Self::with_policy(BlogPolicy::default())
    }

    fn with_policy(policy: BlogPolicy) -> Self {
        let blogs = InMemoryBlogRepository::new();
        let users = InMemoryUserRepository::new();
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));

        let blog_service =
            BlogService::new(blogs.clone(), users.clone(), auth.clone()).with_policy(policy);
        let user_service = UserService::new(users.clone(), blogs.clone(), auth.clone());

        let router = Router::new()
            .nest("/api/blogs", handlers::router(blog_service))
            .nest("/api/users", domain_users::handlers::router(user_service.clone()))
            .nest("/api/login", domain_users::handlers::login_router(user_service));

        Self {
            router,
            blogs,
            users,
            auth,
        }
    }

    async fn user(&self, username: &str) -> (User, String) {
        let hash = password::hash_password("sekret").unwrap();
        let user = self
            .users
            .create(User::new(username, Some("Superuser".into()), hash, true))
            .await
            .unwrap();
        let token = self.auth.issue(user.id, &user.username).unwrap();
        (user, token)
    }

    /// Stores a blog and links it to `owner`, as a successful create would
    async fn blog(&self, owner: &User, title: &str, likes: i64) -> Blog {
        let blog = self
            .blogs
            .create(Blog::new(title, format!("https://{title}.example"), owner.id).with_likes(likes))
            .await
            .unwrap();
        self.users.add_blog(owner.id, blog.id).await.unwrap();
        blog
    }

    async fn blog_count(&self) -> usize {
        self.blogs.list().await.unwrap().len()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_list_blogs_in_stored_order() {
    let app = TestApp::new();
    let (root, _) = app.user("root").await;
    app.blog(&root, "React patterns", 7).await;
    app.blog(&root, "Go To Statement Considered Harmful", 5).await;

    let (status, body) = app.send("GET", "/api/blogs", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let blogs = body.as_array().unwrap();
    assert_eq!(blogs.len(), 2);
    assert_eq!(blogs[0]["title"], "React patterns");
    assert_eq!(blogs[0]["user"]["username"], "root");
    assert!(blogs[0]["id"].is_string());
    assert!(blogs[0].get("_id").is_none());
}

#[tokio::test]
async fn test_create_blog_returns_201_and_links_owner() {
    let app = TestApp::new();
    let (root, token) = app.user("root").await;
    app.blog(&root, "existing", 1).await;

    let (status, body) = app
        .send(
            "POST",
            "/api/blogs",
            Some(&token),
            Some(json!({
                "title": "Type wars",
                "author": "Robert C. Martin",
                "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["likes"], 0);
    assert_eq!(body["author"], "Robert C. Martin");
    assert_eq!(body["user"]["id"], root.id.to_string());

    assert_eq!(app.blog_count().await, 2);
    let stored = app.users.get_by_id(root.id).await.unwrap().unwrap();
    assert_eq!(stored.blogs.len(), 2);
    assert_eq!(stored.blogs[1].to_string(), body["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_create_blog_without_title_or_url_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.user("root").await;

    for payload in [
        json!({ "author": "nobody", "url": "https://example.com" }),
        json!({ "title": "no url", "likes": 3 }),
    ] {
        let (status, body) = app.send("POST", "/api/blogs", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "bad request" }));
    }
    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn test_create_blog_without_valid_token_is_401() {
    let app = TestApp::new();
    app.user("root").await;
    let payload = json!({ "title": "t", "url": "https://example.com" });

    let (status, body) = app.send("POST", "/api/blogs", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token missing or invalid");

    let foreign = JwtAuth::new(&JwtConfig::new("some-other-secret-that-is-long-enough"))
        .issue(uuid::Uuid::now_v7(), "root")
        .unwrap();
    let (status, body) = app.send("POST", "/api/blogs", Some(&foreign), Some(payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid signature");

    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn test_create_blog_checks_token_before_body() {
    let app = TestApp::new();
    app.user("root").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/blogs")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "token missing or invalid");

    let (_, token) = app.user("someone").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/blogs")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.blog_count().await, 0);
}

#[tokio::test]
async fn test_get_blog() {
    let app = TestApp::new();
    let (root, _) = app.user("root").await;
    let blog = app.blog(&root, "React patterns", 7).await;

    let (status, body) = app.send("GET", &format!("/api/blogs/{}", blog.id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "React patterns");
    assert_eq!(body["likes"], 7);

    let (status, _) = app
        .send("GET", &format!("/api/blogs/{}", uuid::Uuid::now_v7()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send("GET", "/api/blogs/5a422a851b54a676234d17f7x", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "malformatted id" }));
}

#[tokio::test]
async fn test_delete_blog_by_owner_returns_204() {
    let app = TestApp::new();
    let (root, token) = app.user("root").await;
    let blog = app.blog(&root, "doomed", 0).await;
    app.blog(&root, "kept", 0).await;

    let (status, body) = app
        .send("DELETE", &format!("/api/blogs/{}", blog.id), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(app.blog_count().await, 1);
    assert!(app.blogs.get_by_id(blog.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_blog_by_other_user_is_rejected() {
    let app = TestApp::new();
    let (root, _) = app.user("root").await;
    let (_, other_token) = app.user("mluukkai").await;
    let blog = app.blog(&root, "not yours", 0).await;

    let (status, body) = app
        .send("DELETE", &format!("/api/blogs/{}", blog.id), Some(&other_token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Only creator can remove post" }));
    assert_eq!(app.blog_count().await, 1);
}

#[tokio::test]
async fn test_delete_blog_errors() {
    let app = TestApp::new();
    let (root, token) = app.user("root").await;
    let blog = app.blog(&root, "kept", 0).await;

    let (status, _) = app.send("DELETE", &format!("/api/blogs/{}", blog.id), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send("DELETE", &format!("/api/blogs/{}", uuid::Uuid::now_v7()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformatted id");

    assert_eq!(app.blog_count().await, 1);
}

#[tokio::test]
async fn test_update_blog_merges_fields() {
    let app = TestApp::new();
    let (root, _) = app.user("root").await;
    let blog = app.blog(&root, "React patterns", 7).await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/blogs/{}", blog.id),
            None,
            Some(json!({ "likes": 8, "title": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 8);
    assert_eq!(body["title"], "React patterns");
    assert_eq!(body["user"]["username"], "root");
    assert_eq!(app.blogs.get_by_id(blog.id).await.unwrap().unwrap().likes, 8);

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/blogs/{}", uuid::Uuid::now_v7()),
            None,
            Some(json!({ "likes": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformatted id");
}

#[tokio::test]
async fn test_update_blog_with_owner_policy() {
    let app = TestApp::with_policy(BlogPolicy::owner_only_updates());
    let (root, token) = app.user("root").await;
    let (_, other_token) = app.user("mluukkai").await;
    let blog = app.blog(&root, "guarded", 1).await;
    let uri = format!("/api/blogs/{}", blog.id);
    let payload = json!({ "likes": 2 });

    let (status, _) = app.send("PUT", &uri, None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send("PUT", &uri, Some(&other_token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only creator can update post");

    let (status, body) = app.send("PUT", &uri, Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 2);
}

#[tokio::test]
async fn test_users_list_expands_blogs() {
    let app = TestApp::new();
    let (root, token) = app.user("root").await;
    let blog = app.blog(&root, "listed", 4).await;
    let doomed = app.blog(&root, "doomed", 0).await;

    let (status, _) = app
        .send("DELETE", &format!("/api/blogs/{}", doomed.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.send("GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
    assert_eq!(users[0]["blogs"], json!([{
        "id": blog.id,
        "title": "listed",
        "url": "https://listed.example",
        "likes": 4
    }]));
}

#[tokio::test]
async fn test_login_then_create_blog() {
    let app = TestApp::new();
    app.user("root").await;

    let (status, body) = app
        .send(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "root", "password": "sekret" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "root");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            "POST",
            "/api/blogs",
            Some(&token),
            Some(json!({ "title": "via login", "url": "https://login.example" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.blog_count().await, 1);
}
