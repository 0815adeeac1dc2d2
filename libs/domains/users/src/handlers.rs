use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{BlogSummary, CreateUser, LoginRequest, LoginResponse, UserResponse};
use crate::repository::{BlogDirectory, UserRepository};
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user),
    components(
        schemas(UserResponse, BlogSummary, CreateUser),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Users", description = "User registration and listing")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the Login API
#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(
        schemas(LoginRequest, LoginResponse),
        responses(UnauthorizedResponse)
    ),
    tags(
        (name = "Login", description = "Token issuing")
    )
)]
pub struct LoginApiDoc;

/// `GET /` and `POST /` for users
pub fn router<U, D>(service: UserService<U, D>) -> Router
where
    U: UserRepository + 'static,
    D: BlogDirectory + 'static,
{
    Router::new()
        .route("/", get(list_users).post(create_user))
        .with_state(Arc::new(service))
}

/// `POST /` issuing tokens
pub fn login_router<U, D>(service: UserService<U, D>) -> Router
where
    U: UserRepository + 'static,
    D: BlogDirectory + 'static,
{
    Router::new()
        .route("/", post(login))
        .with_state(Arc::new(service))
}

/// List all users with their blogs
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<U: UserRepository, D: BlogDirectory>(
    State(service): State<Arc<UserService<U, D>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<U: UserRepository, D: BlogDirectory>(
    State(service): State<Arc<UserService<U, D>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.create_user(input).await?;
    Ok(Json(user))
}

/// Exchange username and password for a token
#[utoipa::path(
    post,
    path = "",
    tag = "Login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn login<U: UserRepository, D: BlogDirectory>(
    State(service): State<Arc<UserService<U, D>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let response = service.login(input).await?;
    Ok(Json(response))
}
