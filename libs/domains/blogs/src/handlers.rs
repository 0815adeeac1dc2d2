use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    BearerToken, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use domain_users::UserRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::BlogResult;
use crate::models::{BlogOwner, BlogResponse, CreateBlog, UpdateBlog};
use crate::repository::BlogRepository;
use crate::service::BlogService;

/// OpenAPI documentation for the Blogs API
#[derive(OpenApi)]
#[openapi(
    paths(list_blogs, create_blog, get_blog, update_blog, delete_blog),
    components(
        schemas(BlogResponse, BlogOwner, CreateBlog, UpdateBlog),
        responses(
            BadRequestResponse,
            BadRequestIdResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Blogs", description = "Blog listing and management")
    )
)]
pub struct ApiDoc;

/// Blog routes, relative to where they are nested
pub fn router<B, U>(service: BlogService<B, U>) -> Router
where
    B: BlogRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route(
            "/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .with_state(Arc::new(service))
}

/// List all blogs
#[utoipa::path(
    get,
    path = "",
    tag = "Blogs",
    responses(
        (status = 200, description = "List of blogs", body = Vec<BlogResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_blogs<B: BlogRepository, U: UserRepository>(
    State(service): State<Arc<BlogService<B, U>>>,
) -> BlogResult<Json<Vec<BlogResponse>>> {
    let blogs = service.list_blogs().await?;
    Ok(Json(blogs))
}

/// Create a blog owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Blogs",
    request_body = CreateBlog,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_blog<B: BlogRepository, U: UserRepository>(
    State(service): State<Arc<BlogService<B, U>>>,
    token: BearerToken,
    body: Result<ValidatedJson<CreateBlog>, Response>,
) -> Result<(StatusCode, Json<BlogResponse>), Response> {
    // a bad token answers 401 even when the body is unusable too
    service
        .check_token(token.as_deref())
        .map_err(IntoResponse::into_response)?;
    let ValidatedJson(input) = body?;

    let blog = service
        .create_blog(token.as_deref(), input)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Get a blog by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Blogs",
    params(
        ("id" = Uuid, Path, description = "Blog id")
    ),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_blog<B: BlogRepository, U: UserRepository>(
    State(service): State<Arc<BlogService<B, U>>>,
    UuidPath(id): UuidPath,
) -> BlogResult<Json<BlogResponse>> {
    let blog = service.get_blog(id).await?;
    Ok(Json(blog))
}

/// Update a blog
///
/// Requires the creator's token only when owner-only updates are enabled.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Blogs",
    params(
        ("id" = Uuid, Path, description = "Blog id")
    ),
    request_body = UpdateBlog,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_blog<B: BlogRepository, U: UserRepository>(
    State(service): State<Arc<BlogService<B, U>>>,
    token: BearerToken,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateBlog>,
) -> BlogResult<Json<BlogResponse>> {
    let blog = service.update_blog(token.as_deref(), id, input).await?;
    Ok(Json(blog))
}

/// Delete a blog; only its creator may
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Blogs",
    params(
        ("id" = Uuid, Path, description = "Blog id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_blog<B: BlogRepository, U: UserRepository>(
    State(service): State<Arc<BlogService<B, U>>>,
    token: BearerToken,
    UuidPath(id): UuidPath,
) -> BlogResult<StatusCode> {
    service.delete_blog(token.as_deref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
