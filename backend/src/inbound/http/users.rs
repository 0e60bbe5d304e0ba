//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users {"firstName":"Ada","lastName":"Lovelace",...}
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, http::header, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{Error, User, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_config, path_config};

/// Route name used to build `Location` headers for created users.
pub const GET_USER_ROUTE: &str = "get_user";

/// Request body for creating or replacing a user.
///
/// Every member is optional on the wire so that a missing field is reported
/// as a validation message rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "Ada", max_length = 50)]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace", max_length = 50)]
    pub last_name: Option<String>,
    #[schema(example = "ada@example.com", max_length = 100)]
    pub email: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[schema(example = "GB", min_length = 2, max_length = 2)]
    pub nationality: Option<String>,
    #[schema(example = 87.5, minimum = 0.0)]
    pub total_score: Option<f64>,
}

impl From<UserRequest> for UserDraft {
    fn from(value: UserRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            nationality: value.nationality,
            total_score: value.total_score,
        }
    }
}

/// Stored user as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "GB")]
    pub nationality: String,
    #[schema(example = 87.5)]
    pub total_score: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id().get(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            nationality: profile.nationality.as_str().to_owned(),
            total_score: profile.total_score,
            created_at: user.created_at(),
        }
    }
}

/// List every user, ordered by id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Identifier is not an integer", body = ErrorSchema),
        (status = 404, description = "No such user")
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}", name = "get_user")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users_query
        .get_user(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Create a user.
///
/// Responds with the stored user and a `Location` header addressing it.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse,
            headers(("Location" = String, description = "URL of the created user"))),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_command
        .create_user(payload.into_inner().into())
        .await?;
    let location = req
        .url_for(GET_USER_ROUTE, [user.id().to_string()])
        .map_err(|err| {
            error!(error = %err, "failed to build user location");
            Error::internal(format!("location for user {}: {err}", user.id()))
        })?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location.as_str()))
        .json(UserResponse::from(&user)))
}

/// Replace every mutable field of a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 404, description = "No such user"),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    state
        .users_command
        .update_user(UserId::new(path.into_inner()), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Identifier is not an integer", body = ErrorSchema),
        (status = 404, description = "No such user")
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .users_command
        .delete_user(UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the users endpoints under `/api`, answering malformed bodies and
/// ids with `invalid_request`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::users::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(path_config())
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
}
