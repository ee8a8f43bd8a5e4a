use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    AccessGuard, AuthUser, LoginRateLimiter, Role, TokenService, UuidPath, ValidatedJson,
    access_guard, login_rate_limit,
};
use database::{DailyCount, PageParams, PageResult};
use std::sync::Arc;

use crate::error::UserResult;
use crate::models::{
    ChangePassword, LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RecentUser,
    RegisterUser, UpdateProfile, UserSummary, UsernameUpdated,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Default page size of the admin user listing
pub const USERS_PAGE_LIMIT: u64 = 20;

struct UsersState<R: UserRepository> {
    service: Arc<UserService<R>>,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository> Clone for UsersState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Create the `/api/auth` router.
///
/// Each route group declares its role policy once through `guard`.
pub fn router<R: UserRepository + 'static>(
    service: UserService<R>,
    guard: AccessGuard,
    limiter: LoginRateLimiter,
) -> Router {
    let state = UsersState {
        service: Arc::new(service),
        tokens: Arc::clone(guard.tokens()),
    };

    let public = Router::new().route("/register", post(register::<R>));

    let login = Router::new()
        .route("/login", post(login::<R>))
        .route_layer(middleware::from_fn_with_state(limiter, login_rate_limit));

    let authenticated = Router::new()
        .route("/profile", get(profile::<R>))
        .route_layer(middleware::from_fn_with_state(guard.clone(), access_guard));

    let users_only = Router::new()
        .route("/update-profile", put(update_profile::<R>))
        .route("/change-password", put(change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard.clone().require(&[Role::User]),
            access_guard,
        ));

    let admin = Router::new()
        .route("/all-users", get(all_users::<R>))
        .route("/recent-users", get(recent_users::<R>))
        .route("/delete-user/{id}", delete(delete_user::<R>))
        .route("/stats/growth", get(growth::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard.require(&[Role::Admin]),
            access_guard,
        ));

    public
        .merge(login)
        .merge(authenticated)
        .merge(users_only)
        .merge(admin)
        .with_state(state)
}

/// POST /register
async fn register<R: UserRepository>(
    State(state): State<UsersState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<impl IntoResponse> {
    state.service.register(&input.username, &input.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /login
async fn login<R: UserRepository>(
    State(state): State<UsersState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let user = state
        .service
        .authenticate(&input.username, &input.password)
        .await?;
    let token = state.tokens.issue(user.id, &user.username, user.role)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        role: user.role,
        username: user.username,
        user_id: user.id,
    }))
}

/// GET /profile
async fn profile<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
) -> UserResult<Json<ProfileResponse>> {
    Ok(Json(state.service.profile(claims.user_id()).await?))
}

/// PUT /update-profile
async fn update_profile<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResult<Json<UsernameUpdated>> {
    let username = state
        .service
        .update_username(claims.user_id(), &input.username)
        .await?;

    Ok(Json(UsernameUpdated {
        message: "Profile updated successfully".to_string(),
        username,
    }))
}

/// PUT /change-password
async fn change_password<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePassword>,
) -> UserResult<Json<MessageResponse>> {
    state
        .service
        .change_password(claims.user_id(), &input.current_password, &input.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /all-users?page=&limit=&sortOrder=&search=
async fn all_users<R: UserRepository>(
    State(state): State<UsersState<R>>,
    Query(params): Query<PageParams>,
) -> UserResult<Json<PageResult<UserSummary>>> {
    let page = params.into_request(USERS_PAGE_LIMIT);
    Ok(Json(state.service.list_users(page).await?))
}

/// GET /recent-users
async fn recent_users<R: UserRepository>(
    State(state): State<UsersState<R>>,
) -> UserResult<Json<Vec<RecentUser>>> {
    Ok(Json(state.service.recent_users().await?))
}

/// DELETE /delete-user/{id}
async fn delete_user<R: UserRepository>(
    State(state): State<UsersState<R>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<MessageResponse>> {
    state.service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// GET /stats/growth
async fn growth<R: UserRepository>(
    State(state): State<UsersState<R>>,
) -> UserResult<Json<Vec<DailyCount>>> {
    Ok(Json(state.service.growth().await?))
}
