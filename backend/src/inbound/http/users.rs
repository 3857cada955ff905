//! User API handlers.
//!
//! ```text
//! POST /login               {"email":"alice@example.com","password":"password123"}
//! POST /new_user, /user     {"name":"Alice","email":"...","password":"..."}
//! GET  /users, /user
//! PUT  /user/{id}           {"email":"...","password":"..."}
//! PUT  /user_admin_status   {"id":1}
//! DELETE /delete_user/{id}, /user/{id}
//! ```
//!
//! Registration and login are public; everything else requires a bearer
//! token. Responses never carry the stored password secret: handlers only
//! serialise [`UserProfile`].

use actix_web::web;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::auth_service::map_user_repository_error;
use crate::domain::ports::UserRepository;
use crate::domain::{
    CredentialUpdate, Error, LoginCredentials, LoginValidationError, Registration, SessionToken,
    UserId, UserProfile, UserUpdate, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    #[schema(value_type = String)]
    pub token: SessionToken,
}

/// Registration request body for `POST /new_user` and `POST /user`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Credential update body for `PUT /user/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: String,
}

/// Admin elevation body for `PUT /user_admin_status`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PromoteAdminRequest {
    pub id: i32,
}

/// Plain confirmation payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let details = match err {
        LoginValidationError::EmptyEmail => json!({ "field": "email", "code": "empty_email" }),
        LoginValidationError::EmptyPassword => {
            json!({ "field": "password", "code": "empty_password" })
        }
    };
    Error::invalid_request("Email and password are required").with_details(details)
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyName => {
            Error::invalid_request("Name is required").with_details(json!({ "field": "name" }))
        }
        UserValidationError::InvalidEmail => {
            Error::invalid_request("Invalid email").with_details(json!({ "field": "email" }))
        }
        UserValidationError::PasswordTooShort { min } => Error::invalid_request(format!(
            "Password must be at least {min} characters long"
        ))
        .with_details(json!({ "field": "password" })),
    }
}

/// Authenticate and mint a session token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_validation_error)?;

    let token = state.auth.login(&credentials).await?;

    Ok(web::Json(LoginResponse {
        message: "Login successful".to_owned(),
        token,
    }))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/new_user",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Created user", body = UserProfile),
        (status = 400, description = "Duplicate email or invalid fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let payload = payload.into_inner();
    let registration =
        Registration::try_from_parts(&payload.name, &payload.email, &payload.password)
            .map_err(map_user_validation_error)?;

    let user = state.auth.register(registration).await?;
    Ok(web::Json(UserProfile::from(user)))
}

/// List all users, without secret fields.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserProfile]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(
    _auth: Authenticated,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let users = state.users.list().await.map_err(map_user_repository_error)?;
    Ok(web::Json(users.iter().map(UserProfile::from).collect()))
}

/// Replace a user's email and password.
#[utoipa::path(
    put,
    path = "/user/{id}",
    request_body = UpdateUserRequest,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 400, description = "Invalid fields or duplicate email", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
pub async fn update_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let payload = payload.into_inner();
    let update = CredentialUpdate::try_from_parts(&payload.email, &payload.password)
        .map_err(map_user_validation_error)?;

    let user = state
        .auth
        .update_credentials(UserId::new(path.into_inner()), update)
        .await?;
    Ok(web::Json(UserProfile::from(user)))
}

/// Elevate a user's admin flag.
#[utoipa::path(
    put,
    path = "/user_admin_status",
    request_body = PromoteAdminRequest,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "promoteAdmin"
)]
pub async fn promote_admin(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    payload: web::Json<PromoteAdminRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let update = UserUpdate {
        admin_status: Some(true),
        ..UserUpdate::default()
    };

    let user = state
        .users
        .update(UserId::new(payload.id), update)
        .await
        .map_err(map_user_repository_error)?;
    Ok(web::Json(UserProfile::from(user)))
}

/// Remove a user. The user's tickets are left in place: `Ticket.user_id` is
/// a weak reference with no cascade.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
pub async fn delete_user(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .users
        .delete(UserId::new(path.into_inner()))
        .await
        .map_err(map_user_repository_error)?;

    Ok(web::Json(MessageResponse {
        message: "User deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::{test_app, test_state};

    async fn register_alice(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    ) -> Value {
        let request = test::TestRequest::post()
            .uri("/new_user")
            .set_json(json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        let response = test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&test::read_body(response).await).expect("user payload")
    }

    async fn login_token(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        email: &str,
        password: &str,
    ) -> String {
        let request = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let response = test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("login payload");
        body.get("token")
            .and_then(Value::as_str)
            .expect("token present")
            .to_owned()
    }

    #[actix_web::test]
    async fn registration_returns_the_profile_without_secrets() {
        let app = test::init_service(test_app(test_state())).await;
        let body = register_alice(&app).await;

        assert_eq!(body.get("name"), Some(&json!("Alice")));
        assert_eq!(body.get("email"), Some(&json!("alice@example.com")));
        assert_eq!(body.get("admin_status"), Some(&json!(false)));
        assert!(body.get("password").is_none());
        assert!(body.get("password_secret").is_none());
    }

    #[actix_web::test]
    async fn duplicate_registration_is_rejected_and_stores_nothing() {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;

        let request = test::TestRequest::post()
            .uri("/new_user")
            .set_json(json!({
                "name": "Other Alice",
                "email": "alice@example.com",
                "password": "password456"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("error payload");
        assert_eq!(body.get("message"), Some(&json!("Email already Registered")));

        // Exactly one record for the email remains.
        let token = login_token(&app, "alice@example.com", "password123").await;
        let list = test::TestRequest::get()
            .uri("/users")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let response = test::call_service(&app, list).await;
        let users: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("users payload");
        let matching = users
            .as_array()
            .expect("array")
            .iter()
            .filter(|u| u.get("email") == Some(&json!("alice@example.com")))
            .count();
        assert_eq!(matching, 1);
    }

    #[rstest::rstest]
    #[case(json!({"name": "Alice", "email": "not-an-email", "password": "password123"}), "Invalid email")]
    #[case(json!({"name": "Alice", "email": "alice@example.com", "password": "short"}), "Password must be at least 8 characters long")]
    #[case(json!({"name": "", "email": "alice@example.com", "password": "password123"}), "Name is required")]
    #[actix_web::test]
    async fn invalid_registrations_are_rejected(#[case] payload: Value, #[case] message: &str) {
        let app = test::init_service(test_app(test_state())).await;
        let request = test::TestRequest::post()
            .uri("/new_user")
            .set_json(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("error payload");
        assert_eq!(body.get("message"), Some(&json!(message)));
    }

    #[actix_web::test]
    async fn login_with_blank_password_is_a_validation_error() {
        let app = test::init_service(test_app(test_state())).await;
        let request = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "alice@example.com", "password": "" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("error payload");
        assert_eq!(
            body.get("message"),
            Some(&json!("Email and password are required"))
        );
    }

    #[actix_web::test]
    async fn user_routes_require_a_bearer_token() {
        let app = test::init_service(test_app(test_state())).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/users").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn registration_aliases_share_one_handler() {
        let app = test::init_service(test_app(test_state())).await;
        let request = test::TestRequest::post()
            .uri("/user")
            .set_json(json!({
                "name": "Bob",
                "email": "bob@example.com",
                "password": "password123"
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn promote_admin_sets_the_flag() {
        let app = test::init_service(test_app(test_state())).await;
        let created = register_alice(&app).await;
        let id = created.get("id").and_then(Value::as_i64).expect("user id");
        let token = login_token(&app, "alice@example.com", "password123").await;

        let request = test::TestRequest::put()
            .uri("/user_admin_status")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({ "id": id }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("user payload");
        assert_eq!(body.get("admin_status"), Some(&json!(true)));
    }

    #[actix_web::test]
    async fn promote_admin_on_unknown_id_is_not_found() {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;
        let token = login_token(&app, "alice@example.com", "password123").await;

        let request = test::TestRequest::put()
            .uri("/user_admin_status")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({ "id": 999 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_user_rotates_credentials() {
        let app = test::init_service(test_app(test_state())).await;
        let created = register_alice(&app).await;
        let id = created.get("id").and_then(Value::as_i64).expect("user id");
        let token = login_token(&app, "alice@example.com", "password123").await;

        let request = test::TestRequest::put()
            .uri(&format!("/user/{id}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({ "email": "alice@new.example.com", "password": "fresh-password" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&test::read_body(response).await).expect("user payload");
        assert_eq!(body.get("email"), Some(&json!("alice@new.example.com")));

        // Old password no longer logs in; the new one does.
        let stale = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "alice@new.example.com", "password": "password123" }))
            .to_request();
        let response = test::call_service(&app, stale).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        login_token(&app, "alice@new.example.com", "fresh-password").await;
    }

    #[actix_web::test]
    async fn delete_user_removes_the_record() {
        let app = test::init_service(test_app(test_state())).await;
        let created = register_alice(&app).await;
        let id = created.get("id").and_then(Value::as_i64).expect("user id");
        let token = login_token(&app, "alice@example.com", "password123").await;

        let request = test::TestRequest::delete()
            .uri(&format!("/delete_user/{id}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let again = test::TestRequest::delete()
            .uri(&format!("/delete_user/{id}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let response = test::call_service(&app, again).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
