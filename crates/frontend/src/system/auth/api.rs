use contracts::system::auth::{
    MessageResponse, RecoverRequest, RefreshRequest, RefreshResponse, ResetPasswordRequest,
    Session, SignInRequest, SignOutRequest, SignUpRequest, UpdatePasswordRequest, UserInfo,
};
use gloo_net::http::{Request, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::shared::api_utils::{api_url, error_message};

async fn send<B, T>(request: RequestBuilder, body: &B) -> Result<T, String>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let response = request
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn sign_in(email: String, password: String) -> Result<Session, String> {
    send(
        Request::post(&api_url("/api/auth/sign-in")),
        &SignInRequest { email, password },
    )
    .await
}

pub async fn sign_up(email: String, password: String, full_name: String) -> Result<Session, String> {
    send(
        Request::post(&api_url("/api/auth/sign-up")),
        &SignUpRequest {
            email,
            password,
            full_name,
        },
    )
    .await
}

/// Revokes the refresh token on the backend
pub async fn sign_out(refresh_token: String) -> Result<MessageResponse, String> {
    send(
        Request::post(&api_url("/api/auth/sign-out")),
        &SignOutRequest { refresh_token },
    )
    .await
}

pub async fn refresh(refresh_token: String) -> Result<RefreshResponse, String> {
    send(
        Request::post(&api_url("/api/auth/refresh")),
        &RefreshRequest { refresh_token },
    )
    .await
}

pub async fn current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url("/api/auth/session"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn reset_password(email: String) -> Result<MessageResponse, String> {
    send(
        Request::post(&api_url("/api/auth/reset-password")),
        &ResetPasswordRequest { email },
    )
    .await
}

/// Completes a reset with the one-time recovery token
pub async fn recover(token: String, password: String) -> Result<Session, String> {
    send(
        Request::post(&api_url("/api/auth/recover")),
        &RecoverRequest { token, password },
    )
    .await
}

pub async fn update_password(access_token: &str, password: String) -> Result<MessageResponse, String> {
    send(
        Request::post(&api_url("/api/auth/update-password"))
            .header("Authorization", &format!("Bearer {}", access_token)),
        &UpdatePasswordRequest { password },
    )
    .await
}
