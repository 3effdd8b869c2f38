// This test simulates:
//  - numbers endpoint (GET) -> 401 for a stale token, 200 for the fresh one
//  - auth endpoint (POST) -> issues the fresh token
// and checks the fetcher refreshes exactly once and retries exactly once.

#[cfg(test)]
mod test {

use anyhow::Result;
use http::StatusCode;
use httpmock::prelude::*;
use serde_json::{json, Value};

use crate::auth::token::TokenStatus;
use crate::errors::ServiceError;
use crate::server::server::{spawn_initial_token_fetch, AppState};
use crate::tests::common::{build_reqwest_client, settings_for, spawn_service};

fn fresh_token_body() -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": "fresh",
        "expires_in": 1743574344
    })
}

#[tokio::test]
async fn stale_token_is_refreshed_and_request_retried_once() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let stale = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/primes").header("Authorization", "Bearer stale");
            then.status(401).json_body(json!({ "message": "token expired" }));
        })
        .await;
    let fresh = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/primes").header("Authorization", "Bearer fresh");
            then.status(200).json_body(json!({ "numbers": [2, 3, 5, 7] }));
        })
        .await;
    let auth = upstream
        .mock_async(|when, then| {
            when.method(POST).path("/auth");
            then.status(200).json_body(fresh_token_body());
        })
        .await;

    let (handle, addr, state) = spawn_service(&settings_for(&upstream)).await;
    state.tokens().set("Bearer stale".to_owned()).await;

    let response = build_reqwest_client()
        .get(format!("http://{}/numbers/p", addr))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["windowCurrState"], json!([2, 3, 5, 7]));
    assert_eq!(body["avg"], json!(4.25));

    stale.assert_calls_async(1).await;
    auth.assert_calls_async(1).await;
    fresh.assert_calls_async(1).await;
    assert_eq!(state.tokens().current().await, "Bearer fresh");
    assert_eq!(state.tokens().status().await, TokenStatus::Valid);

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn second_401_is_not_retried_again() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let numbers = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/fibo");
            then.status(401);
        })
        .await;
    let auth = upstream
        .mock_async(|when, then| {
            when.method(POST).path("/auth");
            then.status(200).json_body(fresh_token_body());
        })
        .await;

    let (handle, addr, state) = spawn_service(&settings_for(&upstream)).await;

    let response = build_reqwest_client()
        .get(format!("http://{}/numbers/f", addr))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"],
        json!("upstream rejected the refreshed token for /fibo")
    );
    numbers.assert_calls_async(2).await;
    auth.assert_calls_async(1).await;
    assert!(state.handler.window().snapshot().await.is_empty());

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn failed_refresh_surfaces_as_500_without_retry() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let numbers = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/even");
            then.status(401);
        })
        .await;
    let auth = upstream
        .mock_async(|when, then| {
            when.method(POST).path("/auth");
            then.status(403).body("forbidden");
        })
        .await;

    let (handle, addr, state) = spawn_service(&settings_for(&upstream)).await;
    state.tokens().set("Bearer stale".to_owned()).await;

    let response = build_reqwest_client()
        .get(format!("http://{}/numbers/e", addr))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("Auth token request failed"), "{}", message);
    numbers.assert_calls_async(1).await;
    auth.assert_calls_async(1).await;
    assert_eq!(state.tokens().status().await, TokenStatus::Unknown);

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn fetch_validates_category_before_any_call() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let any = upstream
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;

    let state = AppState::new(&settings_for(&upstream)).await?;
    let err = state.handler.fetcher().fetch("x").await.unwrap_err();

    assert!(matches!(err, ServiceError::InvalidCategory(_)));
    any.assert_calls_async(0).await;
    Ok(())
}

#[tokio::test]
async fn initial_token_fetch_fills_the_slot() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let auth = upstream
        .mock_async(|when, then| {
            when.method(POST).path("/auth");
            then.status(200).json_body(fresh_token_body());
        })
        .await;

    let state = AppState::new(&settings_for(&upstream)).await?;
    assert_eq!(state.tokens().current().await, "");

    spawn_initial_token_fetch(state.tokens().clone()).await?;

    auth.assert_calls_async(1).await;
    assert_eq!(state.tokens().current().await, "Bearer fresh");
    Ok(())
}

#[tokio::test]
async fn failed_initial_token_fetch_does_not_panic() -> Result<()> {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).path("/auth");
            then.status(500);
        })
        .await;

    let state = AppState::new(&settings_for(&upstream)).await?;
    spawn_initial_token_fetch(state.tokens().clone()).await?;

    assert_eq!(state.tokens().current().await, "");
    assert_eq!(state.tokens().status().await, TokenStatus::Unknown);
    Ok(())
}

}
