//! /dpki/sign, /dpki/master/sign ハンドラ実装

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine;
use dpki_crypto::MessageInput;
use dpki_types::{SignRequest, SignResponse};

use crate::config::SignerState;
use crate::endpoints::run_blocking;
use crate::error::SignerError;
use crate::keystore::KeyNamespace;
use crate::operations::{self, b64, SignParams};

/// /dpki/sign エンドポイントハンドラ。運用鍵で署名する。
pub async fn handle_sign(
    State(state): State<Arc<SignerState>>,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignResponse>, SignerError> {
    sign_in_namespace(&state, KeyNamespace::Operational, payload).await
}

/// /dpki/master/sign エンドポイントハンドラ。マスター鍵で署名する。
pub async fn handle_master_sign(
    State(state): State<Arc<SignerState>>,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignResponse>, SignerError> {
    sign_in_namespace(&state, KeyNamespace::Master, payload).await
}

async fn sign_in_namespace(
    state: &SignerState,
    namespace: KeyNamespace,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<SignResponse>, SignerError> {
    let Json(request) =
        payload.map_err(|e| SignerError::MalformedPayload(e.body_text()))?;

    let params = SignParams::from_request(namespace, &request)?;
    let input_kind = match params.input {
        MessageInput::Raw(_) => "message",
        MessageInput::Digest(_) => "digest",
    };
    match namespace {
        KeyNamespace::Master => tracing::info!(
            node_id = %params.key_id.node_id(),
            hash_method = %params.hash,
            sign_method = %params.scheme,
            input = input_kind,
            "master-sign"
        ),
        KeyNamespace::Operational => tracing::info!(
            node_id = %params.key_id.node_id(),
            hash_method = %params.hash,
            sign_method = %params.scheme,
            input = input_kind,
            "sign"
        ),
    }

    let store = Arc::clone(&state.key_store);
    let signature = run_blocking(move || operations::sign(store.as_ref(), &params)).await?;

    Ok(Json(SignResponse {
        signature: b64().encode(&signature),
    }))
}
