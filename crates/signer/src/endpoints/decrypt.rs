//! # POST /dpki/decrypt
//!
//! 運用鍵でのRSA PKCS#1 v1.5復号。
//!
//! ## 処理フロー
//! 1. リクエストを検証（node_id、key_type、Base64）
//! 2. 運用鍵を解決
//! 3. 復号し、平文をBase64で返却

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::Engine;
use dpki_types::{DecryptRequest, DecryptResponse};

use crate::config::SignerState;
use crate::error::SignerError;
use crate::operations::{self, b64, DecryptParams};

use super::run_blocking;

/// /dpki/decrypt エンドポイントハンドラ。
pub async fn handle_decrypt(
    State(state): State<Arc<SignerState>>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Result<Json<DecryptResponse>, SignerError> {
    let Json(request) =
        payload.map_err(|e| SignerError::MalformedPayload(e.body_text()))?;

    let params = DecryptParams::from_request(&request)?;
    tracing::info!(
        node_id = %params.key_id.node_id(),
        key_type = ?params.key_type,
        ciphertext_len = params.ciphertext.len(),
        "decrypt"
    );

    let store = Arc::clone(&state.key_store);
    let plaintext = run_blocking(move || operations::decrypt(store.as_ref(), &params)).await?;

    Ok(Json(DecryptResponse {
        decrypted_message: b64().encode(&plaintext),
    }))
}
