//! # 署名サービス エラー型
//!
//! 全エンドポイントで共通のエラー型。
//!
//! 各バリアントの文字列はログ用の詳細であり、レスポンスには
//! 安定したエラーコードと固定の説明文だけを返す。
//! ファイルパス・鍵素材・ライブラリのエラー文は呼び出し元に漏らさない。

use axum::http::StatusCode;
use axum::Json;
use dpki_crypto::CryptoError;
use dpki_types::{ErrorBody, ErrorCode, ErrorResponse};

use crate::keystore::KeyStoreError;

/// 署名サービスのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// ノードIDの書式違反
    #[error("不正なノードID: {0}")]
    InvalidIdentifier(String),
    /// 鍵が存在しない
    #[error("鍵が見つかりません: {0}")]
    KeyNotFound(String),
    /// 鍵は存在するが読み込み・パースできない
    #[error("鍵を読み込めません: {0}")]
    KeyUnreadable(String),
    /// 未知の鍵種別、または保存済み鍵との不一致
    #[error("未対応の鍵種別: {0}")]
    UnsupportedKeyType(String),
    /// 未知のハッシュ方式
    #[error("未対応のハッシュ方式: {0}")]
    UnsupportedHashMethod(String),
    /// 未知の署名方式
    #[error("未対応の署名方式: {0}")]
    UnsupportedSignMethod(String),
    /// 不正なリクエスト（JSON、Base64、メッセージ指定、ダイジェスト長）
    #[error("不正なリクエスト: {0}")]
    MalformedPayload(String),
    /// 復号失敗（パディング不正・改ざん）
    #[error("復号に失敗しました")]
    DecryptionFailed,
    /// 署名失敗
    #[error("署名に失敗しました: {0}")]
    SigningFailed(String),
    /// 分類外の内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl SignerError {
    /// 呼び出し元に返すエラーコード。
    pub fn code(&self) -> ErrorCode {
        match self {
            SignerError::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
            SignerError::KeyNotFound(_) => ErrorCode::KeyNotFound,
            SignerError::KeyUnreadable(_) => ErrorCode::KeyUnreadable,
            SignerError::UnsupportedKeyType(_) => ErrorCode::UnsupportedKeyType,
            SignerError::UnsupportedHashMethod(_) => ErrorCode::UnsupportedHashMethod,
            SignerError::UnsupportedSignMethod(_) => ErrorCode::UnsupportedSignMethod,
            SignerError::MalformedPayload(_) => ErrorCode::MalformedPayload,
            SignerError::DecryptionFailed => ErrorCode::DecryptionFailed,
            SignerError::SigningFailed(_) => ErrorCode::SigningFailed,
            SignerError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// HTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            SignerError::InvalidIdentifier(_)
            | SignerError::UnsupportedKeyType(_)
            | SignerError::UnsupportedHashMethod(_)
            | SignerError::UnsupportedSignMethod(_)
            | SignerError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            SignerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            SignerError::DecryptionFailed => StatusCode::UNPROCESSABLE_ENTITY,
            SignerError::KeyUnreadable(_)
            | SignerError::SigningFailed(_)
            | SignerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 呼び出し元に返す固定の説明文。
    pub fn public_message(&self) -> &'static str {
        match self {
            SignerError::InvalidIdentifier(_) => "node_idが不正です",
            SignerError::KeyNotFound(_) => "指定されたnode_idの鍵が見つかりません",
            SignerError::KeyUnreadable(_) => "鍵を読み込めません",
            SignerError::UnsupportedKeyType(_) => "鍵種別に対応していません",
            SignerError::UnsupportedHashMethod(_) => "hash_methodに対応していません",
            SignerError::UnsupportedSignMethod(_) => "sign_methodに対応していません",
            SignerError::MalformedPayload(_) => "リクエストの形式が不正です",
            SignerError::DecryptionFailed => "復号に失敗しました",
            SignerError::SigningFailed(_) => "署名に失敗しました",
            SignerError::Internal(_) => "内部エラーが発生しました",
        }
    }

    /// レスポンスボディを構築する。
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.public_message().to_string(),
            },
        }
    }
}

impl From<KeyStoreError> for SignerError {
    fn from(e: KeyStoreError) -> Self {
        match e {
            KeyStoreError::InvalidIdentifier(msg) => SignerError::InvalidIdentifier(msg),
            KeyStoreError::KeyNotFound(msg) => SignerError::KeyNotFound(msg),
            KeyStoreError::KeyUnreadable(msg) => SignerError::KeyUnreadable(msg),
        }
    }
}

impl From<CryptoError> for SignerError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::UnsupportedKeyType(_) | CryptoError::KeyTypeMismatch { .. } => {
                SignerError::UnsupportedKeyType(e.to_string())
            }
            CryptoError::UnsupportedHashMethod(_) => SignerError::UnsupportedHashMethod(e.to_string()),
            CryptoError::UnsupportedSignMethod(_) => SignerError::UnsupportedSignMethod(e.to_string()),
            CryptoError::InvalidKey(_) => SignerError::KeyUnreadable(e.to_string()),
            CryptoError::InvalidDigestLength { .. } => SignerError::MalformedPayload(e.to_string()),
            CryptoError::DecryptionFailed => SignerError::DecryptionFailed,
            CryptoError::SigningFailed(_) => SignerError::SigningFailed(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for SignerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.code(), error = %self, "リクエスト処理に失敗しました");
        } else {
            tracing::warn!(code = %self.code(), error = %self, "リクエストを拒否しました");
        }
        (status, Json(self.to_body())).into_response()
    }
}
