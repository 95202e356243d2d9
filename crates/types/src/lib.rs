//! # DPKI Signer 共有型定義
//!
//! 外部鍵管理署名サービスのリクエスト/レスポンス構造と、
//! Identity API（RP側REST）のワイヤー型をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - Base64 (Standard): バイナリデータ（暗号文、平文、メッセージ、ダイジェスト、署名）
//! - アルゴリズム名: 文字列のまま受け取り、`dpki-crypto` 側の閉じたレジストリで検証する

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 復号 (POST /dpki/decrypt)
// ---------------------------------------------------------------------------

/// 復号リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// 鍵を特定するノードID（運用鍵の名前空間で解決される）
    pub node_id: String,
    /// Base64エンコードされた暗号文（RSA PKCS#1 v1.5）
    pub encrypted_message: String,
    /// 鍵種別（省略時は保存済み鍵の種別を使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
}

/// 復号レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Base64エンコードされた平文
    pub decrypted_message: String,
}

// ---------------------------------------------------------------------------
// 署名 (POST /dpki/sign, POST /dpki/master/sign)
// ---------------------------------------------------------------------------

/// 署名リクエスト。運用鍵署名とマスター鍵署名で共通。
///
/// `request_message` と `request_message_hash` はちょうど一方のみを指定する。
/// 両方または片方も無い場合は `MALFORMED_PAYLOAD` で拒否される。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignRequest {
    /// 鍵を特定するノードID
    pub node_id: String,
    /// Base64エンコードされた生メッセージ（サービス側でハッシュ化してから署名）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
    /// Base64エンコードされたハッシュ済みダイジェスト（再ハッシュせずに署名）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_message_hash: Option<String>,
    /// ハッシュ方式（例: "SHA256"）
    pub hash_method: String,
    /// 鍵種別（省略時は保存済み鍵の種別を使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// 署名方式（例: "RSA-PKCS1-V1_5", "RSA-SHA256", "ECDSA"）
    pub sign_method: String,
}

/// 署名レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    /// Base64エンコードされた署名
    pub signature: String,
}

// ---------------------------------------------------------------------------
// エラー応答
// ---------------------------------------------------------------------------

/// 呼び出し元に公開される安定したエラーコード。
///
/// 内部エラーの詳細（ファイルパス、鍵素材、ライブラリのエラー文）は
/// このコードに丸められ、レスポンスには含まれない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidIdentifier,
    KeyNotFound,
    KeyUnreadable,
    UnsupportedKeyType,
    UnsupportedHashMethod,
    UnsupportedSignMethod,
    MalformedPayload,
    DecryptionFailed,
    SigningFailed,
    Internal,
}

impl ErrorCode {
    /// ワイヤー上の文字列表現。
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidIdentifier => "INVALID_IDENTIFIER",
            ErrorCode::KeyNotFound => "KEY_NOT_FOUND",
            ErrorCode::KeyUnreadable => "KEY_UNREADABLE",
            ErrorCode::UnsupportedKeyType => "UNSUPPORTED_KEY_TYPE",
            ErrorCode::UnsupportedHashMethod => "UNSUPPORTED_HASH_METHOD",
            ErrorCode::UnsupportedSignMethod => "UNSUPPORTED_SIGN_METHOD",
            ErrorCode::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorCode::DecryptionFailed => "DECRYPTION_FAILED",
            ErrorCode::SigningFailed => "SIGNING_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// エラーレスポンスの本体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 安定したエラーコード
    pub code: ErrorCode,
    /// 固定の説明文（内部情報を含まない）
    pub message: String,
}

/// エラーレスポンス: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

// ---------------------------------------------------------------------------
// Identity API (RP) リクエスト
// ---------------------------------------------------------------------------

/// 本人確認リクエストで要求するデータ項目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    /// サービスID
    pub service_id: String,
    /// 問い合わせ先ASのノードID一覧
    #[serde(default)]
    pub as_id_list: Vec<String>,
    /// 最低限応答が必要なAS数
    pub min_as: u32,
    /// ASへ渡す任意のパラメータ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_params: Option<String>,
}

/// `POST /rp/requests/{namespace}/{identifier}` のリクエストボディ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestParams {
    /// RP側で採番する参照ID
    pub reference_id: String,
    /// 問い合わせ先IdPのノードID一覧（空なら全IdP）
    #[serde(default)]
    pub idp_list: Vec<String>,
    /// 結果通知先のコールバックURL
    pub callback_url: String,
    /// 要求するデータ項目
    #[serde(default)]
    pub data_request_list: Vec<DataRequest>,
    /// ユーザーに提示するリクエストメッセージ
    pub request_message: String,
    /// 最低IAL
    pub min_ial: f64,
    /// 最低AAL
    pub min_aal: f64,
    /// 最低応答IdP数
    pub min_idp: u32,
    /// タイムアウト（秒）
    pub request_timeout: u64,
}

/// リクエスト作成レスポンス。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestResponse {
    /// APIサーバーが採番したリクエストID
    pub request_id: String,
    /// 初期ソルト（APIサーバーのバージョンによっては返らない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_salt: Option<String>,
}
