//! # アイデンティティAPI RESTクライアント
//!
//! RP（Relying Party）がアイデンティティプラットフォームのAPIサーバーに
//! 本人確認リクエストを作成・照会するためのクライアント。
//!
//! | メソッド | パス |
//! |----------|------|
//! | `create_request` | `POST /rp/requests/{namespace}/{identifier}` |
//! | `get_request` | `GET /rp/requests/{request_id}` |

use dpki_types::{CreateRequestParams, CreateRequestResponse};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// APIサーバーアドレスの環境変数名。
pub const API_SERVER_ADDRESS_ENV: &str = "API_SERVER_ADDRESS";

/// APIサーバーアドレスのデフォルト値。
pub const DEFAULT_API_SERVER_ADDRESS: &str = "http://localhost:8080";

/// 外部署名サービス利用フラグの環境変数名。
pub const USE_EXTERNAL_CRYPTO_SERVICE_ENV: &str = "USE_EXTERNAL_CRYPTO_SERVICE";

/// クライアントのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum RpClientError {
    /// ベースアドレスがURLとして不正
    #[error("不正なAPIサーバーアドレス: {0}")]
    InvalidAddress(String),
    /// APIサーバーがエラーJSONを返した（400 / 500）
    #[error("APIエラー (ステータス {status}): {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },
    /// 想定外のステータス、またはJSONでないレスポンス
    #[error("想定外のレスポンス: ステータス {0}")]
    UnexpectedStatus(u16),
    /// 通信エラー
    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),
}

/// APIサーバーのRESTクライアント。
#[derive(Debug, Clone)]
pub struct IdentityApiClient {
    base: Url,
    http: reqwest::Client,
}

impl IdentityApiClient {
    /// 新しいクライアントを作成する。
    ///
    /// # 引数
    /// - `base_address`: APIサーバーのベースURL（例: "http://localhost:8080"）
    pub fn new(base_address: &str) -> Result<Self, RpClientError> {
        let base = Url::parse(base_address)
            .map_err(|e| RpClientError::InvalidAddress(format!("{base_address}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RpClientError::InvalidAddress(base_address.to_string()));
        }
        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    /// `API_SERVER_ADDRESS` からクライアントを作成する。未設定ならデフォルト値を使う。
    pub fn from_env() -> Result<Self, RpClientError> {
        let address = resolve_address(std::env::var(API_SERVER_ADDRESS_ENV).ok());
        Self::new(&address)
    }

    /// ベースURL。
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// 本人確認リクエストを作成する。
    pub async fn create_request(
        &self,
        namespace: &str,
        identifier: &str,
        params: &CreateRequestParams,
    ) -> Result<CreateRequestResponse, RpClientError> {
        let url = self.endpoint(&["rp", "requests", namespace, identifier]);
        tracing::debug!(%url, reference_id = %params.reference_id, "create_request");

        let response = self.http.post(url).json(params).send().await?;
        read_json(response).await
    }

    /// リクエストの状態を取得する。レスポンスのJSONをそのまま返す。
    pub async fn get_request(&self, request_id: &str) -> Result<serde_json::Value, RpClientError> {
        let url = self.endpoint(&["rp", "requests", request_id]);
        tracing::debug!(%url, "get_request");

        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// パスセグメントをエスケープしてURLを組み立てる。
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// 2xxならボディを `T` として返し、400/500のJSONボディはApiエラーとして返す。
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RpClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(status = status.as_u16(), error = %e, "レスポンスを解釈できません");
            RpClientError::UnexpectedStatus(status.as_u16())
        });
    }

    let body: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();
    match (status, body) {
        (StatusCode::BAD_REQUEST | StatusCode::INTERNAL_SERVER_ERROR, Some(body)) => {
            tracing::warn!(status = status.as_u16(), "APIサーバーがエラーを返しました");
            Err(RpClientError::Api {
                status: status.as_u16(),
                body,
            })
        }
        _ => Err(RpClientError::UnexpectedStatus(status.as_u16())),
    }
}

fn resolve_address(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_SERVER_ADDRESS.to_string())
}

/// `USE_EXTERNAL_CRYPTO_SERVICE` が `true` のときのみ外部署名サービスを使う。
pub fn use_external_crypto_service() -> bool {
    parse_flag(std::env::var(USE_EXTERNAL_CRYPTO_SERVICE_ENV).ok().as_deref())
}

/// 厳密に `"true"` の場合のみ真とする。
pub fn parse_flag(value: Option<&str>) -> bool {
    value == Some("true")
}
