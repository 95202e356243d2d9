//! # 復号・署名オペレーション
//!
//! ワイヤー上のリクエストを検証済みパラメータに変換し、
//! 鍵ストアから解決した秘密鍵で復号・署名を行う。
//!
//! 各オペレーションは（解決した鍵, ペイロード, アルゴリズム選択）の純粋関数であり、
//! リクエスト間で共有される可変状態を持たない。秘密鍵は呼び出しの終了時に破棄される。
//!
//! ## 検証順序
//! 1. `node_id` の書式（`INVALID_IDENTIFIER`）
//! 2. アルゴリズム名（`UNSUPPORTED_*`）
//! 3. ペイロード（`MALFORMED_PAYLOAD`）
//! 4. 鍵の解決（`KEY_NOT_FOUND` / `KEY_UNREADABLE`）
//! 5. 鍵種別の整合性と暗号処理

use base64::Engine;
use dpki_crypto::{HashMethod, KeyType, MessageInput, SignMethod, SignScheme};
use dpki_types::{DecryptRequest, SignRequest};

use crate::error::SignerError;
use crate::keystore::{KeyId, KeyNamespace, KeyStore};

/// Base64エンジン（Standard）
pub(crate) fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, SignerError> {
    b64()
        .decode(value)
        .map_err(|e| SignerError::MalformedPayload(format!("{field}のBase64デコードに失敗: {e}")))
}

fn parse_key_type(value: Option<&str>) -> Result<Option<KeyType>, SignerError> {
    value.map(|v| v.parse::<KeyType>()).transpose().map_err(SignerError::from)
}

// ---------------------------------------------------------------------------
// 復号
// ---------------------------------------------------------------------------

/// 検証済みの復号パラメータ。
#[derive(Debug)]
pub struct DecryptParams {
    pub key_id: KeyId,
    pub ciphertext: Vec<u8>,
    pub key_type: Option<KeyType>,
}

impl DecryptParams {
    /// 復号リクエストを検証する。運用鍵の名前空間で解決される。
    pub fn from_request(request: &DecryptRequest) -> Result<Self, SignerError> {
        let key_id = KeyId::parse(KeyNamespace::Operational, &request.node_id)?;
        let key_type = parse_key_type(request.key_type.as_deref())?;
        if let Some(requested) = key_type {
            if requested != KeyType::Rsa {
                return Err(SignerError::UnsupportedKeyType(format!(
                    "{requested} 鍵はPKCS#1 v1.5復号に使用できません"
                )));
            }
        }
        let ciphertext = decode_field("encrypted_message", &request.encrypted_message)?;
        if ciphertext.is_empty() {
            return Err(SignerError::MalformedPayload("encrypted_messageが空です".into()));
        }

        Ok(Self {
            key_id,
            ciphertext,
            key_type,
        })
    }
}

/// 運用鍵でRSA PKCS#1 v1.5復号を行う。
pub fn decrypt(store: &dyn KeyStore, params: &DecryptParams) -> Result<Vec<u8>, SignerError> {
    let key = store.resolve(&params.key_id)?;
    if let Some(requested) = params.key_type {
        key.ensure_key_type(requested)?;
    }
    Ok(key.decrypt_pkcs1v15(&params.ciphertext)?)
}

// ---------------------------------------------------------------------------
// 署名
// ---------------------------------------------------------------------------

/// 検証済みの署名パラメータ。
#[derive(Debug)]
pub struct SignParams {
    pub key_id: KeyId,
    pub input: MessageInput,
    pub hash: HashMethod,
    pub scheme: SignScheme,
    pub key_type: Option<KeyType>,
}

impl SignParams {
    /// 署名リクエストを検証する。
    ///
    /// `request_message` と `request_message_hash` はちょうど一方のみ指定できる。
    pub fn from_request(namespace: KeyNamespace, request: &SignRequest) -> Result<Self, SignerError> {
        let key_id = KeyId::parse(namespace, &request.node_id)?;

        let hash: HashMethod = request.hash_method.parse()?;
        let sign_method: SignMethod = request.sign_method.parse()?;
        let scheme = sign_method.resolve(hash, &request.sign_method)?;

        let key_type = parse_key_type(request.key_type.as_deref())?;
        if let Some(requested) = key_type {
            if requested != scheme.key_type() {
                return Err(SignerError::UnsupportedKeyType(format!(
                    "{scheme} は {requested} 鍵で使用できません"
                )));
            }
        }

        let input = match (&request.request_message, &request.request_message_hash) {
            (Some(message), None) => MessageInput::Raw(decode_field("request_message", message)?),
            (None, Some(digest)) => {
                let digest = decode_field("request_message_hash", digest)?;
                if digest.len() != hash.output_len() {
                    return Err(SignerError::MalformedPayload(format!(
                        "request_message_hashの長さが{hash}と一致しません (期待: {}, 実際: {})",
                        hash.output_len(),
                        digest.len()
                    )));
                }
                MessageInput::Digest(digest)
            }
            (Some(_), Some(_)) => {
                return Err(SignerError::MalformedPayload(
                    "request_messageとrequest_message_hashは同時に指定できません".into(),
                ));
            }
            (None, None) => {
                return Err(SignerError::MalformedPayload(
                    "request_messageまたはrequest_message_hashが必要です".into(),
                ));
            }
        };

        Ok(Self {
            key_id,
            input,
            hash,
            scheme,
            key_type,
        })
    }
}

/// `params.key_id` の名前空間の鍵で署名する。
pub fn sign(store: &dyn KeyStore, params: &SignParams) -> Result<Vec<u8>, SignerError> {
    let key = store.resolve(&params.key_id)?;
    Ok(key.sign(params.scheme, params.hash, &params.input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::MemoryKeyStore;
    use dpki_types::ErrorCode;

    const RSA_PKCS1: &str = include_str!("../../crypto/testdata/rsa2048_pkcs1.pem");
    const P256_SEC1: &str = include_str!("../../crypto/testdata/p256_sec1.pem");

    fn sign_request(node_id: &str) -> SignRequest {
        SignRequest {
            node_id: node_id.to_string(),
            request_message: Some(b64().encode(b"hello")),
            request_message_hash: None,
            hash_method: "SHA256".to_string(),
            key_type: Some("RSA".to_string()),
            sign_method: "RSA-PKCS1-V1_5".to_string(),
        }
    }

    fn code_of<T: std::fmt::Debug>(result: Result<T, SignerError>) -> ErrorCode {
        result.unwrap_err().code()
    }

    /// メッセージとハッシュの同時指定・未指定を拒否する
    #[test]
    fn test_message_union_exclusive() {
        let mut both = sign_request("rp1");
        both.request_message_hash = Some(b64().encode([0u8; 32]));
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &both)),
            ErrorCode::MalformedPayload
        );

        let mut neither = sign_request("rp1");
        neither.request_message = None;
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &neither)),
            ErrorCode::MalformedPayload
        );
    }

    /// ダイジェスト指定時はそのままMessageInput::Digestになる
    #[test]
    fn test_digest_input() {
        let mut req = sign_request("rp1");
        req.request_message = None;
        req.request_message_hash = Some(b64().encode([7u8; 32]));
        let params = SignParams::from_request(KeyNamespace::Operational, &req).unwrap();
        assert_eq!(params.input, MessageInput::Digest(vec![7u8; 32]));

        req.request_message_hash = Some(b64().encode([7u8; 20]));
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::MalformedPayload
        );
    }

    /// Base64として不正なペイロード
    #[test]
    fn test_invalid_base64() {
        let mut req = sign_request("rp1");
        req.request_message = Some("***".into());
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::MalformedPayload
        );

        let decrypt = DecryptRequest {
            node_id: "rp1".into(),
            encrypted_message: "not base64!".into(),
            key_type: None,
        };
        assert_eq!(code_of(DecryptParams::from_request(&decrypt)), ErrorCode::MalformedPayload);
    }

    /// 未知のアルゴリズム名はそれぞれのUnsupportedコードになる
    #[test]
    fn test_unsupported_selectors() {
        let mut req = sign_request("rp1");
        req.hash_method = "MD5".into();
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::UnsupportedHashMethod
        );

        let mut req = sign_request("rp1");
        req.sign_method = "RSA-OAEP".into();
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::UnsupportedSignMethod
        );

        let mut req = sign_request("rp1");
        req.sign_method = "RSA-SHA1".into();
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::UnsupportedSignMethod
        );

        let mut req = sign_request("rp1");
        req.key_type = Some("DSA".into());
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::UnsupportedKeyType
        );

        let mut req = sign_request("rp1");
        req.key_type = Some("EC".into());
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::UnsupportedKeyType
        );
    }

    /// node_idの検証は他の検証より先に行われる
    #[test]
    fn test_identifier_checked_first() {
        let mut req = sign_request("../rp1");
        req.hash_method = "MD5".into();
        assert_eq!(
            code_of(SignParams::from_request(KeyNamespace::Operational, &req)),
            ErrorCode::InvalidIdentifier
        );
    }

    /// EC鍵にRSA復号を要求するとUnsupportedKeyType
    #[test]
    fn test_decrypt_with_ec_key() {
        let store = MemoryKeyStore::new().with_key(KeyNamespace::Operational, "ec1", P256_SEC1);
        let params = DecryptParams::from_request(&DecryptRequest {
            node_id: "ec1".into(),
            encrypted_message: b64().encode([1u8; 256]),
            key_type: None,
        })
        .unwrap();
        assert_eq!(code_of(decrypt(&store, &params)), ErrorCode::UnsupportedKeyType);

        assert_eq!(
            code_of(DecryptParams::from_request(&DecryptRequest {
                node_id: "ec1".into(),
                encrypted_message: b64().encode([1u8; 256]),
                key_type: Some("EC".into()),
            })),
            ErrorCode::UnsupportedKeyType
        );
    }

    /// 保存済み鍵とsign_methodの不一致
    #[test]
    fn test_sign_scheme_does_not_fit_key() {
        let store = MemoryKeyStore::new().with_key(KeyNamespace::Operational, "ec1", P256_SEC1);
        let mut req = sign_request("ec1");
        req.key_type = None;
        let params = SignParams::from_request(KeyNamespace::Operational, &req).unwrap();
        assert_eq!(code_of(sign(&store, &params)), ErrorCode::UnsupportedKeyType);
    }

    /// 同じnode_idでも名前空間が異なれば別の鍵を解決する
    #[test]
    fn test_namespaces_do_not_mix() {
        let store = MemoryKeyStore::new().with_key(KeyNamespace::Operational, "rp1", RSA_PKCS1);
        let req = sign_request("rp1");

        let params = SignParams::from_request(KeyNamespace::Operational, &req).unwrap();
        assert!(sign(&store, &params).is_ok());

        let params = SignParams::from_request(KeyNamespace::Master, &req).unwrap();
        assert_eq!(code_of(sign(&store, &params)), ErrorCode::KeyNotFound);
    }
}
