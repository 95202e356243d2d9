//! # DPKI Signer 暗号処理
//!
//! 外部鍵管理サービスが保持する秘密鍵での復号・署名を実装する。
//! 秘密鍵の生バイトはこのクレートの外に出ない。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 復号 | RSA PKCS#1 v1.5 |
//! | 署名 | RSASSA-PKCS1-v1_5 / RSASSA-PSS / ECDSA P-256 |
//! | ハッシュ | SHA-1 / SHA-256 / SHA-384 / SHA-512 |

pub mod algorithm;
pub mod key;

pub use algorithm::{HashMethod, KeyType, SignMethod, SignScheme};
pub use key::{pkcs1v15_padding, pss_padding, MessageInput, PrivateKey};

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// 未知の鍵種別
    #[error("未対応の鍵種別: {0}")]
    UnsupportedKeyType(String),
    /// 未知のハッシュ方式
    #[error("未対応のハッシュ方式: {0}")]
    UnsupportedHashMethod(String),
    /// 未知の署名方式、またはhash_methodと矛盾する複合表記
    #[error("未対応の署名方式: {0}")]
    UnsupportedSignMethod(String),
    /// 要求された鍵種別と保存済み鍵の種別が一致しない
    #[error("鍵種別が一致しません (要求: {requested}, 保存済み: {actual})")]
    KeyTypeMismatch { requested: KeyType, actual: KeyType },
    /// 鍵素材のパースに失敗
    #[error("鍵素材が不正です: {0}")]
    InvalidKey(String),
    /// ダイジェスト長がハッシュ方式と一致しない
    #[error("ダイジェスト長が不正です (期待: {expected}, 実際: {actual})")]
    InvalidDigestLength { expected: usize, actual: usize },
    /// 復号に失敗（パディング不正・改ざん）
    #[error("復号に失敗しました")]
    DecryptionFailed,
    /// 署名に失敗
    #[error("署名に失敗しました: {0}")]
    SigningFailed(String),
}
