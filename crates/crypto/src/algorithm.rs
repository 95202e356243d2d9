//! # アルゴリズムレジストリ
//!
//! `key_type` / `hash_method` / `sign_method` の文字列を閉じた列挙型に変換する。
//! 未知の名前はここで決定的に拒否し、ライブラリのデフォルトに委ねない。
//!
//! 名前の比較は大文字小文字を区別しない。

use std::fmt;
use std::str::FromStr;

use sha2::Digest;

use crate::CryptoError;

// ---------------------------------------------------------------------------
// 鍵種別
// ---------------------------------------------------------------------------

/// 鍵のアルゴリズム系統。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// RSA（復号・PKCS#1 v1.5署名・PSS署名）
    Rsa,
    /// EC P-256（ECDSA署名のみ）
    Ec,
}

impl FromStr for KeyType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RSA" => Ok(KeyType::Rsa),
            "EC" | "ECDSA" => Ok(KeyType::Ec),
            _ => Err(CryptoError::UnsupportedKeyType(s.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Rsa => f.write_str("RSA"),
            KeyType::Ec => f.write_str("EC"),
        }
    }
}

// ---------------------------------------------------------------------------
// ハッシュ方式
// ---------------------------------------------------------------------------

/// 署名前のハッシュ方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashMethod {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashMethod {
    /// ダイジェスト長（バイト）。
    pub fn output_len(&self) -> usize {
        match self {
            HashMethod::Sha1 => 20,
            HashMethod::Sha256 => 32,
            HashMethod::Sha384 => 48,
            HashMethod::Sha512 => 64,
        }
    }

    /// データのダイジェストを計算する。
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashMethod::Sha1 => sha1::Sha1::digest(data).to_vec(),
            HashMethod::Sha256 => sha2::Sha256::digest(data).to_vec(),
            HashMethod::Sha384 => sha2::Sha384::digest(data).to_vec(),
            HashMethod::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }

    /// "SHA-256" / "sha256" / "SHA256" を同一視する。
    fn from_normalized(name: &str) -> Option<Self> {
        match name {
            "SHA1" => Some(HashMethod::Sha1),
            "SHA256" => Some(HashMethod::Sha256),
            "SHA384" => Some(HashMethod::Sha384),
            "SHA512" => Some(HashMethod::Sha512),
            _ => None,
        }
    }
}

impl FromStr for HashMethod {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_uppercase().replace('-', "");
        HashMethod::from_normalized(&normalized)
            .ok_or_else(|| CryptoError::UnsupportedHashMethod(s.to_string()))
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashMethod::Sha1 => f.write_str("SHA1"),
            HashMethod::Sha256 => f.write_str("SHA256"),
            HashMethod::Sha384 => f.write_str("SHA384"),
            HashMethod::Sha512 => f.write_str("SHA512"),
        }
    }
}

// ---------------------------------------------------------------------------
// 署名方式
// ---------------------------------------------------------------------------

/// 署名スキーム。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignScheme {
    /// RSASSA-PKCS1-v1_5（決定的）
    RsaPkcs1v15,
    /// RSASSA-PSS（ソルト長 = ダイジェスト長）
    RsaPss,
    /// ECDSA P-256（DERエンコード）
    Ecdsa,
}

impl SignScheme {
    /// このスキームが要求する鍵種別。
    pub fn key_type(&self) -> KeyType {
        match self {
            SignScheme::RsaPkcs1v15 | SignScheme::RsaPss => KeyType::Rsa,
            SignScheme::Ecdsa => KeyType::Ec,
        }
    }
}

impl fmt::Display for SignScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignScheme::RsaPkcs1v15 => f.write_str("RSA-PKCS1-V1_5"),
            SignScheme::RsaPss => f.write_str("RSA-PSS"),
            SignScheme::Ecdsa => f.write_str("ECDSA"),
        }
    }
}

/// パース済みの `sign_method`。
///
/// `RSA-SHA256` のような旧来の複合表記はハッシュ方式を内包する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignMethod {
    pub scheme: SignScheme,
    pub embedded_hash: Option<HashMethod>,
}

impl SignMethod {
    /// `hash_method` と突き合わせて署名スキームを確定する。
    ///
    /// 複合表記のハッシュが `hash_method` と一致しない場合は
    /// `UnsupportedSignMethod` を返す。
    pub fn resolve(&self, hash: HashMethod, raw: &str) -> Result<SignScheme, CryptoError> {
        match self.embedded_hash {
            Some(embedded) if embedded != hash => Err(CryptoError::UnsupportedSignMethod(format!(
                "{raw} (hash_method={hash})"
            ))),
            _ => Ok(self.scheme),
        }
    }
}

impl FromStr for SignMethod {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let plain = |scheme| {
            Ok(SignMethod {
                scheme,
                embedded_hash: None,
            })
        };
        match upper.as_str() {
            "RSA-PKCS1-V1_5" | "RSASSA-PKCS1-V1_5" => return plain(SignScheme::RsaPkcs1v15),
            "RSA-PSS" | "RSASSA-PSS" => return plain(SignScheme::RsaPss),
            "ECDSA" => return plain(SignScheme::Ecdsa),
            _ => {}
        }

        let combined = if let Some(rest) = upper.strip_prefix("RSA-") {
            Some((SignScheme::RsaPkcs1v15, rest))
        } else if let Some(rest) = upper.strip_prefix("ECDSA-") {
            Some((SignScheme::Ecdsa, rest))
        } else {
            None
        };

        combined
            .and_then(|(scheme, hash_part)| {
                HashMethod::from_normalized(&hash_part.replace('-', "")).map(|hash| SignMethod {
                    scheme,
                    embedded_hash: Some(hash),
                })
            })
            .ok_or_else(|| CryptoError::UnsupportedSignMethod(s.to_string()))
    }
}
