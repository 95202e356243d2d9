//! # エンドポイントテスト用共通ヘルパー
//!
//! decrypt, sign, serverテストで共有する鍵フィクスチャと状態構築。

use std::sync::{Arc, OnceLock};

use dpki_crypto::{pkcs1v15_padding, pss_padding, HashMethod, SignScheme};
use dpki_types::ErrorCode;
use ecdsa::signature::hazmat::PrehashVerifier;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

use crate::config::SignerState;
use crate::error::SignerError;
use crate::keystore::{KeyNamespace, MemoryKeyStore};

pub const RSA_OPERATIONAL_PEM: &str = include_str!("../../../crypto/testdata/rsa2048_pkcs1.pem");
pub const RSA_MASTER_PEM: &str = include_str!("../../../crypto/testdata/rsa2048_pkcs8.pem");
pub const EC_PEM: &str = include_str!("../../../crypto/testdata/p256_sec1.pem");

/// テスト鍵に対応する公開鍵。
pub struct Fixtures {
    pub operational: RsaPublicKey,
    pub master: RsaPublicKey,
    pub ec: p256::ecdsa::VerifyingKey,
}

/// 公開鍵フィクスチャ（プロセス内で一度だけパースする）。
pub fn fixtures() -> &'static Fixtures {
    static FIXTURES: OnceLock<Fixtures> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let operational = RsaPrivateKey::from_pkcs1_pem(RSA_OPERATIONAL_PEM).unwrap();
        let master = RsaPrivateKey::from_pkcs8_pem(RSA_MASTER_PEM).unwrap();
        let ec = p256::SecretKey::from_sec1_pem(EC_PEM).unwrap();
        Fixtures {
            operational: RsaPublicKey::from(&operational),
            master: RsaPublicKey::from(&master),
            ec: p256::ecdsa::VerifyingKey::from(ec.public_key()),
        }
    })
}

impl Fixtures {
    pub fn encrypt_for_operational(&self, message: &[u8]) -> Vec<u8> {
        self.operational
            .encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, message)
            .unwrap()
    }

    pub fn encrypt_for_master(&self, message: &[u8]) -> Vec<u8> {
        self.master
            .encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, message)
            .unwrap()
    }

    /// RSA署名をダイジェストに対して検証する。
    pub fn verify_rsa(
        public: &RsaPublicKey,
        scheme: SignScheme,
        hash: HashMethod,
        digest: &[u8],
        signature: &[u8],
    ) -> bool {
        match scheme {
            SignScheme::RsaPkcs1v15 => public
                .verify(pkcs1v15_padding(hash), digest, signature)
                .is_ok(),
            SignScheme::RsaPss => public.verify(pss_padding(hash), digest, signature).is_ok(),
            SignScheme::Ecdsa => false,
        }
    }

    /// ECDSA（DER）署名をダイジェストに対して検証する。
    pub fn verify_ec(&self, digest: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = p256::ecdsa::Signature::from_der(signature) else {
            return false;
        };
        self.ec.verify_prehash(digest, &signature).is_ok()
    }
}

/// テスト用のメモリ内鍵ストア。
///
/// - `rp1`: 運用鍵（RSA PKCS#1）とマスター鍵（RSA PKCS#8、別の鍵素材）
/// - `ec1`: 運用鍵（P-256）
/// - `idp1`: マスター鍵のみ
pub fn memory_store() -> MemoryKeyStore {
    MemoryKeyStore::new()
        .with_key(KeyNamespace::Operational, "rp1", RSA_OPERATIONAL_PEM)
        .with_key(KeyNamespace::Master, "rp1", RSA_MASTER_PEM)
        .with_key(KeyNamespace::Operational, "ec1", EC_PEM)
        .with_key(KeyNamespace::Master, "idp1", RSA_MASTER_PEM)
}

/// メモリ内鍵ストアを持つ共有状態。
pub fn memory_state() -> Arc<SignerState> {
    Arc::new(SignerState::new(Arc::new(memory_store())))
}

/// ハンドラ結果のエラーコードを取り出す。
pub fn error_code<T>(result: Result<T, SignerError>) -> ErrorCode {
    match result {
        Ok(_) => panic!("エラーを期待しましたが成功しました"),
        Err(e) => e.code(),
    }
}
