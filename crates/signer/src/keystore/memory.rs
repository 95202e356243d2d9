//! # メモリ内鍵ストア
//!
//! ローカル開発・テスト用。ファイルシステムを使わずにPEMを保持する。

use std::collections::HashMap;

use zeroize::Zeroizing;

use super::{KeyId, KeyNamespace, KeyStore, KeyStoreError};

/// メモリ内にPEMテキストを保持する鍵ストア。
///
/// 構築後は読み取り専用として共有される。
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: HashMap<(KeyNamespace, String), Zeroizing<String>>,
}

impl MemoryKeyStore {
    /// 空のMemoryKeyStoreを作成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// 鍵を登録する（ビルダー形式）。
    pub fn with_key(mut self, namespace: KeyNamespace, node_id: &str, pem: &str) -> Self {
        self.insert(namespace, node_id, pem);
        self
    }

    /// 鍵を登録する。
    pub fn insert(&mut self, namespace: KeyNamespace, node_id: &str, pem: &str) {
        self.keys.insert(
            (namespace, node_id.to_string()),
            Zeroizing::new(pem.to_string()),
        );
    }
}

impl KeyStore for MemoryKeyStore {
    fn load_pem(&self, id: &KeyId) -> Result<Zeroizing<String>, KeyStoreError> {
        self.keys
            .get(&(id.namespace(), id.node_id().to_string()))
            .cloned()
            .ok_or_else(|| KeyStoreError::KeyNotFound(id.to_string()))
    }
}
