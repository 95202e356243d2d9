//! # 鍵ストア
//!
//! ノードIDから秘密鍵を解決する読み取り専用ストアを抽象化する。
//!
//! ## 名前空間
//! | 名前空間 | 格納名 | 用途 |
//! |----------|--------|------|
//! | 運用鍵 | `{node_id}` | 復号・通常署名 |
//! | マスター鍵 | `{node_id}_master` | マスター署名 |
//!
//! 二つの名前空間は互いに素であり、一方への要求が他方の鍵に解決されることはない。
//!
//! ## ストア実装
//! - `FileKeyStore`: 鍵ルート配下のPEMファイルを読み込む（本番用）
//! - `MemoryKeyStore`: メモリ内にPEMを保持する（開発・テスト用）

pub mod file;
pub mod memory;

pub use file::FileKeyStore;
pub use memory::MemoryKeyStore;

use std::fmt;

use dpki_crypto::PrivateKey;
use zeroize::Zeroizing;

/// マスター鍵の格納名に付与されるサフィックス。
pub const MASTER_SUFFIX: &str = "_master";

/// ノードIDの最大長（バイト）。
pub const MAX_NODE_ID_LEN: usize = 128;

/// 鍵の名前空間。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyNamespace {
    /// 運用鍵
    Operational,
    /// マスター鍵
    Master,
}

impl fmt::Display for KeyNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyNamespace::Operational => f.write_str("operational"),
            KeyNamespace::Master => f.write_str("master"),
        }
    }
}

/// 鍵ストアのエラー型。
///
/// 文字列はログ用の詳細であり、呼び出し元には返さない。
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    /// ノードIDが書式に違反している（パス区切り、親ディレクトリ参照等）
    #[error("不正なノードID: {0}")]
    InvalidIdentifier(String),
    /// 対応する鍵が存在しない
    #[error("鍵が見つかりません: {0}")]
    KeyNotFound(String),
    /// 鍵は存在するが読み込み・パースできない
    #[error("鍵を読み込めません: {0}")]
    KeyUnreadable(String),
}

/// 検証済みのノードID。
///
/// `KeyId::parse` 以外では構築できないため、
/// ストアに渡る識別子は常に書式検査を通過している。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyId {
    node_id: String,
    namespace: KeyNamespace,
}

impl KeyId {
    /// ノードIDを検証して `KeyId` を構築する。
    ///
    /// 許可する文字は `[A-Za-z0-9._-]` のみ。先頭の `.`、空文字列、
    /// 長すぎるID、運用鍵名前空間での `_master` サフィックスを拒否する。
    pub fn parse(namespace: KeyNamespace, node_id: &str) -> Result<Self, KeyStoreError> {
        if node_id.is_empty() {
            return Err(KeyStoreError::InvalidIdentifier("空のノードID".into()));
        }
        if node_id.len() > MAX_NODE_ID_LEN {
            return Err(KeyStoreError::InvalidIdentifier(format!(
                "ノードIDが長すぎます ({} バイト)",
                node_id.len()
            )));
        }
        if node_id.starts_with('.') {
            return Err(KeyStoreError::InvalidIdentifier(format!(
                "ノードIDは '.' で始められません: {node_id:?}"
            )));
        }
        if let Some(c) = node_id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(KeyStoreError::InvalidIdentifier(format!(
                "使用できない文字 {c:?} を含みます: {node_id:?}"
            )));
        }
        if namespace == KeyNamespace::Operational && node_id.ends_with(MASTER_SUFFIX) {
            return Err(KeyStoreError::InvalidIdentifier(format!(
                "運用鍵のノードIDに {MASTER_SUFFIX} サフィックスは使用できません: {node_id:?}"
            )));
        }

        Ok(Self {
            node_id: node_id.to_string(),
            namespace,
        })
    }

    /// 元のノードID。
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// 名前空間。
    pub fn namespace(&self) -> KeyNamespace {
        self.namespace
    }

    /// ストア上の格納名（名前空間サフィックス込み）。
    pub fn storage_name(&self) -> String {
        match self.namespace {
            KeyNamespace::Operational => self.node_id.clone(),
            KeyNamespace::Master => format!("{}{MASTER_SUFFIX}", self.node_id),
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.node_id)
    }
}

/// 秘密鍵を解決する読み取り専用ストア。
///
/// 実装はブロッキングI/Oを行ってよい。呼び出し側が `spawn_blocking` 上で実行する。
pub trait KeyStore: Send + Sync {
    /// `KeyId` に対応するPEMテキストを読み込む。
    fn load_pem(&self, id: &KeyId) -> Result<Zeroizing<String>, KeyStoreError>;

    /// `KeyId` に対応する秘密鍵を解決する。
    ///
    /// PEMのパースに失敗した場合は `KeyUnreadable`。
    fn resolve(&self, id: &KeyId) -> Result<PrivateKey, KeyStoreError> {
        let pem = self.load_pem(id)?;
        PrivateKey::from_pem(&pem).map_err(|e| KeyStoreError::KeyUnreadable(format!("{id}: {e}")))
    }
}
