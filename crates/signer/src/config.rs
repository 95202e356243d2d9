//! # 署名サービス設定・共有状態
//!
//! CLI引数と環境変数からの設定読み込み、および全ハンドラで共有する状態の定義。

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::keystore::KeyStore;

/// リクエストボディ上限のデフォルト値（2MiB）。
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// DPKI外部鍵管理署名サービス
#[derive(Parser, Debug, Clone)]
#[command(name = "dpki-signer")]
#[command(about = "External key-custody signing service (decrypt / sign / master-sign)")]
pub struct Config {
    /// 待ち受けポート
    #[arg(long, env = "SERVER_PORT", default_value_t = 12000)]
    pub port: u16,

    /// 待ち受けアドレス
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// 鍵ファイルを格納するディレクトリ（鍵ルート）
    #[arg(long, env = "KEY_ROOT", default_value = "./devKey")]
    pub key_root: PathBuf,

    /// リクエストボディの最大サイズ（バイト）
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Config {
    /// 待ち受けソケットアドレス。
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// 署名サービスの共有状態。
///
/// 読み取り専用の鍵ストアのみを保持し、リクエスト間で可変状態を共有しない。
pub struct SignerState {
    /// 鍵ストア実装
    pub key_store: Arc<dyn KeyStore>,
}

impl SignerState {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        Self { key_store }
    }
}
