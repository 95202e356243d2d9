//! # DPKI 署名サービス
//!
//! 署名サービスのエントリポイント。
//!
//! ## 起動シーケンス
//! 1. 設定読み込み（CLI引数・環境変数）
//! 2. 鍵ルートの検証とFileKeyStoreの構築
//! 3. HTTPサーバーの起動
//! 4. Ctrl-C 受信で受付を停止

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dpki_signer::{Config, FileKeyStore, SignerServer, SignerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    let store = FileKeyStore::new(&config.key_root)
        .with_context(|| format!("鍵ルートを開けません: {}", config.key_root.display()))?;
    tracing::info!(key_root = %store.root().display(), "鍵ルートを読み込みました");

    let state = Arc::new(SignerState::new(Arc::new(store)));
    let server = SignerServer::new(state)
        .max_body_bytes(config.max_body_bytes)
        .start(config.listen_addr())
        .await
        .with_context(|| format!("{} にバインドできません", config.listen_addr()))?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("停止シグナルを受信しました");
    server.shutdown().await?;

    Ok(())
}
