//! # HTTPサーバー
//!
//! ルーター構築と、リスナーを所有するサーバーコンテキスト。
//!
//! `SignerServer::start` でリスナーをバインドして `RunningServer` を返し、
//! `RunningServer::shutdown` で受付を停止する。プロセス全体の可変状態は持たない。

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::{SignerState, DEFAULT_MAX_BODY_BYTES};
use crate::endpoints;

/// 全エンドポイントを持つルーターを構築する。
pub fn router(state: Arc<SignerState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/dpki/decrypt", post(endpoints::handle_decrypt))
        .route("/dpki/sign", post(endpoints::handle_sign))
        .route("/dpki/master/sign", post(endpoints::handle_master_sign))
        .route("/health", get(endpoints::handle_health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// 起動前のサーバー。
pub struct SignerServer {
    state: Arc<SignerState>,
    max_body_bytes: usize,
}

impl SignerServer {
    pub fn new(state: Arc<SignerState>) -> Self {
        Self {
            state,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// リクエストボディの上限を設定する。
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// `addr` にバインドして受付を開始する。
    ///
    /// ポート0を指定した場合は `RunningServer::local_addr` で実際のアドレスを取得できる。
    pub async fn start(self, addr: SocketAddr) -> std::io::Result<RunningServer> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let app = router(self.state, self.max_body_bytes);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(%local_addr, "署名サービスの受付を開始しました");
        Ok(RunningServer {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// 受付中のサーバー。
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// バインド済みのアドレス。
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 新規受付を停止し、処理中のリクエストの完了を待つ。
    pub async fn shutdown(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.wait().await
    }

    /// サーバータスクの終了を待つ。
    pub async fn wait(self) -> std::io::Result<()> {
        let result = self
            .task
            .await
            .map_err(|e| std::io::Error::other(format!("サーバータスクが異常終了しました: {e}")))?;
        tracing::info!(local_addr = %self.local_addr, "署名サービスを停止しました");
        result
    }
}
