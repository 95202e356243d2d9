//! # 署名サービス エンドポイント
//!
//! | ルート | オペレーション | 名前空間 |
//! |--------|----------------|----------|
//! | `POST /dpki/decrypt` | 復号 | 運用鍵 |
//! | `POST /dpki/sign` | 署名 | 運用鍵 |
//! | `POST /dpki/master/sign` | マスター署名 | マスター鍵 |
//! | `GET /health` | 死活監視 | - |

pub mod decrypt;
pub mod health;
pub mod sign;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use decrypt::handle_decrypt;
pub use health::handle_health;
pub use sign::{handle_master_sign, handle_sign};

use crate::error::SignerError;

/// 鍵の読み込みと暗号処理をブロッキングスレッドで実行する。
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, SignerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SignerError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SignerError::Internal(format!("spawn_blockingエラー: {e}")))?
}
