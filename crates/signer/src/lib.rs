//! # DPKI 署名サービス
//!
//! ノードごとの秘密鍵を外部で保管し、HTTP経由で復号・署名・マスター署名を提供する。
//!
//! ## モジュール構成
//! - `keystore`: ノードIDから秘密鍵を解決する読み取り専用ストア
//! - `operations`: リクエスト検証と暗号処理の組み立て
//! - `endpoints`: axumハンドラ
//! - `server`: ルーターとサーバーライフサイクル
//! - `config`: CLI/環境変数設定と共有状態
//! - `error`: エラーコードとHTTPステータスへの対応付け

pub mod config;
pub mod endpoints;
pub mod error;
pub mod keystore;
pub mod operations;
pub mod server;

pub use config::{Config, SignerState};
pub use error::SignerError;
pub use keystore::{FileKeyStore, KeyId, KeyNamespace, KeyStore, MemoryKeyStore};
pub use server::{router, RunningServer, SignerServer};
