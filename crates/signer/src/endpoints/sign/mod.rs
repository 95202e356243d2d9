//! # /dpki/sign, /dpki/master/sign エンドポイント
//!
//! 通常署名とマスター署名は同じリクエスト形式を持つが、別のルートとして公開する。
//! マスター鍵の使用は常に呼び出し側で明示され、ログ上も区別される。
//!
//! ## 処理フロー
//! 1. リクエストを検証（node_id、hash_method、sign_method、key_type、メッセージ指定）
//! 2. 名前空間に応じた鍵を解決
//! 3. 生メッセージならハッシュ化、ダイジェストならそのまま署名
//! 4. 署名をBase64で返却

mod handler;


pub use handler::{handle_master_sign, handle_sign};
