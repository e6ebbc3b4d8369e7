//! ルートごとのハンドラ
//!
//! - `api`: `/api/todos` 系の REST リソース（JSON）
//! - `legacy`: ブラウザのフォームから呼ばれ、処理後 `/` にリダイレクトする互換ルート
//! - `view`: サーバーサイドレンダリングと未定義パスの処理

pub mod api;
pub mod legacy;
pub mod view;
