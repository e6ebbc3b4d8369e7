//! Todo リストの HTTP API（axum）
//!
//! `/api/todos` 系の REST リソース、フォーム用の互換ルート、
//! サーバーサイドでレンダリングする一覧ページを提供する。

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use state::AppState;
pub use views::Views;

use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Router,
};
use handlers::{api, legacy, view};
use infrastructure::TodoRepository;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// ルータを構築して返します。
///
/// リクエストごとに INFO レベルのスパン（method / uri）を張るので、
/// ハンドラ内のエラーログにはルートが付く。
///
/// どのルートにも一致しないリクエストは静的ファイルとして探し、
/// それも無ければ `view::unmatched` に回す。
pub fn app_with_state<R: TodoRepository>(state: AppState<R>) -> Router {
    let static_files = ServeDir::new(&state.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(view::unmatched.into_service());

    Router::new()
        .route("/", get(view::index::<R>))
        .route("/health", get(api::health))
        .route(
            "/api/todos",
            get(api::list_todos::<R>).post(api::create_todo::<R>),
        )
        .route(
            "/api/todos/:id",
            get(api::get_todo::<R>)
                .patch(api::update_todo::<R>)
                .delete(api::delete_todo::<R>),
        )
        .route("/newtodo", post(legacy::new_todo::<R>))
        .route("/delete/:id", get(legacy::delete_todo::<R>))
        .route("/delAlltodo", post(legacy::delete_all::<R>))
        .fallback_service(static_files)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
