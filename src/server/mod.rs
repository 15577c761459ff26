use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::context::AppContext;

pub mod routes;

use routes::HttpResponse;

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Every path goes through [routes::route_request]; axum only hosts it.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new().fallback(dispatch).with_state(ctx)
}

async fn dispatch(State(ctx): State<Arc<AppContext>>, method: Method, uri: Uri) -> HttpResponse {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let response = routes::route_request(&ctx, method.as_str(), path);
    tracing::info!(
        %method,
        path,
        status = response.status_code,
        reason = response.status_text,
        "request"
    );
    response
}

pub fn run_server(ctx: Arc<AppContext>, bind_addr: &str) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("chargen server listening on http://{bind_addr}");
        axum::serve(listener, router(ctx)).await
    })
}
