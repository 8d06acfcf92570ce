use axum::response::IntoResponse;

// Undocumented root, useful for a quick liveness poke.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
