use axum::Router;
use tokio::net::TcpListener;
use url::Url;

/// Serves `build(base_url)` on an ephemeral local port and returns its base url.
pub(crate) async fn spawn_server(build: impl FnOnce(&Url) -> Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|error| panic!("failed to bind test listener: {error}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|error| panic!("test listener has no address: {error}"));
    let base_url = Url::parse(format!("http://{address}").as_str())
        .unwrap_or_else(|error| panic!("invalid test server url: {error}"));

    let router = build(&base_url);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    base_url
}
