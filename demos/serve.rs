use anyhow::Context;
use http_session::{HttpRequest, SessionStore, SESSION_COOKIE_NAME};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HOST: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_session=debug,serve=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let listener = TcpListener::bind(HOST)
        .await
        .context("bind listener")?;
    tracing::info!(address = HOST, "listening");

    let store = SessionStore::new();
    loop {
        let (socket, peer) = listener.accept().await.context("accept connection")?;
        let store = store.clone();
        tokio::spawn(async move {
            if let Err(e) = handle(socket, &store).await {
                tracing::warn!(%peer, error = ?e, "request failed");
            }
        });
    }
}

async fn handle(mut socket: TcpStream, store: &SessionStore) -> anyhow::Result<()> {
    let request = match HttpRequest::parse(&mut socket, store).await {
        Ok(request) => request,
        Err(e) => {
            socket
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                .await
                .context("send bad request")?;
            return Err(e).context("parse request");
        }
    };
    let request = match request.path() {
        "/" => request.redirect_path("/index.html"),
        _ => request,
    };
    tracing::info!(method = %request.method(), path = request.path(), "handling request");

    let session = request.get_or_create_session();
    let body = format!("{}\n", request.path());
    let msg = format!(
        "HTTP/1.1 200 OK\r\nSet-Cookie: {}={}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{}",
        SESSION_COOKIE_NAME,
        session.id(),
        body.len(),
        body
    );
    socket
        .write_all(msg.as_bytes())
        .await
        .context("send response")
}
