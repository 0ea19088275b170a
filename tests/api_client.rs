use emojigen::{
    ApiConfig, EmojiApi, EmojiApiClient, EmojiError, FontCategory, RenderRequest, TextAlign,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one HTTP response and hands back the raw request.
async fn serve_once(status: &str, content_type: &str, body: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&request) {
                break;
            }
        }
        socket.write_all(head.as_bytes()).await.ok();
        socket.write_all(&body).await.ok();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    body.len() >= length
}

fn client(base_url: &str) -> EmojiApiClient {
    EmojiApiClient::new(ApiConfig::new().with_base_url(base_url).without_proxy()).unwrap()
}

fn sample_request() -> RenderRequest {
    RenderRequest {
        text: "hi".into(),
        width: 128,
        height: 128,
        align: TextAlign::Center,
        color: "#ffffffff".into(),
        background_color: "#00000000".into(),
        typeface_name: "font1".into(),
        size_fixed: false,
        disable_stretch: true,
    }
}

#[tokio::test]
async fn test_fetch_font_directory_groups_fonts() {
    let body = br#"{"available_fonts":{"zen":{"typeface":"Gothic"},"aoyagi":{"typeface":"Brush"},"mplus":{"typeface":"Gothic"},"plain":{}}}"#;
    let (base_url, server) = serve_once("200 OK", "application/json", body.to_vec()).await;

    let categories = client(&base_url).fetch_font_directory().await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /fonts HTTP/1.1"));
    assert_eq!(
        categories,
        vec![
            FontCategory::new("Gothic")
                .with_font("zen", "zen")
                .with_font("mplus", "mplus"),
            FontCategory::new("Brush").with_font("aoyagi", "aoyagi"),
            FontCategory::new("Uncategorized").with_font("plain", "plain"),
        ]
    );
}

#[tokio::test]
async fn test_fetch_font_directory_schema_error() {
    let (base_url, server) =
        serve_once("200 OK", "application/json", br#"{"fonts":{}}"#.to_vec()).await;

    let err = client(&base_url).fetch_font_directory().await.unwrap_err();
    server.await.unwrap();
    assert!(matches!(err, EmojiError::Schema(_)));
}

#[tokio::test]
async fn test_fetch_font_directory_http_error() {
    let (base_url, server) = serve_once("404 Not Found", "text/plain", b"missing".to_vec()).await;

    let err = client(&base_url).fetch_font_directory().await.unwrap_err();
    server.await.unwrap();
    assert!(matches!(err, EmojiError::Fetch { status: 404, .. }));
}

#[tokio::test]
async fn test_render_emoji_returns_bytes() {
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let (base_url, server) = serve_once("200 OK", "image/png", png.clone()).await;

    let image = client(&base_url).render_emoji(&sample_request()).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(image.bytes, png);
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
    assert!(request.starts_with("POST /emoji HTTP/1.1"));

    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    let sent: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(sent["typeface_name"], "font1");
    assert_eq!(sent["align"], "center");
    assert_eq!(sent["background_color"], "#00000000");
    assert_eq!(sent["disable_stretch"], true);
}

#[tokio::test]
async fn test_render_emoji_http_error_carries_status() {
    let (base_url, server) =
        serve_once("500 Internal Server Error", "text/plain", b"boom".to_vec()).await;

    let err = client(&base_url).render_emoji(&sample_request()).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, EmojiError::Fetch { status: 500, .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url).render_emoji(&sample_request()).await.unwrap_err();
    assert!(matches!(err, EmojiError::Request(_)));
}
