use echo_server::{run, EchoedRequest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(run(listener));
    addr
}

/// Send `request`, half-close, and read the reply until the server closes.
async fn exchange(addr: std::net::SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    reply
}

fn split(reply: &[u8]) -> (String, Vec<u8>) {
    let at = reply.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
    (
        String::from_utf8(reply[..at].to_vec()).unwrap(),
        reply[at + 4..].to_vec(),
    )
}

// --- echo ---

#[tokio::test]
async fn get_is_echoed_back() {
    let addr = start().await;
    let reply = exchange(addr, b"GET /hello?x=1 HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    let (head, body) = split(&reply);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("charset=utf-8"));
    let echoed: EchoedRequest = serde_json::from_slice(&body).unwrap();
    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.target, "/hello?x=1");
    assert!(echoed.body.is_empty());
}

#[tokio::test]
async fn post_body_is_echoed_back() {
    let addr = start().await;
    let reply = exchange(
        addr,
        b"POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Length: 7\r\n\r\na=1&b=2",
    )
    .await;

    let (_, body) = split(&reply);
    let echoed: EchoedRequest = serde_json::from_slice(&body).unwrap();
    assert_eq!(echoed.method, "POST");
    assert_eq!(echoed.body, "a=1&b=2");
    assert!(echoed
        .headers
        .contains(&("Content-Length".to_string(), "7".to_string())));
}

// --- fixed routes ---

#[tokio::test]
async fn status_route_sets_code() {
    let addr = start().await;
    let reply = exchange(addr, b"GET /status/201 HTTP/1.1\r\n\r\n").await;
    let (head, body) = split(&reply);
    assert!(head.starts_with("HTTP/1.1 201 Created"));
    assert_eq!(body, b"status 201");
}

#[tokio::test]
async fn no_separator_route_never_ends_headers() {
    let addr = start().await;
    let reply = exchange(addr, b"GET /no-separator HTTP/1.1\r\n\r\n").await;
    assert!(!reply.windows(4).any(|w| w == b"\r\n\r\n"));
}

#[tokio::test]
async fn server_handles_sequential_connections() {
    let addr = start().await;
    for _ in 0..3 {
        let reply = exchange(addr, b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(reply.starts_with(b"HTTP/1.1 200 OK"));
    }
}
