use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server saw, sent back as the JSON body of an echo reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Accept connections forever. Each connection is read until the client
/// shuts down its write half, answered once, then closed.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    loop {
        let (socket, peer) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(e) = handle(socket).await {
                eprintln!("connection from {peer} failed: {e}");
            }
        });
    }
}

async fn handle(mut socket: TcpStream) -> Result<(), std::io::Error> {
    let mut raw = Vec::new();
    socket.read_to_end(&mut raw).await?;
    socket.write_all(&respond(&raw)).await?;
    socket.shutdown().await
}

/// Build the full reply for one raw request.
///
/// - `/status/{code}` answers with that status and a short text body.
/// - `/latin1` answers with an ISO-8859-1 body and no `utf-8` marker.
/// - `/no-separator` answers with a header block that never ends.
/// - anything else echoes the request as JSON.
pub fn respond(raw: &[u8]) -> Vec<u8> {
    let Some(request) = parse_request(raw) else {
        return reply(400, "text/plain", b"bad request");
    };

    if let Some(code) = request.target.strip_prefix("/status/") {
        return match code.parse::<u16>() {
            Ok(code) if (100..1000).contains(&code) => {
                reply(code, "text/plain", format!("status {code}").as_bytes())
            }
            _ => reply(400, "text/plain", b"bad status"),
        };
    }

    match request.target.as_str() {
        "/latin1" => reply(200, "text/plain; charset=iso-8859-1", b"caf\xe9 cr\xe8me"),
        "/no-separator" => b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n".to_vec(),
        _ => match serde_json::to_vec(&request) {
            Ok(json) => reply(200, "application/json; charset=utf-8", &json),
            Err(_) => reply(500, "text/plain", b"serialization failed"),
        },
    }
}

fn parse_request(raw: &[u8]) -> Option<EchoedRequest> {
    let split = raw.windows(4).position(|w| w == b"\r\n\r\n")?;
    let head = String::from_utf8_lossy(&raw[..split]);
    let mut lines = head.split("\r\n");

    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    Some(EchoedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&raw[split + 4..]).into_owned(),
    })
}

fn reply(code: u16, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 {code} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reason(code),
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
