#![forbid(unsafe_code)]

use std::io::Write;

use lazy_static::lazy_static;
use log::info;
use poem::listener::{Listener, TcpAcceptor, TcpListener};
use poem::Server;

// Server Utilities
use crate::challenge_responder::challenge;
use crate::utils::config::{init_log, init_runtime_context, Config, RuntimeCtx};
use crate::utils::errors::Errors;

// Modules
mod challenge_responder;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "BasicChallengeServer"; // server name passed to poem

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// The configuration is fixed, so the context is built on first use and
// shared by every request.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), Errors> {
    // Configure our log.
    init_log()?;
    print_version_info();

    let acceptor = bind_and_announce(&RUNTIME_CTX.config, &mut std::io::stdout()).await?;

    // ------------------ Main Loop -------------------
    Server::new_with_acceptor(acceptor)
        .name(SERVER_NAME)
        .run(challenge)
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// bind_and_announce:
// ---------------------------------------------------------------------------
/** Bind the listener, then write the startup line to `out`.  Nothing is
 * written when the bind fails.
 */
async fn bind_and_announce<W: Write>(config: &Config, out: &mut W) -> Result<TcpAcceptor, Errors> {
    let acceptor = TcpListener::bind(config.listen_addr()).into_acceptor().await?;
    writeln!(out, "Server running at {}", config.base_url())?;
    out.flush()?;
    Ok(acceptor)
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("*** Running {}={}, realm={:?}",
          env!("CARGO_PKG_NAME"),
          option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
          RUNTIME_CTX.config.realm);
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::listener::{Acceptor, Listener, TcpListener};
    use poem::Server;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::bind_and_announce;
    use crate::challenge_responder::challenge;
    use crate::utils::config::Config;
    use crate::utils::errors::Errors;

    // Serve the responder on an ephemeral port and return the raw bytes
    // written back for `request`.
    async fn raw_exchange(request: &str) -> String {
        let acceptor = TcpListener::bind("127.0.0.1:0")
            .into_acceptor()
            .await
            .unwrap();
        let addr = *acceptor.local_addr()[0].as_socket_addr().unwrap();
        tokio::spawn(Server::new_with_acceptor(acceptor).run(challenge));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn split_response(raw: &str) -> (String, &str) {
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        (head.to_ascii_lowercase(), body)
    }

    #[tokio::test]
    async fn raw_get_over_socket() {
        let request = "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        let raw = raw_exchange(request).await;
        assert!(raw.starts_with("HTTP/1.1 401 Unauthorized\r\n"), "{}", raw);

        let (head, body) = split_response(&raw);
        assert!(head.contains("\r\nwww-authenticate: basic realm=\"test\""), "{}", head);
        assert!(head.contains("\r\ncontent-length: 12"), "{}", head);
        assert_eq!(body, "Hello World\n");
        assert!(raw.contains(r#"Basic realm="Test""#));
    }

    #[tokio::test]
    async fn raw_post_with_credentials() {
        let payload = r#"{"user":"user","password":"pass"}"#;
        let request = format!(
            "POST /login HTTP/1.1\r\nHost: localhost\r\nAuthorization: Basic dXNlcjpwYXNz\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            payload.len(),
            payload
        );
        let raw = raw_exchange(&request).await;
        assert!(raw.starts_with("HTTP/1.1 401 Unauthorized\r\n"), "{}", raw);
        let (_, body) = split_response(&raw);
        assert_eq!(body, "Hello World\n");
    }

    #[tokio::test]
    async fn announces_after_bind() {
        let config = Config { http_port: 0, ..Config::default() };
        let mut out = Vec::new();
        let acceptor = bind_and_announce(&config, &mut out).await.unwrap();
        assert!(acceptor.local_addr()[0].as_socket_addr().is_some());
        assert_eq!(String::from_utf8(out).unwrap(), "Server running at http://127.0.0.1:0/\n");
    }

    #[tokio::test]
    async fn bind_failure_is_silent() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = Config { http_port: port, ..Config::default() };

        let mut out = Vec::new();
        match bind_and_announce(&config, &mut out).await {
            Err(Errors::IOError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::AddrInUse),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("bind to a port in use succeeded"),
        }
        assert!(out.is_empty());
    }
}
