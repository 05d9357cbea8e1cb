use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::*;

/// What the mock server saw after its script ran.
#[derive(Debug)]
struct ServerLog {
    /// Lines the client sent after the scripted exchange.
    trailing: Vec<String>,
    /// The client closed its end of the connection.
    closed_by_client: bool,
}

/// Accepts one connection, writes `greeting` (if any), then answers each
/// scripted command and finally drains whatever the client sends until EOF.
async fn spawn_mock_server(
    greeting: Option<&'static str>,
    script: Vec<(&'static str, &'static str)>,
) -> (u16, JoinHandle<ServerLog>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
    let port = listener.local_addr().expect("addr").port();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        if let Some(greeting) = greeting {
            write_half.write_all(greeting.as_bytes()).await.expect("greet");
        }
        for (expected, response) in script {
            let mut line = String::new();
            reader.read_line(&mut line).await.expect("read command");
            assert!(
                line.starts_with(expected),
                "expected command starting with '{expected}', got '{line}'"
            );
            if !response.is_empty() {
                write_half.write_all(response.as_bytes()).await.expect("reply");
            }
        }

        let mut trailing = Vec::new();
        let mut closed_by_client = false;
        let drain = async {
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => {
                        closed_by_client = true;
                        break;
                    }
                    Ok(_) => {
                        if line.starts_with("QUIT") {
                            let _ = write_half.write_all(b"221 2.0.0 Bye\r\n").await;
                        }
                        trailing.push(line.trim_end().to_string());
                    }
                }
            }
        };
        let _ = tokio::time::timeout(Duration::from_secs(5), drain).await;
        ServerLog {
            trailing,
            closed_by_client,
        }
    });
    (port, handle)
}

fn options_for(port: u16) -> ProbeOptions {
    ProbeOptions {
        port,
        helo_name: "probe.test".to_string(),
        ..ProbeOptions::default()
    }
    .with_stage_timeout(Duration::from_millis(300))
}

const GREETING: Option<&str> = Some("220 mock.smtp.test ESMTP\r\n");

#[tokio::test]
async fn rcpt_250_means_accepted() {
    let (port, server) = spawn_mock_server(
        GREETING,
        vec![
            ("HELO probe.test", "250 mock.smtp.test\r\n"),
            ("MAIL FROM:<verifier@example.org>", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:<jane@example.com>", "250 2.1.5 Ok\r\n"),
            ("QUIT", "221 2.0.0 Bye\r\n"),
        ],
    )
    .await;

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, Some(true));
    assert_eq!(outcome.reason_code, Some(250));
    assert_eq!(outcome.reason_text, "Mailbox exists");
    assert_eq!(outcome.stage, ProbeStage::Closed);

    let log = server.await.expect("server task");
    assert!(log.closed_by_client);
    assert!(log.trailing.is_empty(), "{:?}", log.trailing);
}

#[tokio::test]
async fn rcpt_550_means_rejected_and_still_quits() {
    let (port, server) = spawn_mock_server(
        GREETING,
        vec![
            ("HELO", "250 ok\r\n"),
            ("MAIL FROM:", "250 ok\r\n"),
            ("RCPT TO:", "550 5.1.1 User unknown\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
    )
    .await;

    let outcome = probe_mailbox("ghost@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, Some(false));
    assert_eq!(outcome.reason_code, Some(550));
    assert!(outcome.reason_text.contains("5.1.1 User unknown"));
    assert!(server.await.expect("server task").closed_by_client);
}

#[tokio::test]
async fn greylisting_4xx_counts_as_rejected() {
    let (port, server) = spawn_mock_server(
        GREETING,
        vec![
            ("HELO", "250 ok\r\n"),
            ("MAIL FROM:", "250 ok\r\n"),
            ("RCPT TO:", "451 4.7.1 Greylisted, try later\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
    )
    .await;

    let outcome = probe_mailbox("new@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, Some(false));
    assert_eq!(outcome.reason_code, Some(451));
    server.await.expect("server task");
}

#[tokio::test]
async fn multi_line_replies_use_final_line() {
    let (port, server) = spawn_mock_server(
        Some("220-mock.smtp.test first banner line\r\n220-second\r\n220 ready\r\n"),
        vec![
            ("HELO", "250-mock.smtp.test\r\n250-PIPELINING\r\n250 8BITMIME\r\n"),
            ("MAIL FROM:", "250 ok\r\n"),
            ("RCPT TO:", "250-looking\r\n250 ok\r\n"),
            ("QUIT", "221 bye\r\n"),
        ],
    )
    .await;

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, Some(true));
    let greeting = outcome
        .transcript
        .iter()
        .find_map(|event| match event {
            SmtpEvent::Received {
                stage: ProbeStage::Connecting,
                reply,
            } => Some(reply),
            _ => None,
        })
        .expect("greeting recorded");
    assert_eq!(greeting.code, 220);
    assert_eq!(greeting.lines.len(), 3);
    assert_eq!(greeting.text(), "ready");
    server.await.expect("server task");
}

#[tokio::test]
async fn unexpected_greeting_is_inconclusive() {
    let (port, server) = spawn_mock_server(Some("554 no service\r\n"), vec![]).await;

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert_eq!(outcome.reason_code, Some(554));
    assert!(outcome.reason_text.starts_with("Unexpected connection response (554)"));
    let log = server.await.expect("server task");
    assert!(log.closed_by_client);
    assert_eq!(log.trailing, vec!["QUIT".to_string()]);
}

#[tokio::test]
async fn helo_and_mail_from_refusals_are_inconclusive() {
    let (port, server) = spawn_mock_server(GREETING, vec![("HELO", "501 bad helo\r\n")]).await;
    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert!(outcome.reason_text.starts_with("HELO failed (501)"));
    server.await.expect("server task");

    let (port, server) = spawn_mock_server(
        GREETING,
        vec![("HELO", "250 ok\r\n"), ("MAIL FROM:", "553 sender rejected\r\n")],
    )
    .await;
    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert!(outcome.reason_text.starts_with("MAIL FROM failed (553)"));
    server.await.expect("server task");
}

#[tokio::test]
async fn silent_server_times_out_and_socket_is_closed() {
    let (port, server) = spawn_mock_server(None, vec![]).await;

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert_eq!(outcome.stage, ProbeStage::Connecting);
    assert!(outcome.reason_text.contains("CONNECTING"), "{}", outcome.reason_text);

    let log = server.await.expect("server task");
    assert!(log.closed_by_client, "socket left open after timeout");
    assert!(log.trailing.is_empty());
}

#[tokio::test]
async fn stall_after_mail_from_names_the_stage() {
    let (port, server) = spawn_mock_server(
        GREETING,
        vec![("HELO", "250 ok\r\n"), ("MAIL FROM:", "")],
    )
    .await;

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert_eq!(outcome.stage, ProbeStage::HeloOk);
    assert_eq!(outcome.reason_code, Some(250));
    assert!(outcome.reason_text.contains("HELO_OK"), "{}", outcome.reason_text);
    assert!(server.await.expect("server task").closed_by_client);
}

#[tokio::test]
async fn server_hangup_is_inconclusive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        stream.write_all(b"220 hi\r\n").await.expect("greet");
        // dropped here: connection ends before HELO is answered
    });

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert!(
        outcome.reason_text.contains("Unexpected connection end")
            || outcome.reason_text.starts_with("Connection error"),
        "{}",
        outcome.reason_text
    );
    server.await.expect("server task");
}

#[tokio::test]
async fn refused_connection_is_inconclusive() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert_eq!(outcome.reason_code, None);
    assert!(outcome.reason_text.starts_with("Connection error"), "{}", outcome.reason_text);
}

#[tokio::test]
async fn malformed_reply_is_inconclusive() {
    let (port, server) = spawn_mock_server(Some("hello there\r\n"), vec![]).await;
    let outcome = probe_mailbox("jane@example.com", "127.0.0.1", &options_for(port)).await;
    assert_eq!(outcome.accepted, None);
    assert!(outcome.reason_text.starts_with("Malformed reply"));
    assert!(server.await.expect("server task").closed_by_client);
}

#[tokio::test]
async fn unusable_targets_skip_the_network() {
    let options = ProbeOptions::default();
    let outcome = probe_mailbox("a@b.com\r\nDATA", "mx.example.com", &options).await;
    assert_eq!(outcome.accepted, None);
    assert!(outcome.transcript.is_empty());

    let outcome = probe_mailbox("a@b.com", "  ", &options).await;
    assert_eq!(outcome.reason_text, "No mail exchange host");
}

#[test]
fn catch_all_address_shape() {
    let address = catch_all_address("example.com");
    let local = address.strip_suffix("@example.com").expect("domain suffix");
    let digits = local.strip_prefix("test").expect("test prefix");
    assert!(!digits.is_empty());
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}
