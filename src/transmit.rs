// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context as _;
use anyhow::Result;

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::Tls;
use lettre::transport::smtp::client::TlsParameters;
use lettre::transport::smtp::AsyncSmtpTransportBuilder;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::Server;


/// Create a mailer for the given server, using the provided transport
/// security.
///
/// Credentials are only configured if a password is present, meaning
/// that the session stays unauthenticated otherwise.
fn mailer(builder: AsyncSmtpTransportBuilder, server: &Server) -> AsyncSmtpTransport<Tokio1Executor> {
  let builder = builder.port(server.port);
  let builder = if let Some(password) = &server.password {
    builder.credentials(Credentials::new(server.user.clone(), password.clone()))
  } else {
    builder
  };
  builder.build()
}


async fn send_with(server: &Server, message: Message, tls: Tls) -> Result<()> {
  let builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&server.host).tls(tls);
  let mailer = mailer(builder, server);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    recipients = message.envelope().to().len(),
    authenticated = server.password.is_some(),
    "submitting message"
  );

  let _response = mailer
    .send(message)
    .await
    .with_context(|| format!("failed to send email via {}:{}", server.host, server.port))?;
  Ok(())
}


/// Deliver a message to the given SMTP server.
///
/// The connection is encrypted from the first byte on (implicit TLS).
/// The session is closed after the message got submitted; no attempt at
/// retrying is made on failure.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, fields(host = %server.host, port = server.port), err)
)]
pub async fn send(server: &Server, message: Message) -> Result<()> {
  let parameters = TlsParameters::new(server.host.clone())
    .with_context(|| format!("failed to create TLS parameters for {}", server.host))?;
  send_with(server, message, Tls::Wrapper(parameters)).await
}


#[cfg(test)]
mod tests {
  use super::*;

  use tokio::io::AsyncBufReadExt as _;
  use tokio::io::AsyncReadExt as _;
  use tokio::io::AsyncWriteExt as _;
  use tokio::io::BufReader;
  use tokio::net::TcpListener;
  use tokio::task::JoinHandle;
  use tokio::test;

  use crate::message::Content;
  use crate::message::Mail;


  /// Serve a single SMTP session on `listener`, returning the verbs of
  /// all commands received.
  async fn serve(listener: TcpListener) -> Vec<String> {
    let (stream, _addr) = listener.accept().await.unwrap();
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut verbs = Vec::new();

    let () = writer.write_all(b"220 localhost ESMTP\r\n").await.unwrap();

    while let Some(line) = lines.next_line().await.unwrap() {
      let verb = line
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
      let reply = match verb.as_str() {
        "EHLO" | "HELO" => "250-localhost\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n",
        "AUTH" => "235 2.7.0 Authentication successful\r\n",
        "MAIL" | "RCPT" => "250 2.1.0 OK\r\n",
        "DATA" => {
          let () = writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await.unwrap();
          while let Some(line) = lines.next_line().await.unwrap() {
            if line == "." {
              break
            }
          }
          "250 2.0.0 OK\r\n"
        },
        "QUIT" => "221 2.0.0 Bye\r\n",
        _ => "500 5.5.2 Unrecognized command\r\n",
      };
      let () = verbs.push(verb.clone());
      let () = writer.write_all(reply.as_bytes()).await.unwrap();

      if verb == "QUIT" {
        break
      }
    }
    verbs
  }

  async fn start_server() -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(serve(listener));
    (port, handle)
  }

  fn message() -> Message {
    let to = vec!["bob@y.com".to_string(), "carol@z.com".to_string()];
    Mail {
      from: "alice@x.com",
      to: &to,
      subject: "Hi",
      content: Content::Html("<p>World</p>".to_string()),
    }
    .build()
    .unwrap()
  }

  fn server(port: u16, password: Option<&str>) -> Server {
    Server {
      host: "127.0.0.1".to_string(),
      port,
      user: "alice@x.com".to_string(),
      password: password.map(str::to_string),
    }
  }

  /// Check that a password causes the session to authenticate before
  /// submitting the message.
  #[test]
  async fn authenticated_session() {
    let (port, handle) = start_server().await;
    let () = send_with(&server(port, Some("secret")), message(), Tls::None)
      .await
      .unwrap();

    let verbs = handle.await.unwrap();
    let auth = verbs.iter().position(|verb| verb == "AUTH").unwrap();
    let mail = verbs.iter().position(|verb| verb == "MAIL").unwrap();
    assert_eq!(verbs[0], "EHLO");
    assert!(auth < mail, "{verbs:?}");
    assert_eq!(verbs.iter().filter(|verb| *verb == "RCPT").count(), 2);
    assert!(verbs.contains(&"DATA".to_string()), "{verbs:?}");
  }

  /// Check that no authentication happens without a password.
  #[test]
  async fn anonymous_session() {
    let (port, handle) = start_server().await;
    let () = send_with(&server(port, None), message(), Tls::None)
      .await
      .unwrap();

    let verbs = handle.await.unwrap();
    assert!(!verbs.contains(&"AUTH".to_string()), "{verbs:?}");
    assert!(verbs.contains(&"MAIL".to_string()), "{verbs:?}");
    assert!(verbs.contains(&"DATA".to_string()), "{verbs:?}");
  }

  /// Check that the connection is encrypted from the first byte on,
  /// instead of waiting for a plaintext server greeting.
  #[test]
  async fn implicit_tls() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
      let (mut stream, _addr) = listener.accept().await.unwrap();
      let mut byte = [0u8; 1];
      let _count = stream.read_exact(&mut byte).await.unwrap();
      byte[0]
    });

    let result = send(&server(port, None), message()).await;
    // 0x16 is the content type of a TLS handshake record.
    assert_eq!(handle.await.unwrap(), 0x16);
    assert!(result.is_err());
  }

  /// Make sure that a refused connection is reported as an error.
  #[test]
  async fn connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = send(&server(port, None), message()).await.unwrap_err();
    assert_eq!(
      err.to_string(),
      format!("failed to send email via 127.0.0.1:{port}")
    );
  }
}
