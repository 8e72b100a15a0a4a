// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Write as _;
use std::net::TcpListener;
use std::process::Command;
use std::process::Stdio;


/// Check that `-` causes the content to be read from standard input,
/// with the program proceeding to the delivery step afterwards.
#[test]
fn content_from_stdin() {
  // Bind and release a port, so that nothing listens on it.
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let port = listener.local_addr().unwrap().port().to_string();
  drop(listener);

  let mut child = Command::new(env!("CARGO_BIN_EXE_mdmail"))
    .args(["a@x.com", "b@y.com", "Hi", "-", "-p", port.as_str()])
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .unwrap();

  let mut stdin = child.stdin.take().unwrap();
  let () = stdin.write_all(b"# Hello\n\nWorld\n").unwrap();
  drop(stdin);

  let output = child.wait_with_output().unwrap();
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(!output.status.success());
  assert!(!stderr.contains("failed to read markdown content"), "{stderr}");
  assert!(
    stderr.contains(&format!("failed to send email via 127.0.0.1:{port}")),
    "{stderr}"
  );
}
