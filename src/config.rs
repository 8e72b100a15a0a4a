// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::path::PathBuf;


/// The default host of the SMTP server.
pub const DEFAULT_SMTP_HOST: &str = "127.0.0.1";
/// The default port of the SMTP server (implicit TLS).
pub const DEFAULT_SMTP_PORT: u16 = 465;


/// Split a comma separated list of recipients.
///
/// Entries are neither trimmed nor validated and empty entries are
/// preserved, i.e., `"a@x,"` results in `["a@x", ""]`.
pub fn split_recipients(recipients: &str) -> Vec<String> {
  recipients.split(',').map(str::to_string).collect()
}


/// The source from which to read the Markdown content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
  /// Read content from standard input.
  Stdin,
  /// Read content from the file at the given path.
  Path(PathBuf),
}

impl ContentSource {
  /// Resolve a command line style path, mapping `-` to standard input.
  pub fn from_arg<P>(path: P) -> Self
  where
    P: Into<PathBuf>,
  {
    let path = path.into();
    if path.as_os_str() == "-" {
      Self::Stdin
    } else {
      Self::Path(path)
    }
  }
}

impl Display for ContentSource {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Stdin => f.write_str("<stdin>"),
      Self::Path(path) => write!(f, "{}", path.display()),
    }
  }
}


/// A type describing the SMTP server to deliver to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Server {
  /// The hostname of the SMTP server.
  pub host: String,
  /// The port the SMTP server listens on for implicit TLS sessions.
  pub port: u16,
  /// The user to log in as.
  pub user: String,
  /// The password to use for logging in.
  ///
  /// If not present the session is not authenticated.
  pub password: Option<String>,
}


/// The full set of inputs for sending a single Markdown email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
  /// The "From" identifier to use.
  pub from: String,
  /// The recipients, in the order provided.
  pub to: Vec<String>,
  /// The subject of the email.
  pub subject: String,
  /// Where to read the Markdown content from.
  pub content: ContentSource,
  /// The SMTP server to use.
  pub server: Server,
  /// An optional file to attach.
  pub attachment: Option<PathBuf>,
}
