// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;

use mdmail::split_recipients;
use mdmail::ContentSource;
use mdmail::Invocation;
use mdmail::Server;
use mdmail::DEFAULT_SMTP_HOST;
use mdmail::DEFAULT_SMTP_PORT;


/// A program for sending Markdown documents as HTML emails.
#[derive(Debug, Parser)]
#[clap(name = "mdmail", version = env!("VERSION"))]
pub(crate) struct Args {
  /// The sender of the mail.
  #[clap(value_name = "FROM")]
  pub from: String,
  /// The comma separated recipients of the mail.
  #[clap(value_name = "TO")]
  pub to: String,
  /// The subject of the mail.
  #[clap(value_name = "SUBJECT")]
  pub subject: String,
  /// The Markdown file to use as the content of the mail.
  ///
  /// Use '-' to read the content from standard input.
  #[clap(value_name = "FILE")]
  pub file: PathBuf,
  /// The host of the SMTP server.
  #[clap(short = 'H', long, value_name = "HOST", default_value = DEFAULT_SMTP_HOST)]
  pub smtp_host: String,
  /// The port of the SMTP server.
  #[clap(short = 'p', long, value_name = "PORT", default_value_t = DEFAULT_SMTP_PORT)]
  pub smtp_port: u16,
  /// The user to log in to the SMTP server as; defaults to the sender.
  #[clap(short = 'u', long, value_name = "USER")]
  pub smtp_user: Option<String>,
  /// The password for the SMTP user.
  ///
  /// If not provided the session is not authenticated.
  #[clap(short = 'P', long, value_name = "PASS")]
  pub smtp_pass: Option<String>,
  /// A file to attach to the mail.
  #[clap(short = 'a', long, value_name = "FILE")]
  pub attachment_file: Option<PathBuf>,
  /// Increase verbosity (can be supplied multiple times).
  #[clap(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
  pub verbosity: u8,
}

impl From<Args> for Invocation {
  fn from(args: Args) -> Self {
    let Args {
      from,
      to,
      subject,
      file,
      smtp_host,
      smtp_port,
      smtp_user,
      smtp_pass,
      attachment_file,
      verbosity: _,
    } = args;

    let user = smtp_user.unwrap_or_else(|| from.clone());

    Invocation {
      to: split_recipients(&to),
      subject,
      content: ContentSource::from_arg(file),
      server: Server {
        host: smtp_host,
        port: smtp_port,
        user,
        password: smtp_pass,
      },
      attachment: attachment_file,
      from,
    }
  }
}
