// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(
  clippy::collapsible_if,
  clippy::let_and_return,
  clippy::let_unit_value
)]

mod args;

use std::env::args_os;
use std::ffi::OsString;
use std::io::stderr;

use clap::Parser as _;

use anyhow::Context as _;
use anyhow::Result;

use mdmail::send_markdown;
use mdmail::Invocation;

use tracing::info;
use tracing::subscriber::set_global_default as set_global_subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::FmtSubscriber;

use crate::args::Args;


async fn run_impl(args: Args) -> Result<()> {
  let invocation = Invocation::from(args);

  info!(
    from = %invocation.from,
    to = ?invocation.to,
    content = %invocation.content,
    host = %invocation.server.host,
    port = invocation.server.port,
    "sending email"
  );

  let () = send_markdown(&invocation).await?;
  info!("email sent");
  Ok(())
}

fn setup_tracing(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  };

  let subscriber = FmtSubscriber::builder()
    .with_timer(ChronoLocal::new("%Y-%m-%dT%H:%M:%S%.3f%:z".to_string()))
    .with_writer(stderr)
    .with_max_level(level)
    .finish();
  let () = set_global_subscriber(subscriber).with_context(|| "failed to set tracing subscriber")?;
  Ok(())
}


/// Run the program and report errors, if any.
async fn run<A, T>(args: A) -> Result<()>
where
  A: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let args = match Args::try_parse_from(args) {
    Ok(args) => args,
    Err(err) => match err.kind() {
      clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
        print!("{}", err);
        return Ok(())
      },
      _ => return Err(err.into()),
    },
  };

  let () = setup_tracing(args.verbosity)?;

  run_impl(args).await
}


#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  run(args_os()).await
}
