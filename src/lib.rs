// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(
  clippy::collapsible_else_if,
  clippy::collapsible_if,
  clippy::let_and_return,
  clippy::let_unit_value
)]

//! A library for rendering Markdown documents as styled HTML and
//! sending them as email.

mod config;
mod message;
mod render;
mod transmit;

use anyhow::Result;

use lettre::Message;

pub use crate::config::split_recipients;
pub use crate::config::ContentSource;
pub use crate::config::Invocation;
pub use crate::config::Server;
pub use crate::config::DEFAULT_SMTP_HOST;
pub use crate::config::DEFAULT_SMTP_PORT;
pub use crate::message::Attachment;
pub use crate::message::Content;
pub use crate::message::Mail;
pub use crate::render::read_content;
pub use crate::render::render;
pub use crate::transmit::send;


/// Read and render the Markdown content and assemble the message to
/// send, including the attachment, if any.
pub async fn prepare(invocation: &Invocation) -> Result<Message> {
  let markdown = read_content(&invocation.content).await?;
  let html = render(&markdown)?;

  let content = if let Some(path) = &invocation.attachment {
    let attachment = Attachment::load(path).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(attachment = %attachment.filename, size = attachment.data.len(), "loaded attachment");
    Content::WithAttachment { html, attachment }
  } else {
    Content::Html(html)
  };

  let mail = Mail {
    from: &invocation.from,
    to: &invocation.to,
    subject: &invocation.subject,
    content,
  };
  mail.build()
}


/// Render the Markdown content described by `invocation` and send it as
/// an HTML email.
///
/// Any failure aborts the remaining steps. In particular, nothing is
/// sent if the content or the attachment cannot be read.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, fields(content = %invocation.content), err)
)]
pub async fn send_markdown(invocation: &Invocation) -> Result<()> {
  let message = prepare(invocation).await?;
  send(&invocation.server, message).await
}
