// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::Context as _;
use anyhow::Result;

use lettre::message::header::ContentDisposition;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::message::SinglePart;
use lettre::Message;

use tokio::fs::read;


/// A file attached to an email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
  /// The file name as advertised to the recipient, without any
  /// directory components.
  pub filename: String,
  /// The raw contents of the file.
  pub data: Vec<u8>,
}

impl Attachment {
  /// Load the file at `path` as an attachment.
  pub async fn load(path: &Path) -> Result<Self> {
    let filename = path
      .file_name()
      .with_context(|| format!("attachment path `{}` has no file name", path.display()))?
      .to_string_lossy()
      .into_owned();
    let data = read(path)
      .await
      .with_context(|| format!("failed to read attachment file `{}`", path.display()))?;

    Ok(Self { filename, data })
  }
}


/// The content of an email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
  /// A lone HTML document.
  Html(String),
  /// An HTML document followed by an attachment.
  WithAttachment {
    html: String,
    attachment: Attachment,
  },
}

impl Content {
  /// Retrieve the number of MIME parts carrying content.
  pub fn part_count(&self) -> usize {
    match self {
      Self::Html(..) => 1,
      Self::WithAttachment { .. } => 2,
    }
  }
}


/// An email ready to be assembled into a deliverable message.
#[derive(Clone, Debug)]
pub struct Mail<'input> {
  /// The "From" identifier to use.
  pub from: &'input str,
  /// The recipients of the email.
  ///
  /// Empty entries are ignored.
  pub to: &'input [String],
  /// The subject of the email.
  pub subject: &'input str,
  /// What to send.
  pub content: Content,
}

impl Mail<'_> {
  /// Assemble the deliverable message.
  ///
  /// From, To, and Subject are always placed on the outermost part, which
  /// is the HTML part itself or the `multipart/mixed` container wrapping
  /// it and the attachment.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(parts = self.content.part_count()), err))]
  pub fn build(self) -> Result<Message> {
    let from = self
      .from
      .parse::<Mailbox>()
      .with_context(|| format!("failed to parse 'From' specification: `{}`", self.from))?;
    let mut email = Message::builder().from(from).subject(self.subject);

    for recipient in self.to.iter().filter(|recipient| !recipient.is_empty()) {
      let to = recipient
        .parse::<Mailbox>()
        .with_context(|| format!("failed to parse 'To' specification: `{recipient}`"))?;

      email = email.to(to);
    }

    let email = match self.content {
      Content::Html(html) => email
        .header(ContentType::TEXT_HTML)
        .body(html)
        .context("failed to create email message")?,
      Content::WithAttachment { html, attachment } => {
        let Attachment { filename, data } = attachment;
        let parts = MultiPart::mixed()
          .singlepart(SinglePart::html(html))
          .singlepart(
            SinglePart::builder()
              .header(
                ContentType::parse("application/octet-stream")
                  .context("failed to parse 'application/octet-stream' content type header")?,
              )
              .header(ContentDisposition::attachment(&filename))
              .body(data),
          );

        email
          .multipart(parts)
          .context("failed to create email message")?
      },
    };
    Ok(email)
  }
}
