// Copyright (C) 2024 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::anyhow;
use anyhow::Context as _;
use anyhow::Result;

use markdown::to_html_with_options;
use markdown::CompileOptions;
use markdown::Constructs;
use markdown::Options;
use markdown::ParseOptions;

use tokio::fs::read_to_string;
use tokio::io::stdin;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt as _;

use crate::config::ContentSource;


/// The stylesheet embedded into every rendered document.
const STYLESHEET: &str = include_str!("../data/github-markdown.css");


/// Read all Markdown content from a stream.
async fn read_stream<R>(mut reader: R) -> Result<String>
where
  R: AsyncRead + Unpin,
{
  let mut content = String::new();
  let _count = reader.read_to_string(&mut content).await?;
  Ok(content)
}


/// Read the Markdown content from the provided source.
#[cfg_attr(feature = "tracing", tracing::instrument(err))]
pub async fn read_content(source: &ContentSource) -> Result<String> {
  match source {
    ContentSource::Stdin => read_stream(stdin())
      .await
      .context("failed to read markdown content from stdin"),
    ContentSource::Path(path) => read_to_string(path)
      .await
      .with_context(|| format!("failed to read markdown content from `{}`", path.display())),
  }
}


/// Convert Markdown into an HTML fragment.
///
/// CommonMark is used as the base dialect, with GitHub style tables
/// enabled on top. Raw HTML is passed through.
fn markdown_to_html(markdown: &str) -> Result<String> {
  let options = Options {
    parse: ParseOptions {
      constructs: Constructs {
        gfm_table: true,
        ..Constructs::default()
      },
      ..ParseOptions::default()
    },
    compile: CompileOptions {
      allow_dangerous_html: true,
      ..CompileOptions::default()
    },
  };

  to_html_with_options(markdown, &options)
    .map_err(|err| anyhow!("failed to convert markdown to HTML: {err}"))
}


/// Render Markdown as a complete and styled HTML document.
pub fn render(markdown: &str) -> Result<String> {
  let body = markdown_to_html(markdown)?;
  let html = format!(
    r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
{STYLESHEET}
.markdown-body {{
    box-sizing: border-box;
    min-width: 200px;
    max-width: 980px;
    margin: 0 auto;
    padding: 45px;
}}

@media (max-width: 767px) {{
    .markdown-body {{
        padding: 15px;
    }}
}}
</style>
</head>
<body class="markdown-body">
{body}
</body>
</html>
"#
  );

  #[cfg(feature = "tracing")]
  tracing::debug!(markdown = markdown.len(), html = html.len(), "rendered document");
  Ok(html)
}
