//! Minimal HTML renderer.

use async_trait::async_trait;

use super::{RenderError, RenderedDocument, Renderer};
use crate::content::{MediaKind, PublishRecord};

/// Renders records as a sequence of `<section>` blocks.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    footer: Option<String>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain-text footer appended after the last section.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    fn render_record(&self, index: usize, record: &PublishRecord, out: &mut String) {
        out.push_str("<section class=\"item\">\n");
        out.push_str(&format!(
            "<h2>{}. {}</h2>\n",
            index + 1,
            escape(&record.title)
        ));

        if let Some(image) = record.media.iter().find(|m| m.kind == MediaKind::Image) {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\"/>\n",
                escape(&image.url),
                escape(&record.title)
            ));
        }

        for paragraph in record
            .content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            out.push_str(&format!("<p>{}</p>\n", escape(paragraph)));
        }

        if !record.keywords.is_empty() {
            let tags: Vec<String> = record.keywords.iter().map(|k| escape(k)).collect();
            out.push_str(&format!("<p class=\"keywords\">{}</p>\n", tags.join(" · ")));
        }

        let mut meta = Vec::new();
        if let Some(source) = &record.metadata.source {
            meta.push(escape(source));
        }
        if let Some(date) = record.publish_date {
            meta.push(date.format("%Y-%m-%d").to_string());
        }
        if !record.url.is_empty() {
            meta.push(format!("<a href=\"{}\">source</a>", escape(&record.url)));
        }
        if !meta.is_empty() {
            out.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" | ")));
        }

        out.push_str("</section>\n");
    }
}

#[async_trait]
impl Renderer for HtmlRenderer {
    async fn render(&self, records: &[PublishRecord]) -> Result<RenderedDocument, RenderError> {
        if records.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut out = String::from("<article>\n");
        for (index, record) in records.iter().enumerate() {
            self.render_record(index, record, &mut out);
        }
        if let Some(footer) = &self.footer {
            out.push_str(&format!("<footer>{}</footer>\n", escape(footer)));
        }
        out.push_str("</article>\n");

        Ok(RenderedDocument(out))
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
