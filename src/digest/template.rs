//! HTML body for digest emails.

use super::{DIGEST_SIZE, DigestTime};
use crate::models::{CanonicalArticle, PLACEHOLDER_LINK};
use html_escape::{encode_double_quoted_attribute, encode_text};

fn article_block(article: &CanonicalArticle) -> String {
    let title = encode_text(&article.title);
    let heading = if article.link == PLACEHOLDER_LINK {
        title.into_owned()
    } else {
        format!(
            r#"<a href="{}" style="color: #1f2937; text-decoration: none;">{title}</a>"#,
            encode_double_quoted_attribute(&article.link)
        )
    };

    format!(
        r#"
    <div style="margin-bottom: 24px; padding: 16px; background: #f9fafb; border-radius: 8px;">
      <h3 style="margin: 0 0 8px 0; color: #1f2937; font-size: 18px;">{heading}</h3>
      <p style="margin: 0 0 8px 0; color: #6b7280; font-size: 14px;">{description}</p>
      <div style="font-size: 12px; color: #9ca3af;">
        <span style="background: #e97b3c; color: white; padding: 2px 8px; border-radius: 4px;">{source}</span>
        <span>{category}</span>
        <span>Credibility: {credibility}%</span>
      </div>
    </div>"#,
        description = encode_text(&article.description),
        source = encode_text(&article.source),
        category = article.category,
        credibility = (article.credibility * 100.0).round() as u32,
    )
}

/// Render the top [`DIGEST_SIZE`] articles into a standalone HTML document.
pub fn render_digest_html(articles: &[CanonicalArticle], time: DigestTime) -> String {
    let blocks: String = articles.iter().take(DIGEST_SIZE).map(article_block).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #ffffff;">
  <div style="max-width: 600px; margin: 0 auto; padding: 32px 16px;">
    <div style="text-align: center; margin-bottom: 32px;">
      <h1 style="margin: 0; color: #1f2937; font-size: 28px;">📰 OnyeAkuko</h1>
      <p style="margin: 8px 0 0 0; color: #6b7280; font-size: 14px;">{time} News Digest</p>
    </div>
    <div style="margin-bottom: 24px;">
      <h2 style="margin: 0 0 16px 0; color: #1f2937; font-size: 20px;">Top Stories Today</h2>{blocks}
    </div>
    <div style="text-align: center; padding: 24px; background: #f9fafb; border-radius: 8px;">
      <p style="margin: 0; color: #6b7280; font-size: 12px;">
        You're receiving this because you subscribed to NewsHub daily digests.
      </p>
    </div>
  </div>
</body>
</html>
"#
    )
}
