//! Turns the agent's item list into an email subject, plaintext body and HTML alternative.

use crate::domain::{DigestItem, EmailContent, Language};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

/// Subject dates are rendered in this zone regardless of where the run executes.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Europe::Prague;

pub const EMPTY_SUBJECT: &str = "No new hackathons or challenges found";
pub const EMPTY_BODY: &str =
    "No new hackathons or programming challenges were found for the configured locations and topics.";

const SUBJECT_TITLE_COUNT: usize = 3;
const SUBJECT_TITLES_MAX_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

struct Labels {
    category: &'static str,
    header: &'static str,
    source: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::En => Labels {
            category: "Hackathons & Challenges",
            header: "Hackathons and programming challenges digest",
            source: "Source",
        },
        Language::Cs => Labels {
            category: "Hackathony a výzvy",
            header: "Přehled hackathonů a programátorských výzev",
            source: "Zdroj",
        },
    }
}

/// Today's date in the reference timezone.
pub fn reference_today() -> NaiveDate {
    Utc::now().with_timezone(&REFERENCE_TIMEZONE).date_naive()
}

/// Format using today's date in the reference timezone.
pub fn format_email(items: &[DigestItem], language: Language) -> EmailContent {
    format_email_on(items, language, reference_today())
}

/// Deterministic variant of [`format_email`].
pub fn format_email_on(items: &[DigestItem], language: Language, date: NaiveDate) -> EmailContent {
    if items.is_empty() {
        return EmailContent {
            subject: EMPTY_SUBJECT.to_string(),
            body: EMPTY_BODY.to_string(),
            html: None,
        };
    }

    let labels = labels(language);
    let subject = format!(
        "{} - {}: {}",
        date.format("%Y-%m-%d"),
        labels.category,
        subject_titles(items)
    );

    let mut body = String::new();
    body.push_str(labels.header);
    body.push_str("\n\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            body,
            "{}. [{}] {} ({})",
            i + 1,
            item.category,
            item.title,
            item.date
        );
        let _ = writeln!(body, "   {}", item.summary);
        let _ = writeln!(
            body,
            "   {}: {} — {}",
            labels.source, item.publisher, item.url
        );
        body.push('\n');
    }

    EmailContent {
        subject,
        body,
        html: Some(render_html(items, language)),
    }
}

/// First titles joined; truncated to 47 chars plus an ellipsis when longer than 50.
fn subject_titles(items: &[DigestItem]) -> String {
    let joined = items
        .iter()
        .take(SUBJECT_TITLE_COUNT)
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.chars().count() <= SUBJECT_TITLES_MAX_CHARS {
        return joined;
    }
    let keep = SUBJECT_TITLES_MAX_CHARS - ELLIPSIS.len();
    let mut truncated: String = joined.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// HTML alternative with the same blocks as the plaintext body.
pub fn render_html(items: &[DigestItem], language: Language) -> String {
    let labels = labels(language);
    let mut entries = String::new();
    for item in items {
        let _ = write!(
            entries,
            r#"
    <li style="margin-bottom: 16px;">
        <strong>[{category}] {title}</strong> <span style="color: #6b7280;">({date})</span>
        <p style="margin: 4px 0;">{summary}</p>
        <p style="margin: 4px 0; font-size: 13px;">{source}: {publisher} — <a href="{url}">{url}</a></p>
    </li>"#,
            category = html_escape(&item.category),
            title = html_escape(&item.title),
            date = html_escape(&item.date),
            summary = html_escape(&item.summary),
            source = labels.source,
            publisher = html_escape(&item.publisher),
            url = html_escape(&item.url),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.5;">
<h2>{header}</h2>
<ol>{entries}
</ol>
</body>
</html>"#,
        lang = language.code(),
        header = labels.header,
        entries = entries,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
