use crate::config::PortalMode;
use crate::core::types::{SelectedFileSummary, UPLOAD_FIELD_NAME};
use askama::Template;
use pulldown_cmark::{Event, Options, Parser, html};

#[derive(Template)]
#[template(path = "portal.html")]
pub struct PortalTemplate<'a> {
    upload_mode: bool,
    field_name: &'a str,
    selected: Option<&'a SelectedFileSummary>,
    report_html: String,
}

/// Renders report Markdown to HTML. Raw HTML inside the report is shown as
/// text, never injected into the page.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn render_page(
    mode: PortalMode,
    selected: Option<&SelectedFileSummary>,
    report: &str,
) -> askama::Result<String> {
    PortalTemplate {
        upload_mode: mode == PortalMode::Upload,
        field_name: UPLOAD_FIELD_NAME,
        selected,
        report_html: render_markdown(report),
    }
    .render()
}
