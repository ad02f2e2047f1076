// src/page.rs
//! Full HTML document around the feed container.

use html_escape::encode_text;

use crate::container::FeedContainer;

pub const STYLESHEET_HREF: &str = "style.css";

pub fn render_page(container: &FeedContainer, title: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"stylesheet\" href=\"{css}\">\n",
            "</head>\n<body>\n",
            "<header><h1>{title}</h1></header>\n",
            "<main>{feed}</main>\n",
            "</body>\n</html>\n"
        ),
        title = encode_text(title),
        css = STYLESHEET_HREF,
        feed = container.to_html(),
    )
}
