//! Lumen HTML Parser
//!
//! HTML5 parsing built on html5ever, producing a `lumen_dom::Document`.

mod parser;

pub use lumen_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input for {url}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
