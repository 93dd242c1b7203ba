//! Word-by-word title animations

use lumen_dom::{Document, NodeId};
use lumen_window::Window;

use crate::config::TextConfig;
use crate::Elements;

const WORD_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// Replace the text of `node` with one `span.word` per word
///
/// Words start invisible and shifted down; spaces between them stay text.
pub fn split_words(document: &mut Document, node: NodeId) -> Vec<NodeId> {
    let text = document.text_content(node);
    document.tree_mut().remove_children(node);

    let mut spans = Vec::new();
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            let space = document.tree_mut().create_text(" ");
            document.append_child(node, space);
        }
        let span = document.create_element("span");
        document.add_class(span, "word");
        document.set_text_content(span, word);
        document.set_styles(span, &[
            ("display", "inline-block"),
            ("opacity", "0"),
            ("transform", "translateY(20px)"),
            ("transition", WORD_TRANSITION),
        ]);
        document.append_child(node, span);
        spans.push(span);
    }
    spans
}

fn reveal_word(document: &mut Document, span: NodeId) {
    document.set_styles(span, &[("opacity", "1"), ("transform", "translateY(0)")]);
}

/// One-shot title animations run at setup
#[derive(Debug, Clone, Default)]
pub struct TextAnimations {
    hero_words: Vec<NodeId>,
    services_words: Vec<NodeId>,
}

impl TextAnimations {
    pub fn install(window: &mut Window, elements: &Elements, config: &TextConfig) -> Self {
        let mut animations = Self::default();

        if let Some(title) = elements.hero_title {
            let words = split_words(window.document_mut(), title);
            let (step, scheduled) = (config.hero_step_ms, words.clone());
            window.set_timeout(config.hero_delay_ms, move |w| {
                for (i, span) in scheduled.into_iter().enumerate() {
                    w.set_timeout(i as u64 * step, move |w| reveal_word(w.document_mut(), span));
                }
            });
            animations.hero_words = words;
        }

        if let Some(title) = elements.services_title {
            let words = split_words(window.document_mut(), title);
            for (i, &span) in words.iter().enumerate() {
                let delay = i as u64 * config.services_step_ms;
                window.document_mut().set_style(
                    span,
                    "transition",
                    &format!("opacity 0.6s ease {delay}ms, transform 0.6s ease {delay}ms"),
                );
            }
            let scheduled = words.clone();
            window.set_timeout(config.services_delay_ms, move |w| {
                for &span in &scheduled {
                    reveal_word(w.document_mut(), span);
                }
            });
            animations.services_words = words;
        }

        if let Some(section) = elements.services_hero {
            window.set_timeout(config.services_loaded_delay_ms, move |w| {
                w.document_mut().add_class(section, "loaded");
            });
        }

        tracing::debug!(
            "Text animations: {} hero words, {} services words",
            animations.hero_words.len(),
            animations.services_words.len()
        );
        animations
    }

    pub fn hero_words(&self) -> &[NodeId] {
        &self.hero_words
    }

    pub fn services_words(&self) -> &[NodeId] {
        &self.services_words
    }
}

#[cfg(test)]
mod tests {
    use lumen_window::Viewport;

    use super::*;

    fn opacity(window: &Window, span: NodeId) -> Option<&str> {
        window.document().style(span, "opacity")
    }

    #[test]
    fn test_split_words() {
        let mut doc = Document::default();
        let h1 = doc.create_element("h1");
        let body = doc.body();
        doc.append_child(body, h1);
        doc.set_text_content(h1, "  Design   that moves ");

        let spans = split_words(&mut doc, h1);
        assert_eq!(spans.len(), 3);
        assert_eq!(doc.text_content(h1), "Design that moves");
        assert_eq!(doc.query_selector_all("h1 span.word"), spans);
        assert_eq!(doc.style(spans[0], "transform"), Some("translateY(20px)"));
    }

    #[test]
    fn test_hero_words_stagger() {
        let mut doc = Document::default();
        let h1 = doc.create_element("h1");
        doc.set_attribute(h1, "class", "hero-title");
        let body = doc.body();
        doc.append_child(body, h1);
        doc.set_text_content(h1, "One two three");

        let elements = Elements::resolve(&doc);
        let mut window = Window::new(doc, Viewport::default());
        let text = TextAnimations::install(&mut window, &elements, &TextConfig::default());
        let words = text.hero_words().to_vec();

        window.advance(499);
        assert_eq!(opacity(&window, words[0]), Some("0"));
        window.advance(1);
        assert_eq!(opacity(&window, words[0]), Some("1"));
        assert_eq!(opacity(&window, words[1]), Some("0"));
        window.advance(100);
        assert_eq!(opacity(&window, words[1]), Some("1"));
        assert_eq!(opacity(&window, words[2]), Some("0"));
        window.advance(100);
        assert_eq!(opacity(&window, words[2]), Some("1"));
    }

    #[test]
    fn test_services_title_and_section() {
        let mut doc = Document::default();
        let section = doc.create_element("section");
        doc.set_attribute(section, "class", "services-hero");
        let h1 = doc.create_element("h1");
        let body = doc.body();
        doc.append_child(body, section);
        doc.append_child(section, h1);
        doc.set_text_content(h1, "Our services");

        let elements = Elements::resolve(&doc);
        let mut window = Window::new(doc, Viewport::default());
        let text = TextAnimations::install(&mut window, &elements, &TextConfig::default());
        let words = text.services_words().to_vec();

        assert_eq!(
            window.document().style(words[1], "transition"),
            Some("opacity 0.6s ease 100ms, transform 0.6s ease 100ms")
        );

        window.advance(200);
        assert!(window.document().has_class(section, "loaded"));
        assert_eq!(opacity(&window, words[0]), Some("0"));
        window.advance(100);
        assert!(words.iter().all(|&w| opacity(&window, w) == Some("1")));
    }
}
