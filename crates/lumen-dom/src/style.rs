//! Inline style declarations
//!
//! The `style` attribute as an ordered property list. No cascade, no
//! value parsing: values are kept as written.

/// Ordered inline declarations of one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a `style` attribute value (`"a: b; c: d"`)
    pub fn parse(css: &str) -> Self {
        let mut style = Self::default();
        for decl in css.split(';') {
            let Some((property, value)) = decl.split_once(':') else {
                continue;
            };
            style.set(property, value);
        }
        style
    }

    /// Get a property value
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.trim();
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an empty value removes it, like `style.x = ""`
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if property.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove(&property);
            return;
        }

        if let Some(slot) = self.declarations.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value.to_string();
        } else {
            self.declarations.push((property, value.to_string()));
        }
    }

    /// Remove a property
    pub fn remove(&mut self, property: &str) {
        let property = property.trim();
        self.declarations
            .retain(|(p, _)| !p.eq_ignore_ascii_case(property));
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Iterate declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_attribute() {
        let style = InlineStyle::parse("opacity: 0; transform: translateY(20px);; bogus");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("opacity"), Some("0"));
        assert_eq!(style.get("TRANSFORM"), Some("translateY(20px)"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = InlineStyle::parse("a: 1; b: 2");
        style.set("a", "3");
        assert_eq!(style.css_text(), "a: 3; b: 2;");
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = InlineStyle::parse("overflow: hidden");
        style.set("overflow", "");
        assert!(style.is_empty());
        assert_eq!(style.get("overflow"), None);
    }

    #[test]
    fn test_value_with_colon_is_kept() {
        let style = InlineStyle::parse("background: url(http://x/y.png)");
        assert_eq!(style.get("background"), Some("url(http://x/y.png)"));
    }
}
