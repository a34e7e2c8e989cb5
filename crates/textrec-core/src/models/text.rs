//! Hierarchical text result as produced by a vision engine.

use serde::{Deserialize, Serialize};

/// Full result of one detection pass over a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// Full page text.
    #[serde(default)]
    pub text: String,

    /// Detected blocks in reading order.
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// A block of text, roughly a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// A single line within a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

/// Smallest unit the engine reports, usually a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
}

impl Text {
    /// Build a page from blocks, joining block texts with newlines.
    pub fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text, blocks }
    }

    /// Check whether the engine found anything.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl TextBlock {
    /// Build a block from lines, joining line texts with newlines.
    pub fn from_lines(lines: Vec<TextLine>) -> Self {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text, lines }
    }
}

impl TextLine {
    /// Build a line from elements, joining element texts with a space.
    pub fn from_elements(elements: Vec<TextElement>) -> Self {
        let text = elements
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, elements }
    }

    /// Split a line of text into whitespace-separated elements.
    pub fn from_words(text: &str) -> Self {
        Self {
            text: text.to_string(),
            elements: text.split_whitespace().map(TextElement::new).collect(),
        }
    }
}

impl TextElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_words() {
        let line = TextLine::from_words("Faktura  VAT 12/2024");
        assert_eq!(line.text, "Faktura  VAT 12/2024");
        assert_eq!(
            line.elements,
            vec![
                TextElement::new("Faktura"),
                TextElement::new("VAT"),
                TextElement::new("12/2024"),
            ]
        );
    }

    #[test]
    fn test_text_joins_upwards() {
        let block = TextBlock::from_lines(vec![
            TextLine::from_elements(vec![TextElement::new("Hello"), TextElement::new("world")]),
            TextLine::from_words("second line"),
        ]);
        assert_eq!(block.text, "Hello world\nsecond line");

        let tail = TextBlock::from_lines(vec![TextLine::from_words("end")]);
        let page = Text::from_blocks(vec![block, tail]);
        assert_eq!(page.text, "Hello world\nsecond line\nend");
        assert!(!page.is_empty());
    }

    #[test]
    fn test_deserialize_sparse_engine_payload() {
        let page: Text = serde_json::from_str(
            r#"{"blocks":[{"text":"A B","lines":[{"text":"A B"}]}]}"#,
        )
        .unwrap();
        assert_eq!(page.text, "");
        assert_eq!(page.blocks[0].lines[0].elements.len(), 0);
    }
}
