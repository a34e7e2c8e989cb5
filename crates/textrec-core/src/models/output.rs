//! Serializable payloads handed back to the host runtime.
//!
//! Field names are part of the wire contract with existing callers.

use serde::{Deserialize, Serialize};

use super::text::{Text, TextBlock, TextElement, TextLine};

/// One block of the hierarchical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub text_block: String,
    pub lines: Vec<LineInfo>,
}

/// One line of the hierarchical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    pub text_line: String,
    pub elements: Vec<ElementInfo>,
}

/// One element of the hierarchical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub text_element: String,
}

/// Payload of `recognize`.
pub type Hierarchy = Vec<BlockInfo>;

/// Payload of `recognize_flat`.
pub type FlatText = Vec<String>;

impl From<&TextElement> for ElementInfo {
    fn from(element: &TextElement) -> Self {
        Self {
            text_element: element.text.clone(),
        }
    }
}

impl From<&TextLine> for LineInfo {
    fn from(line: &TextLine) -> Self {
        Self {
            text_line: line.text.clone(),
            elements: line.elements.iter().map(ElementInfo::from).collect(),
        }
    }
}

impl From<&TextBlock> for BlockInfo {
    fn from(block: &TextBlock) -> Self {
        Self {
            text_block: block.text.clone(),
            lines: block.lines.iter().map(LineInfo::from).collect(),
        }
    }
}

/// Walk blocks, lines and elements in engine order.
pub fn to_hierarchy(text: &Text) -> Hierarchy {
    text.blocks.iter().map(BlockInfo::from).collect()
}

/// One string per top-level block, in engine order.
pub fn to_flat(text: &Text) -> FlatText {
    text.blocks.iter().map(|b| b.text.clone()).collect()
}
