use crate::content::sections::section_end;

/// A heading found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1 through 4
    pub level: u8,

    /// Whitespace-collapsed heading text
    pub text: String,

    /// Value of the `id` attribute, empty if absent
    pub anchor_id: String,

    /// URL of the page the heading was found on
    pub source_url: String,
}

/// Element kinds that contribute content blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    ListItem,
    TableCell,
}

impl BlockKind {
    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "td" | "th" => Some(Self::TableCell),
            _ => None,
        }
    }
}

/// A text block from the main content region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: BlockKind,

    /// Block text, longer than the minimum block length
    pub text: String,

    /// Index of the closest heading before this block, if any
    pub section: Option<usize>,
}

/// Structured content of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub url: String,
    pub title: String,

    /// h1..h4 headings in document order
    pub headings: Vec<Heading>,

    /// Content blocks in document order
    pub blocks: Vec<ContentBlock>,

    /// Plain text of the main content region
    pub text: String,
}

impl ParsedPage {
    /// Text of the blocks under heading `index`, including its sub-sections
    ///
    /// The section runs until the next heading at the same or a higher level.
    /// Returns an empty string if the section holds no blocks.
    pub fn section_text(&self, index: usize) -> String {
        if index >= self.headings.len() {
            return String::new();
        }
        let end = section_end(&self.headings, index);

        self.blocks
            .iter()
            .filter(|block| block.section.is_some_and(|s| s >= index && s < end))
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
