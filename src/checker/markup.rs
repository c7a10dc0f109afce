use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use thiserror::Error;

use crate::config::IndicatorConfig;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,
    #[error("failed to read markup: {0}")]
    Read(#[from] std::io::Error),
}

/// An element tag plus a class token that together mark a product as in stock,
/// e.g. `<span class="instock">`.
#[derive(Debug, Clone)]
pub struct Indicator {
    tag: String,
    class: String,
}

impl Indicator {
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
        }
    }

    pub fn from_config(config: &IndicatorConfig) -> Self {
        Self::new(config.tag.trim(), config.class.trim())
    }

    /// Parse `document` and report whether the indicator element occurs anywhere in it.
    pub fn is_present(&self, document: &str) -> Result<bool, ParseError> {
        if document.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut document.as_bytes())?;

        Ok(self.find(&dom.document))
    }

    fn find(&self, root: &Handle) -> bool {
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            if let NodeData::Element {
                ref name,
                ref attrs,
                ref template_contents,
                ..
            } = node.data
            {
                let tag: &str = &name.local;
                if tag.eq_ignore_ascii_case(&self.tag) && self.has_class(&attrs.borrow()) {
                    return true;
                }
                if let Some(contents) = template_contents.borrow().as_ref() {
                    stack.push(contents.clone());
                }
            }
            stack.extend(node.children.borrow().iter().cloned());
        }

        false
    }

    fn has_class(&self, attrs: &[html5ever::Attribute]) -> bool {
        attrs
            .iter()
            .filter(|attr| &*attr.name.local == "class")
            .any(|attr| attr.value.split_whitespace().any(|c| c == self.class))
    }
}
