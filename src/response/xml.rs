use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DavError;

/// One element of a multi-status document: the qualified tag name, the
/// ordered child elements and the directly contained text.
///
/// A conventional owned tree rather than sibling-pointer traversal; the
/// document order of children is preserved, which is what keeps record
/// emission left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Tag name with any namespace prefix stripped: `d:displayname` becomes
    /// `displayname`.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }
}

/// Parses an XML body into an element tree rooted at the document element.
/// Attributes are ignored; only tag structure and text matter for
/// canonicalization. An empty document yields an empty element.
pub fn parse_document(xml: &str) -> Result<Element, DavError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Synthetic root so the document element is handled like any other node.
    let mut stack: Vec<Element> = vec![Element::default()];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(Element::new(String::from_utf8_lossy(start.name().as_ref())));
            }
            Event::Empty(empty) => {
                let element = Element::new(String::from_utf8_lossy(empty.name().as_ref()));
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::Text(text) => {
                if let (Ok(unescaped), Some(node)) = (text.unescape(), stack.last_mut()) {
                    node.text.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::End(_) => {
                fold_top(&mut stack);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Elements left open by a truncated document fold back into their
    // parents instead of being dropped.
    while stack.len() > 1 {
        fold_top(&mut stack);
    }

    let root = stack.pop().unwrap_or_default();
    Ok(root.children.into_iter().next().unwrap_or_default())
}

fn fold_top(stack: &mut Vec<Element>) {
    if stack.len() > 1 {
        if let Some(done) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(done);
            }
        }
    }
}
