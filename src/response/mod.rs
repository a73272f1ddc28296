//! Normalization of the two wire shapes a server may answer with: a
//! hierarchical multi-status XML document or a flat `key:value` text
//! fallback. Both convert into one canonical ordered tree and re-serialize
//! into the other encoding.

pub mod xml;

use serde_json::Value;

use crate::error::DavError;

pub use xml::Element;

/// Canonical record: an insertion-ordered map from local (namespace-stripped)
/// tag name to either a nested record or a leaf string.
pub type Record = serde_json::Map<String, Value>;

/// Status line wrapped around plain-payload properties.
pub const OK_STATUS: &str = "HTTP/1.1 200 OK";

/// Delimiter between alternating keys and values in the plain fallback body.
pub const PAIR_DELIMITER: char = ':';

/// A server response in either wire shape, selected once at construction.
/// Payloads are immutable; the canonical tree is a derived view recomputed
/// on demand, and none of the conversions fail.
#[derive(Debug, Clone)]
pub enum ResponsePayload {
    Structured(StructuredPayload),
    Plain(PlainPayload),
}

impl ResponsePayload {
    /// Picks the variant from the response content type: XML bodies become
    /// structured payloads, everything else is treated as delimited text.
    pub fn from_body(content_type: Option<&str>, body: String) -> Result<Self, DavError> {
        let is_xml = content_type.map(|ct| ct.contains("xml")).unwrap_or(false);
        if is_xml {
            Ok(Self::Structured(StructuredPayload::parse(&body)?))
        } else {
            Ok(Self::Plain(PlainPayload::new(body)))
        }
    }

    /// Canonical ordered tree, one record per top-level node.
    pub fn canonicalize(&self) -> Vec<Record> {
        match self {
            Self::Structured(payload) => payload.canonicalize(),
            Self::Plain(payload) => payload.canonicalize(),
        }
    }

    /// Raw wire form of the payload.
    pub fn to_text(&self) -> String {
        match self {
            Self::Structured(payload) => payload.to_text(),
            Self::Plain(payload) => payload.to_text(),
        }
    }

    /// Canonical tree rendered as JSON text, insertion order preserved.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.canonicalize()).unwrap_or_default()
    }

    /// Re-serializes the payload as a structured multi-status fragment, so
    /// either shape can stand in wherever a document is required.
    pub fn to_document_fragment(&self) -> StructuredPayload {
        match self {
            Self::Structured(payload) => payload.clone(),
            Self::Plain(payload) => payload.to_document_fragment(),
        }
    }
}

/// Hierarchical multi-status document: ordered record nodes, each holding
/// ordered, possibly namespaced property nodes.
#[derive(Debug, Clone)]
pub struct StructuredPayload {
    raw: String,
    root: Element,
}

impl StructuredPayload {
    /// Parses the XML body once; the resulting tree is immutable.
    pub fn parse(body: &str) -> Result<Self, DavError> {
        let root = xml::parse_document(body)?;
        Ok(Self {
            raw: body.to_string(),
            root,
        })
    }

    fn from_parts(raw: String, root: Element) -> Self {
        Self { raw, root }
    }

    /// Document element of the parsed tree.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// One record per top-level node, in document order. Namespace prefixes
    /// are stripped; same-named siblings at one level collapse with the last
    /// one winning.
    pub fn canonicalize(&self) -> Vec<Record> {
        self.root
            .children
            .iter()
            .map(|record| build_record(&record.children))
            .collect()
    }

    pub fn to_text(&self) -> String {
        self.raw.clone()
    }
}

fn build_record(nodes: &[Element]) -> Record {
    let mut record = Record::new();
    for node in nodes {
        let value = if node.children.is_empty() {
            Value::String(node.text.clone())
        } else {
            Value::Object(build_record(&node.children))
        };
        record.insert(node.local_name().to_string(), value);
    }
    record
}

/// Flat delimited-text fallback: alternating key/value tokens describing a
/// single implicit record.
#[derive(Debug, Clone)]
pub struct PlainPayload {
    raw: String,
}

impl PlainPayload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    // An odd trailing token has no value and is dropped.
    fn pairs(&self) -> Vec<(&str, &str)> {
        let tokens: Vec<&str> = self.raw.split(PAIR_DELIMITER).collect();
        tokens
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    /// Single record wrapped in the fixed propstat envelope.
    pub fn canonicalize(&self) -> Vec<Record> {
        let mut prop = Record::new();
        for (key, value) in self.pairs() {
            prop.insert(key.to_string(), Value::String(value.to_string()));
        }

        let mut propstat = Record::new();
        propstat.insert("status".to_string(), Value::String(OK_STATUS.to_string()));
        propstat.insert("prop".to_string(), Value::Object(prop));

        let mut record = Record::new();
        record.insert("propstat".to_string(), Value::Object(propstat));
        vec![record]
    }

    pub fn to_text(&self) -> String {
        self.raw.clone()
    }

    /// Renders the pairs as a minimal multi-status fragment. Canonicalizing
    /// the fragment reproduces [`PlainPayload::canonicalize`] exactly.
    pub fn to_document_fragment(&self) -> StructuredPayload {
        let mut rendered = String::new();
        let mut prop_nodes = Vec::new();
        for (key, value) in self.pairs() {
            rendered.push_str(&format!(
                "<{key}>{}</{key}>",
                quick_xml::escape::escape(value)
            ));
            let mut node = Element::new(key);
            node.text = value.to_string();
            prop_nodes.push(node);
        }

        let raw = format!(
            "<multistatus xmlns=\"DAV:\"><response><propstat>\
             <status>{OK_STATUS}</status><prop>{rendered}</prop>\
             </propstat></response></multistatus>"
        );

        let mut status = Element::new("status");
        status.text = OK_STATUS.to_string();
        let mut prop = Element::new("prop");
        prop.children = prop_nodes;
        let mut propstat = Element::new("propstat");
        propstat.children = vec![status, prop];
        let mut response = Element::new("response");
        response.children = vec![propstat];
        let mut root = Element::new("multistatus");
        root.children = vec![response];

        StructuredPayload::from_parts(raw, root)
    }
}
