// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-backed XML element tree
//!
//! Elements are stored in document order (pre-order) and addressed by
//! [`NodeId`] handles. Because children are always pushed after their parent,
//! the descendants of a node form the contiguous id range
//! `id + 1 .. subtree_end`, so subtree searches are plain range scans.
//!
//! Handles compare by identity: two elements with identical content are still
//! two different nodes.

use crate::error::{Error, Result};
use crate::schema::QName;
use quick_xml::encoding::Decoder;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::path::Path;

/// Decode raw name or text bytes in the document's encoding
#[inline]
fn decode(decoder: Decoder, bytes: &[u8]) -> Result<Cow<'_, str>> {
    decoder
        .decode(bytes)
        .map_err(|e| Error::XmlParse(e.to_string()))
}

/// Identity handle of an element within one [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single XML element
#[derive(Debug, Clone)]
pub struct Element {
    namespace: Option<u32>,
    local_name: String,
    text: String,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    /// One past the last descendant id
    subtree_end: u32,
}

impl Element {
    /// Local (unprefixed) element name
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Direct character content (text and CDATA), unescaped, not trimmed
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Parsed XML document
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Element>,
    namespaces: Vec<String>,
    namespace_ids: FxHashMap<String, u32>,
}

impl Document {
    /// Read and parse a document from disk
    ///
    /// The file is read as bytes and decoded according to its byte order
    /// mark or XML declaration, so `encoding="ISO-8859-1"` files load as-is.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_bytes(&bytes)
    }

    /// Parse a document from XML text
    pub fn parse(content: &str) -> Result<Self> {
        Self::read(NsReader::from_str(content))
    }

    /// Parse a document from raw bytes in the encoding they declare
    ///
    /// Without a byte order mark or `encoding` attribute the input is UTF-8.
    pub fn parse_bytes(content: &[u8]) -> Result<Self> {
        Self::read(NsReader::from_reader(content))
    }

    fn read(mut reader: NsReader<&[u8]>) -> Result<Self> {
        let mut doc = Document::default();
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            // Taken before each event: the declaration may switch encodings
            let decoder = reader.decoder();
            match reader.read_resolved_event()? {
                (ns, Event::Start(e)) => {
                    let namespace = doc.resolve_namespace(ns, decoder)?;
                    let local_name = decode(decoder, e.local_name().into_inner())?;
                    let id = doc.push_element(namespace, &local_name, open.last().copied())?;
                    open.push(id);
                }
                (ns, Event::Empty(e)) => {
                    let namespace = doc.resolve_namespace(ns, decoder)?;
                    let local_name = decode(decoder, e.local_name().into_inner())?;
                    let id = doc.push_element(namespace, &local_name, open.last().copied())?;
                    doc.close(id);
                }
                (_, Event::End(_)) => {
                    let id = open
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unexpected closing tag".to_string()))?;
                    doc.close(id);
                }
                (_, Event::Text(t)) => {
                    if let Some(&id) = open.last() {
                        let text = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        doc.nodes[id.index()].text.push_str(&text);
                    }
                }
                (_, Event::CData(c)) => {
                    if let Some(&id) = open.last() {
                        let text = decode(decoder, &c)?;
                        doc.nodes[id.index()].text.push_str(&text);
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if let Some(&id) = open.last() {
            return Err(Error::XmlParse(format!(
                "unclosed element <{}>",
                doc.nodes[id.index()].local_name
            )));
        }
        if doc.nodes.is_empty() {
            return Err(Error::XmlParse("no root element found".to_string()));
        }

        Ok(doc)
    }

    fn resolve_namespace(&mut self, ns: ResolveResult<'_>, decoder: Decoder) -> Result<Option<u32>> {
        match ns {
            ResolveResult::Bound(ns) => {
                let uri = decode(decoder, ns.into_inner())?;
                Ok(Some(self.intern_namespace(&uri)))
            }
            ResolveResult::Unbound => Ok(None),
            ResolveResult::Unknown(prefix) => Err(Error::XmlParse(format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ))),
        }
    }

    fn intern_namespace(&mut self, uri: &str) -> u32 {
        if let Some(&id) = self.namespace_ids.get(uri) {
            return id;
        }
        let id = self.namespaces.len() as u32;
        self.namespaces.push(uri.to_string());
        self.namespace_ids.insert(uri.to_string(), id);
        id
    }

    fn push_element(
        &mut self,
        namespace: Option<u32>,
        local_name: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let raw = u32::try_from(self.nodes.len())
            .map_err(|_| Error::XmlParse("too many elements".to_string()))?;
        let id = NodeId(raw);

        self.nodes.push(Element {
            namespace,
            local_name: local_name.to_string(),
            text: String::new(),
            parent,
            children: SmallVec::new(),
            subtree_end: raw + 1,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        Ok(id)
    }

    #[inline]
    fn close(&mut self, id: NodeId) {
        self.nodes[id.index()].subtree_end = self.nodes.len() as u32;
    }

    /// Root element (always present in a successfully parsed document)
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }

    /// Namespace URI of an element, if it is bound to one
    #[inline]
    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()]
            .namespace
            .map(|ns| self.namespaces[ns as usize].as_str())
    }

    #[inline]
    pub fn text(&self, id: NodeId) -> &str {
        self.nodes[id.index()].text()
    }

    /// Check whether an element has the given qualified name
    #[inline]
    pub fn is(&self, id: NodeId, name: QName) -> bool {
        let element = &self.nodes[id.index()];
        element.local_name == name.local && self.namespace(id) == Some(name.namespace)
    }

    /// All elements in document order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// All descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let end = self.nodes[id.index()].subtree_end;
        (id.0 + 1..end).map(NodeId)
    }

    /// Every element below the root with the given name, in document order
    ///
    /// The root element itself never matches.
    pub fn find_all(&self, name: QName) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().skip(1).filter(move |&id| self.is(id, name))
    }

    /// Descendants of `id` with the given name, in document order
    pub fn find_descendants(&self, id: NodeId, name: QName) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(move |&d| self.is(d, name))
    }

    /// First descendant of `id` with the given name
    pub fn find_first_descendant(&self, id: NodeId, name: QName) -> Option<NodeId> {
        self.find_descendants(id, name).next()
    }
}
