//! Typed HTML builder
//!
//! Documents are assembled as a tree of elements, attributes and text and
//! serialized once. Text and attribute values are escaped on output, so
//! labels, option values and URLs never need escaping at the call site.

use std::fmt::Write as _;

const VOID_ELEMENTS: [&str; 6] = ["input", "meta", "br", "hr", "link", "img"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Contents of `<style>` / `<script>`; written unescaped apart from
    /// closing-tag sequences
    Raw(String),
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrValue {
    Value(String),
    Flag,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, AttrValue)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, AttrValue::Value(value.into())));
        self
    }

    pub fn attr_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    /// Boolean attribute (`required`, `checked`, `hidden`, ...)
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, AttrValue::Flag));
        self
    }

    pub fn flag_if(self, condition: bool, name: &'static str) -> Self {
        if condition {
            self.flag(name)
        } else {
            self
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn child_opt(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(n) => self.child(n),
            None => self,
        }
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn raw(self, content: impl Into<String>) -> Self {
        self.child(Node::Raw(content.into()))
    }

    /// Value of the first attribute with this name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find_map(|(n, v)| match v {
            AttrValue::Value(s) if *n == name => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.attrs
            .iter()
            .any(|(n, v)| *n == name && matches!(v, AttrValue::Flag))
    }

    /// Depth-first iterator over this element and all descendants
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in &self.children {
            if let Node::Element(el) = child {
                out.extend(el.descendants());
            }
        }
        out
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let AttrValue::Value(v) = value {
                let _ = write!(out, "=\"{}\"", escape_attr(v));
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Element(el) => el.write_to(out),
                Node::Text(text) => out.push_str(&escape_text(text)),
                Node::Raw(raw) => out.push_str(&guard_raw(raw)),
            }
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// A complete HTML document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    lang: &'static str,
    head: Vec<Node>,
    body: Vec<Node>,
}

impl Document {
    pub fn new(lang: &'static str) -> Self {
        Self {
            lang,
            head: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn head(mut self, node: impl Into<Node>) -> Self {
        self.head.push(node.into());
        self
    }

    pub fn body(mut self, node: impl Into<Node>) -> Self {
        self.body.push(node.into());
        self
    }

    pub fn render(&self) -> String {
        let head = Element::new("head").children(self.head.iter().cloned());
        let body = Element::new("body").children(self.body.iter().cloned());
        let html = Element::new("html")
            .attr("lang", self.lang)
            .child(head)
            .child(body);

        let mut out = String::from("<!DOCTYPE html>\n");
        html.write_to(&mut out);
        out.push('\n');
        out
    }
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Raw text may not close its own `<style>`/`<script>` element early
fn guard_raw(s: &str) -> String {
    s.replace("</", "<\\/")
}
