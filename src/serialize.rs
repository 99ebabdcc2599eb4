//! SVG serialization.
//!
//! Two forms: the full document, and the "body" form used by icon-set
//! exports — the root's children without the `<svg>` wrapper.

use crate::ast::*;

/// Serialize a full document to compact SVG text.
pub fn serialize_svg(svg: &Svg, sort_attrs: bool) -> String {
    let mut out = String::new();
    serialize_element(&mut out, &svg.root, sort_attrs);
    out
}

/// Serialize only the root's children — the icon body.
pub fn serialize_body(svg: &Svg, sort_attrs: bool) -> String {
    let mut out = String::new();
    for child in &svg.root.children {
        serialize_node(&mut out, child, sort_attrs);
    }
    out
}

fn serialize_element(out: &mut String, elem: &Element, sort_attrs: bool) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    let mut attrs: Vec<_> = elem.attributes.iter().collect();
    if sort_attrs {
        // xmlns declarations first, then lexicographic; deterministic output
        attrs.sort_by(|a, b| {
            let a_xmlns = a.name.is_xmlns();
            let b_xmlns = b.name.is_xmlns();
            match (a_xmlns, b_xmlns) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name.full_name().cmp(&b.name.full_name()),
            }
        });
    }

    for attr in attrs {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in &elem.children {
            serialize_node(out, child, sort_attrs);
        }
        out.push_str("</");
        out.push_str(&elem.name.full_name());
        out.push('>');
    }
}

fn serialize_node(out: &mut String, node: &Node, sort_attrs: bool) {
    match node {
        Node::Element(elem) => serialize_element(out, elem, sort_attrs),
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                push_escaped_text(out, trimmed);
            }
        }
        // Comments are stripped by optimization; never serialize stragglers
        Node::Comment(_) => {}
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
    }
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
