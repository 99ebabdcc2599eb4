//! In-memory model of an SVG icon document.

use std::collections::HashMap;

/// A parsed SVG icon. The root element is always `<svg>`.
///
/// XML declarations, DOCTYPEs and processing instructions are not modeled:
/// icon documents never carry them forward.
#[derive(Debug, Clone)]
pub struct Svg {
    pub root: Element,
}

/// An element in the icon tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// A qualified name, e.g. `rect` or `xlink:href`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A node in the icon tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

/// The `viewBox` rectangle of an icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Parse `prefix:local` or a plain local name.
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self::new(s),
        }
    }

    /// Is this a namespace declaration (`xmlns` or `xmlns:prefix`)?
    pub fn is_xmlns(&self) -> bool {
        self.prefix.as_deref() == Some("xmlns") || (self.prefix.is_none() && self.local == "xmlns")
    }

    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            value: value.into(),
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Get an attribute value by local name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same local name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.local == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by local name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|a| a.name.local != name);
    }

    /// Remove an attribute by local name and return its value.
    pub fn take_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|a| a.name.local == name)?;
        Some(self.attributes.remove(idx).value)
    }

    /// Namespace declarations on this element, keyed by prefix.
    pub fn namespaces(&self) -> HashMap<Option<&str>, &str> {
        let mut ns = HashMap::new();
        for attr in &self.attributes {
            if attr.name.prefix.is_none() && attr.name.local == "xmlns" {
                ns.insert(None, attr.value.as_str());
            } else if attr.name.prefix.as_deref() == Some("xmlns") {
                ns.insert(Some(attr.name.local.as_str()), attr.value.as_str());
            }
        }
        ns
    }

    /// Iterate over child elements, skipping text and other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }
}

impl Svg {
    /// Visit every element in document order.
    pub fn for_each_element(&self, mut f: impl FnMut(&Element)) {
        fn visit(elem: &Element, f: &mut impl FnMut(&Element)) {
            f(elem);
            for child in elem.child_elements() {
                visit(child, f);
            }
        }
        visit(&self.root, &mut f);
    }

    /// Visit every element mutably in document order.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        fn visit(elem: &mut Element, f: &mut impl FnMut(&mut Element)) {
            f(elem);
            for child in elem.child_elements_mut() {
                visit(child, f);
            }
        }
        visit(&mut self.root, &mut f);
    }

    /// The root `viewBox`, if present and well-formed.
    pub fn view_box(&self) -> Option<ViewBox> {
        ViewBox::parse(self.root.get_attr("viewBox")?)
    }

    /// Icon dimensions: from the viewBox, falling back to `width`/`height`
    /// attributes. `None` when neither yields usable numbers.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        if let Some(vb) = self.view_box() {
            return Some((vb.width, vb.height));
        }
        let width = parse_length(self.root.get_attr("width")?)?;
        let height = parse_length(self.root.get_attr("height")?)?;
        Some((width, height))
    }
}

impl ViewBox {
    /// Parse `min-x min-y width height`. Width and height must be positive.
    pub fn parse(s: &str) -> Option<Self> {
        let mut numbers = s
            .split([' ', '\t', '\n', '\r', ','])
            .filter(|part| !part.is_empty())
            .map(str::parse::<f64>);

        let left = numbers.next()?.ok()?;
        let top = numbers.next()?.ok()?;
        let width = numbers.next()?.ok()?;
        let height = numbers.next()?.ok()?;
        if numbers.next().is_some() {
            return None;
        }
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            left,
            top,
            width,
            height,
        })
    }
}

/// Parse a length attribute, tolerating a `px` suffix. Other units are
/// not meaningful for icons and yield `None`.
fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s);
    let value: f64 = s.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
