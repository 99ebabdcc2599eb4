//! SVG parsing from XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::Error;

/// Parse an SVG string into an [`Svg`] document.
///
/// XML declarations, DOCTYPEs, processing instructions and anything else
/// outside the root element are discarded. The root element must be `<svg>`.
pub fn parse_svg(svg: &str) -> Result<Svg, Error> {
    let mut reader = Reader::from_str(svg);

    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start)?);
                break;
            }
            // Prolog content icons never keep
            Event::Decl(_) | Event::DocType(_) | Event::PI(_) => {}
            Event::Comment(_) | Event::Text(_) => {}
            Event::Eof => break,
            _ => {}
        }
    }

    let root: Element = root.ok_or_else(|| Error::InvalidSvg("empty document".into()))?;
    if root.name.local != "svg" {
        return Err(Error::NotAnSvg(root.name.full_name()));
    }

    Ok(Svg { root })
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, Error> {
    let mut element = parse_element_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start)?));
            }
            Event::End(_) => break,
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() || !element.children.is_empty() {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(_) => {}
            Event::Eof => {
                return Err(Error::InvalidSvg("unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart) -> Result<Element, Error> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::InvalidSvg(format!("invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_icon() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
    <rect x="2" y="2" width="20" height="20" fill="red"/>
</svg>"#;

        let doc = parse_svg(svg).unwrap();
        assert!(doc.root.is("svg"));
        assert_eq!(doc.root.get_attr("viewBox"), Some("0 0 24 24"));
        assert_eq!(doc.root.child_elements().count(), 1);
    }

    #[test]
    fn test_parse_discards_prolog() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0h24v24H0z"/></svg>"#;

        let doc = parse_svg(svg).unwrap();
        assert!(doc.root.is("svg"));
    }

    #[test]
    fn test_parse_rejects_non_svg_root() {
        let err = parse_svg("<html><body/></html>").unwrap_err();
        assert!(matches!(err, Error::NotAnSvg(name) if name == "html"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            parse_svg("   "),
            Err(Error::InvalidSvg(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_svg("<svg><rect</svg>").is_err());
        assert!(parse_svg("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_parse_namespaced_attrs() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
    <use xlink:href="#shape"/>
</svg>"##;

        let doc = parse_svg(svg).unwrap();
        let ns = doc.root.namespaces();
        assert!(ns.contains_key(&None));
        assert!(ns.contains_key(&Some("xlink")));
    }
}
