//! Generic SVG optimization passes.

use crate::ast::*;
use crate::color::COLOR_ATTRIBUTES;
use crate::error::Error;
use crate::path::{self, parse_path, serialize_path};

/// Optimizer configuration. The default enables the whole preset, keeps the
/// viewBox, and sorts attributes for deterministic output.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Decimal places for path coordinates
    pub precision: u8,
    /// Remove comment nodes
    pub remove_comments: bool,
    /// Remove metadata/title/desc and editor-specific markup
    pub remove_metadata: bool,
    /// Remove invisible elements
    pub remove_hidden: bool,
    /// Remove empty container elements
    pub remove_empty: bool,
    /// Collapse unnecessary groups
    pub collapse_groups: bool,
    /// Re-serialize path data compactly
    pub minify_paths: bool,
    /// Normalize color syntax (lowercase hex, 6-digit to 3-digit)
    pub minify_colors: bool,
    /// Remove attributes set to their default values
    pub remove_defaults: bool,
    /// Minify inline style attributes
    pub minify_styles: bool,
    /// Remove a viewBox that only restates width/height. Disabled: icon
    /// consumers rely on the viewBox surviving.
    pub remove_view_box: bool,
    /// Sort attributes when serializing
    pub sort_attrs: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            precision: path::DEFAULT_PRECISION,
            remove_comments: true,
            remove_metadata: true,
            remove_hidden: true,
            remove_empty: true,
            collapse_groups: true,
            minify_paths: true,
            minify_colors: true,
            remove_defaults: true,
            minify_styles: true,
            remove_view_box: false,
            sort_attrs: true,
        }
    }
}

/// Apply all enabled passes. Every pass is idempotent: optimizing an
/// already optimized document changes nothing.
pub fn optimize(svg: &mut Svg, options: &OptimizeOptions) -> Result<(), Error> {
    if options.remove_comments {
        remove_comments(&mut svg.root);
    }

    if options.remove_metadata {
        remove_metadata(&mut svg.root);
    }

    if options.remove_hidden {
        remove_hidden(&mut svg.root);
    }

    if options.remove_empty {
        remove_empty(&mut svg.root);
    }

    if options.collapse_groups {
        collapse_groups(&mut svg.root);
    }

    if options.minify_paths {
        minify_paths(&mut svg.root, options.precision)?;
    }

    if options.minify_colors {
        minify_colors(&mut svg.root);
    }

    if options.remove_defaults {
        remove_default_attrs(&mut svg.root);
    }

    if options.minify_styles {
        minify_styles(&mut svg.root);
    }

    if options.remove_view_box {
        remove_view_box(svg);
    }

    cleanup_whitespace(&mut svg.root);

    Ok(())
}

fn remove_comments(elem: &mut Element) {
    elem.children.retain(|node| !matches!(node, Node::Comment(_)));

    for child in elem.child_elements_mut() {
        remove_comments(child);
    }
}

/// Remove metadata, title, desc and editor-specific elements/attributes.
fn remove_metadata(elem: &mut Element) {
    const EDITOR_PREFIXES: [&str; 2] = ["sodipodi", "inkscape"];

    elem.children.retain(|node| {
        if let Node::Element(e) = node {
            !matches!(e.name.local.as_str(), "metadata" | "title" | "desc")
                && !e
                    .name
                    .prefix
                    .as_deref()
                    .is_some_and(|p| EDITOR_PREFIXES.contains(&p))
        } else {
            true
        }
    });

    elem.attributes.retain(|attr| {
        // ids may be referenced via url(#...) and are kept
        !attr
            .name
            .prefix
            .as_deref()
            .is_some_and(|p| EDITOR_PREFIXES.contains(&p))
            && attr.name.local != "data-name"
    });

    for child in elem.child_elements_mut() {
        remove_metadata(child);
    }
}

fn remove_hidden(elem: &mut Element) {
    elem.children.retain(|node| {
        if let Node::Element(e) = node {
            !is_hidden(e)
        } else {
            true
        }
    });

    for child in elem.child_elements_mut() {
        remove_hidden(child);
    }
}

fn is_hidden(elem: &Element) -> bool {
    if elem.get_attr("display") == Some("none") {
        return true;
    }
    if elem.get_attr("visibility") == Some("hidden") {
        return true;
    }
    if let Some(opacity) = elem.get_attr("opacity")
        && opacity.trim().parse::<f64>().ok() == Some(0.0)
    {
        return true;
    }
    if let Some(style) = elem.get_attr("style")
        && (style.contains("display:none") || style.contains("display: none"))
    {
        return true;
    }
    false
}

fn remove_empty(elem: &mut Element) {
    for child in elem.child_elements_mut() {
        remove_empty(child);
    }

    const CONTAINERS: [&str; 7] = ["g", "defs", "symbol", "marker", "clipPath", "mask", "pattern"];

    elem.children.retain(|node| {
        if let Node::Element(e) = node {
            if CONTAINERS.contains(&e.name.local.as_str()) {
                !e.children.is_empty() || e.get_attr("id").is_some()
            } else {
                true
            }
        } else {
            true
        }
    });
}

fn collapse_groups(elem: &mut Element) {
    for child in elem.child_elements_mut() {
        collapse_groups(child);
    }

    let mut new_children = Vec::new();
    for child in std::mem::take(&mut elem.children) {
        match child {
            Node::Element(mut e) if can_collapse_group(&e) => {
                new_children.append(&mut e.children);
            }
            other => new_children.push(other),
        }
    }
    elem.children = new_children;
}

fn can_collapse_group(elem: &Element) -> bool {
    if elem.name.local != "g" || elem.name.prefix.is_some() {
        return false;
    }
    // A group with an id may be referenced; a group with presentation
    // attributes still affects its children
    if !elem.attributes.is_empty() {
        return false;
    }
    elem.children.len() == 1
}

fn minify_paths(elem: &mut Element, precision: u8) -> Result<(), Error> {
    if elem.name.local == "path"
        && let Some(d) = elem.get_attr("d").map(|s| s.to_string())
    {
        let parsed = parse_path(&d)?;
        elem.set_attr("d", serialize_path(&parsed, precision));
    }

    for child in elem.child_elements_mut() {
        minify_paths(child, precision)?;
    }

    Ok(())
}

fn minify_colors(elem: &mut Element) {
    for attr in &mut elem.attributes {
        if COLOR_ATTRIBUTES.contains(&attr.name.local.as_str()) {
            attr.value = minify_color(&attr.value);
        }
    }

    if let Some(style) = elem.get_attr("style").map(|s| s.to_string()) {
        let minified = minify_style_colors(&style);
        if minified != style {
            elem.set_attr("style", minified);
        }
    }

    for child in elem.child_elements_mut() {
        minify_colors(child);
    }
}

/// Lowercase hex colors and shorten `#rrggbb` to `#rgb` where lossless.
fn minify_color(value: &str) -> String {
    let value = value.trim();
    let Some(hex) = value.strip_prefix('#') else {
        return value.to_string();
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return value.to_string();
    }

    let lower = hex.to_ascii_lowercase();
    if lower.len() == 6 {
        let b = lower.as_bytes();
        if b[0] == b[1] && b[2] == b[3] && b[4] == b[5] {
            return format!("#{}{}{}", b[0] as char, b[2] as char, b[4] as char);
        }
    }
    format!("#{}", lower)
}

fn minify_style_colors(style: &str) -> String {
    let mut parts = Vec::new();
    for decl in style.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        match decl.split_once(':') {
            Some((prop, value)) => {
                let prop = prop.trim();
                let value = value.trim();
                if COLOR_ATTRIBUTES.contains(&prop) {
                    parts.push(format!("{}:{}", prop, minify_color(value)));
                } else {
                    parts.push(format!("{}:{}", prop, value));
                }
            }
            None => parts.push(decl.to_string()),
        }
    }
    parts.join(";")
}

fn remove_default_attrs(elem: &mut Element) {
    elem.attributes
        .retain(|attr| !is_default_value(&elem.name.local, &attr.name.local, &attr.value));

    for child in elem.child_elements_mut() {
        remove_default_attrs(child);
    }
}

fn is_default_value(element: &str, attr: &str, value: &str) -> bool {
    match (element, attr, value) {
        (_, "version", "1.1") => true,
        (_, "baseProfile", "full") => true,
        (_, "preserveAspectRatio", "xMidYMid meet") => true,

        (_, "fill-opacity", "1") => true,
        (_, "stroke-opacity", "1") => true,
        (_, "opacity", "1") => true,
        (_, "stroke-width", "1") => true,
        (_, "stroke-linecap", "butt") => true,
        (_, "stroke-linejoin", "miter") => true,
        (_, "stroke-miterlimit", "4") => true,
        (_, "fill-rule", "nonzero") => true,
        (_, "clip-rule", "nonzero") => true,
        (_, "visibility", "visible") => true,
        (_, "display", "inline") => true,
        (_, "overflow", "visible") => true,

        _ => false,
    }
}

fn minify_styles(elem: &mut Element) {
    if let Some(style) = elem.get_attr("style").map(|s| s.to_string()) {
        let minified = minify_style(&style);
        if minified.is_empty() {
            elem.remove_attr("style");
        } else if minified != style {
            elem.set_attr("style", minified);
        }
    }

    for child in elem.child_elements_mut() {
        minify_styles(child);
    }
}

fn minify_style(style: &str) -> String {
    let mut parts = Vec::new();

    for decl in style.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim();
        let value = value.trim();
        if is_default_value("", prop, value) {
            continue;
        }
        parts.push(format!("{}:{}", prop, value));
    }

    parts.join(";")
}

/// Remove a viewBox that only restates the width/height attributes.
fn remove_view_box(svg: &mut Svg) {
    let Some(vb) = svg.view_box() else {
        return;
    };
    if vb.left != 0.0 || vb.top != 0.0 {
        return;
    }
    let width = svg.root.get_attr("width").map(|s| s.trim().to_string());
    let height = svg.root.get_attr("height").map(|s| s.trim().to_string());
    let (Some(width), Some(height)) = (width, height) else {
        return;
    };
    if width.parse::<f64>().ok() == Some(vb.width) && height.parse::<f64>().ok() == Some(vb.height)
    {
        svg.root.remove_attr("viewBox");
    }
}

fn cleanup_whitespace(elem: &mut Element) {
    elem.children.retain(|node| {
        if let Node::Text(text) = node {
            !text.trim().is_empty()
        } else {
            true
        }
    });

    for child in elem.child_elements_mut() {
        cleanup_whitespace(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;
    use crate::serialize::serialize_svg;

    fn run(input: &str) -> String {
        let mut svg = parse_svg(input).unwrap();
        optimize(&mut svg, &OptimizeOptions::default()).unwrap();
        serialize_svg(&svg, true)
    }

    #[test]
    fn test_editor_junk_removed() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     inkscape:version="1.0">
  <sodipodi:namedview inkscape:zoom="1"/>
  <title>icon</title>
  <path d="M0 0z"/>
</svg>"#,
        );
        assert!(!out.contains("inkscape:version"));
        assert!(!out.contains("sodipodi:namedview"));
        assert!(!out.contains("<title>"));
    }

    #[test]
    fn test_hidden_and_empty_removed() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path display="none" d="M0 0z"/><g/><path d="M1 1z"/></svg>"#,
        );
        assert!(!out.contains("display"));
        assert!(!out.contains("<g"));
        assert!(out.contains(r#"d="M1 1z""#));
    }

    #[test]
    fn test_single_child_group_collapsed() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><path d="M0 0z"/></g><g fill="red"><path d="M1 1z"/></g></svg>"#,
        );
        // bare group goes, group with attributes stays
        assert_eq!(out.matches("<g").count(), 1);
    }

    #[test]
    fn test_paths_minified() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 10.5000 20.25000 L 30.00 40.00 Z"/></svg>"#,
        );
        assert!(out.contains(r#"d="M10.5 20.25 30 40z""#));
    }

    #[test]
    fn test_bad_path_is_an_error() {
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 10"/></svg>"#,
        )
        .unwrap();
        assert!(optimize(&mut svg, &OptimizeOptions::default()).is_err());
    }

    #[test]
    fn test_colors_minified() {
        let out = run(
            r##"<svg xmlns="http://www.w3.org/2000/svg"><path fill="#FFFFFF" stroke="#AABBCD" d="M0 0z"/></svg>"##,
        );
        assert!(out.contains(r##"fill="#fff""##));
        assert!(out.contains(r##"stroke="#aabbcd""##));
    }

    #[test]
    fn test_defaults_removed() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1"><path fill-opacity="1" opacity="1" d="M0 0z"/></svg>"#,
        );
        assert!(!out.contains("version"));
        assert!(!out.contains("opacity"));
    }

    #[test]
    fn test_view_box_preserved_by_default() {
        let out = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M0 0z"/></svg>"#,
        );
        assert!(out.contains(r#"viewBox="0 0 24 24""#));
    }

    #[test]
    fn test_view_box_pass_when_enabled() {
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M0 0z"/></svg>"#,
        )
        .unwrap();
        let options = OptimizeOptions {
            remove_view_box: true,
            ..OptimizeOptions::default()
        };
        optimize(&mut svg, &options).unwrap();
        assert_eq!(svg.root.get_attr("viewBox"), None);
    }

    #[test]
    fn test_optimize_idempotent() {
        let input = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><!-- x --><g><path d="M 1.5000 2.25 L 3 4 Z" fill="#FFFFFF" style="stroke-width: 1; fill-opacity: 0.5"/></g></svg>"##;
        let mut svg = parse_svg(input).unwrap();
        optimize(&mut svg, &OptimizeOptions::default()).unwrap();
        let once = serialize_svg(&svg, true);

        let mut svg = parse_svg(&once).unwrap();
        optimize(&mut svg, &OptimizeOptions::default()).unwrap();
        assert_eq!(serialize_svg(&svg, true), once);
    }
}
