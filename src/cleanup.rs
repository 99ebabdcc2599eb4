//! Structural cleanup of imported icons.
//!
//! Runs before palette normalization and optimization: canonicalizes
//! namespace declarations and replaces basic shape primitives with
//! equivalent path data.

use std::collections::HashSet;

use crate::ast::*;
use crate::error::Error;
use crate::path::{
    self, circle_path, ellipse_path, line_path, poly_path, rect_path, serialize_path,
};

/// The core SVG namespace URI.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Cleanup settings.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Drop prefixed declarations of the SVG namespace (unprefixing their
    /// users) and declarations repeating an inherited URI.
    pub remove_redundant_namespaces: bool,
    /// Drop `xmlns:*` declarations whose prefix is never used.
    pub remove_unused_namespaces: bool,
    /// Replace rect/circle/ellipse/line/polyline/polygon with `<path>`.
    pub convert_shapes_to_paths: bool,
    /// Decimal places for generated path data.
    pub precision: u8,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            remove_redundant_namespaces: true,
            remove_unused_namespaces: true,
            convert_shapes_to_paths: true,
            precision: path::DEFAULT_PRECISION,
        }
    }
}

/// Apply structural cleanup to a parsed icon.
pub fn cleanup_svg(svg: &mut Svg, options: &CleanupOptions) -> Result<(), Error> {
    if options.remove_redundant_namespaces {
        unprefix_svg_namespace(svg);
        // Canonical default declaration on the root, then inherited
        // re-declarations below it become droppable
        svg.root.set_attr("xmlns", SVG_NAMESPACE);
        remove_redeclarations(&mut svg.root, &mut Vec::new());
    }

    if options.remove_unused_namespaces {
        remove_unused_namespaces(svg);
    }

    if options.convert_shapes_to_paths {
        convert_shapes(&mut svg.root, options.precision)?;
    }

    Ok(())
}

/// Prefixed declarations of the core SVG namespace are redundant: strip the
/// prefix from every element and attribute using them, then drop the
/// declarations themselves.
fn unprefix_svg_namespace(svg: &mut Svg) {
    let mut prefixes: HashSet<String> = HashSet::new();
    svg.for_each_element(|elem| {
        for attr in &elem.attributes {
            if attr.name.prefix.as_deref() == Some("xmlns") && attr.value == SVG_NAMESPACE {
                prefixes.insert(attr.name.local.clone());
            }
        }
    });
    if prefixes.is_empty() {
        return;
    }

    svg.for_each_element_mut(|elem| {
        elem.attributes.retain(|attr| {
            !(attr.name.prefix.as_deref() == Some("xmlns") && prefixes.contains(&attr.name.local))
        });
        if let Some(prefix) = &elem.name.prefix
            && prefixes.contains(prefix)
        {
            elem.name.prefix = None;
        }
        for attr in &mut elem.attributes {
            if let Some(prefix) = &attr.name.prefix
                && prefix != "xmlns"
                && prefixes.contains(prefix)
            {
                attr.name.prefix = None;
            }
        }
    });
}

/// Drop namespace declarations that repeat an identical inherited one.
fn remove_redeclarations(elem: &mut Element, scope: &mut Vec<(Option<String>, String)>) {
    elem.attributes.retain(|attr| {
        if !attr.name.is_xmlns() {
            return true;
        }
        let key = attr.name.prefix.as_ref().map(|_| attr.name.local.clone());
        let inherited = scope
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, uri)| uri.as_str());
        inherited != Some(attr.value.as_str())
    });

    let mut pushed = 0;
    for attr in &elem.attributes {
        if attr.name.is_xmlns() {
            let key = attr.name.prefix.as_ref().map(|_| attr.name.local.clone());
            scope.push((key, attr.value.clone()));
            pushed += 1;
        }
    }

    for child in elem.child_elements_mut() {
        remove_redeclarations(child, scope);
    }

    scope.truncate(scope.len() - pushed);
}

/// Drop `xmlns:prefix` declarations whose prefix no element or attribute
/// uses. The default declaration is always kept.
fn remove_unused_namespaces(svg: &mut Svg) {
    let mut used: HashSet<String> = HashSet::new();
    svg.for_each_element(|elem| {
        if let Some(prefix) = &elem.name.prefix {
            used.insert(prefix.clone());
        }
        for attr in &elem.attributes {
            if let Some(prefix) = &attr.name.prefix
                && prefix != "xmlns"
            {
                used.insert(prefix.clone());
            }
        }
    });

    svg.for_each_element_mut(|elem| {
        elem.attributes.retain(|attr| {
            attr.name.prefix.as_deref() != Some("xmlns") || used.contains(&attr.name.local)
        });
    });
}

fn convert_shapes(elem: &mut Element, precision: u8) -> Result<(), Error> {
    if elem.name.prefix.is_none() {
        let path = match elem.name.local.as_str() {
            "rect" => Some(convert_rect(elem)?),
            "circle" => Some(convert_circle(elem)?),
            "ellipse" => Some(convert_ellipse(elem)?),
            "line" => Some(convert_line(elem)?),
            "polyline" => Some(convert_poly(elem, false)?),
            "polygon" => Some(convert_poly(elem, true)?),
            _ => None,
        };
        if let Some(path) = path {
            elem.name = QName::new("path");
            elem.set_attr("d", serialize_path(&path, precision));
        }
    }

    for child in elem.child_elements_mut() {
        convert_shapes(child, precision)?;
    }

    Ok(())
}

fn convert_rect(elem: &mut Element) -> Result<path::Path, Error> {
    let x = shape_number(elem.take_attr("x"), "x", 0.0)?;
    let y = shape_number(elem.take_attr("y"), "y", 0.0)?;
    let width = shape_number(elem.take_attr("width"), "width", 0.0)?;
    let height = shape_number(elem.take_attr("height"), "height", 0.0)?;
    if width < 0.0 || height < 0.0 {
        return Err(Error::InvalidSvg("rect with negative size".into()));
    }

    // Per the rect geometry rules: a missing radius borrows the other one
    let rx_attr = elem.take_attr("rx").filter(|v| v.trim() != "auto");
    let ry_attr = elem.take_attr("ry").filter(|v| v.trim() != "auto");
    let rx = shape_number(rx_attr.clone(), "rx", 0.0)?;
    let ry = shape_number(ry_attr.clone(), "ry", 0.0)?;
    let (rx, ry) = match (rx_attr.is_some(), ry_attr.is_some()) {
        (true, false) => (rx, rx),
        (false, true) => (ry, ry),
        _ => (rx, ry),
    };
    if rx < 0.0 || ry < 0.0 {
        return Err(Error::InvalidSvg("rect with negative corner radius".into()));
    }

    Ok(rect_path(x, y, width, height, rx, ry))
}

fn convert_circle(elem: &mut Element) -> Result<path::Path, Error> {
    let cx = shape_number(elem.take_attr("cx"), "cx", 0.0)?;
    let cy = shape_number(elem.take_attr("cy"), "cy", 0.0)?;
    let r = shape_number(elem.take_attr("r"), "r", 0.0)?;
    if r < 0.0 {
        return Err(Error::InvalidSvg("circle with negative radius".into()));
    }
    Ok(circle_path(cx, cy, r))
}

fn convert_ellipse(elem: &mut Element) -> Result<path::Path, Error> {
    let cx = shape_number(elem.take_attr("cx"), "cx", 0.0)?;
    let cy = shape_number(elem.take_attr("cy"), "cy", 0.0)?;
    let rx = shape_number(elem.take_attr("rx"), "rx", 0.0)?;
    let ry = shape_number(elem.take_attr("ry"), "ry", 0.0)?;
    if rx < 0.0 || ry < 0.0 {
        return Err(Error::InvalidSvg("ellipse with negative radius".into()));
    }
    Ok(ellipse_path(cx, cy, rx, ry))
}

fn convert_line(elem: &mut Element) -> Result<path::Path, Error> {
    let x1 = shape_number(elem.take_attr("x1"), "x1", 0.0)?;
    let y1 = shape_number(elem.take_attr("y1"), "y1", 0.0)?;
    let x2 = shape_number(elem.take_attr("x2"), "x2", 0.0)?;
    let y2 = shape_number(elem.take_attr("y2"), "y2", 0.0)?;
    Ok(line_path(x1, y1, x2, y2))
}

fn convert_poly(elem: &mut Element, close: bool) -> Result<path::Path, Error> {
    let points = elem.take_attr("points").unwrap_or_default();
    let numbers: Result<Vec<f64>, Error> = points
        .split([' ', '\t', '\n', '\r', ','])
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidSvg(format!("invalid point: {}", part)))
        })
        .collect();
    let numbers = numbers?;

    if numbers.len() % 2 != 0 {
        return Err(Error::InvalidSvg("odd number of polygon coordinates".into()));
    }

    let pairs: Vec<(f64, f64)> = numbers.chunks(2).map(|c| (c[0], c[1])).collect();
    Ok(poly_path(&pairs, close))
}

fn shape_number(value: Option<String>, name: &str, default: f64) -> Result<f64, Error> {
    let Some(value) = value else {
        return Ok(default);
    };
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidSvg(format!("invalid {}: {}", name, value)))?;
    if !parsed.is_finite() {
        return Err(Error::InvalidSvg(format!("invalid {}: {}", name, value)));
    }
    Ok(parsed)
}
