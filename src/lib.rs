//! iconbake - bakes a directory of SVG icons into one icon-set JSON
//!
//! The pipeline imports a directory of SVG files, then normalizes every
//! icon: structural cleanup (namespaces, shape-to-path conversion), palette
//! normalization to the `currentColor` theming token, and a generic
//! optimization pass. Icons that fail any step are dropped from the set;
//! the survivors are exported as a single JSON document.

mod ast;
mod cleanup;
mod color;
mod error;
mod export;
mod import;
mod optimize;
mod parse;
mod path;
mod serialize;
mod set;

pub use ast::*;
pub use cleanup::*;
pub use color::*;
pub use error::*;
pub use export::*;
pub use import::*;
pub use optimize::*;
pub use parse::*;
pub use serialize::*;
pub use set::*;

use std::collections::BTreeMap;

/// Settings for the whole per-icon transform.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub cleanup: CleanupOptions,
    pub palette: PaletteOptions,
    pub optimize: OptimizeOptions,
}

/// Normalize a single icon in place: cleanup, recolor, optimize.
///
/// Re-entrant: normalizing an already normalized icon is byte-identical.
pub fn normalize_icon(svg: &mut Svg, options: &NormalizeOptions) -> Result<(), Error> {
    cleanup_svg(svg, &options.cleanup)?;

    // Visible paint becomes the theming token; transparent and
    // unclassifiable values stay as they are
    apply_palette(svg, &options.palette, |_attr, _raw, color| match color {
        Some(c) if !is_empty_color(c) => ColorChange::Replace(CURRENT_COLOR.into()),
        _ => ColorChange::Keep,
    });

    optimize(svg, &options.optimize)
}

/// Outcome of a [`process_set`] run.
#[derive(Debug)]
pub struct ProcessReport {
    /// Icons that were normalized and kept
    pub processed: usize,
    /// Entries removed from the collection, each recorded exactly once
    pub dropped: Vec<DroppedIcon>,
}

#[derive(Debug)]
pub struct DroppedIcon {
    pub name: String,
    pub reason: DropReason,
}

#[derive(Debug)]
pub enum DropReason {
    /// The entry had no parseable SVG document
    Unparsable,
    /// A transform step failed
    Failed(Error),
}

/// Normalize every icon in the collection. Iterates over a snapshot of the
/// entry names and swaps in the surviving entries atomically; one icon's
/// failure never aborts the batch. Non-icon entries pass through untouched.
pub fn process_set(set: &mut IconSet, options: &NormalizeOptions) -> ProcessReport {
    let mut survivors = BTreeMap::new();
    let mut report = ProcessReport {
        processed: 0,
        dropped: Vec::new(),
    };

    for name in set.names() {
        let Some(entry) = set.get(&name) else {
            continue;
        };
        if !entry.is_icon() {
            survivors.insert(name, entry.clone());
            continue;
        }

        let Some(mut svg) = set.to_svg(&name) else {
            report.dropped.push(DroppedIcon {
                name,
                reason: DropReason::Unparsable,
            });
            continue;
        };

        match normalize_icon(&mut svg, options) {
            Ok(()) => {
                let source = serialize_svg(&svg, options.optimize.sort_attrs);
                survivors.insert(name, Entry::Icon { source });
                report.processed += 1;
            }
            Err(err) => {
                report.dropped.push(DroppedIcon {
                    name,
                    reason: DropReason::Failed(err),
                });
            }
        }
    }

    set.set_entries(survivors);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_RECT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <rect x="2" y="2" width="20" height="20" fill="#ff0000"/>
</svg>"##;

    #[test]
    fn test_normalize_icon() {
        let mut svg = parse_svg(RED_RECT).unwrap();
        normalize_icon(&mut svg, &NormalizeOptions::default()).unwrap();
        let out = serialize_svg(&svg, true);

        assert!(!out.contains("<rect"));
        assert!(out.contains("<path"));
        assert!(out.contains(r#"fill="currentColor""#));
        assert!(out.contains(r#"viewBox="0 0 24 24""#));
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut svg = parse_svg(RED_RECT).unwrap();
        normalize_icon(&mut svg, &NormalizeOptions::default()).unwrap();
        let once = serialize_svg(&svg, true);

        let mut svg = parse_svg(&once).unwrap();
        normalize_icon(&mut svg, &NormalizeOptions::default()).unwrap();
        assert_eq!(serialize_svg(&svg, true), once);
    }

    #[test]
    fn test_process_set_drops_failures() {
        let mut set = IconSet::new("custom");
        set.insert_icon("good", RED_RECT);
        set.insert_icon("broken", "<svg><rect</svg>");
        set.insert_icon(
            "bad-geometry",
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="-1" height="1"/></svg>"#,
        );
        set.insert_alias("also-good", "good");

        let report = process_set(&mut set, &NormalizeOptions::default());

        assert_eq!(report.processed, 1);
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(set.icon_count(), 1);
        assert!(set.get("good").is_some());
        assert!(set.get("also-good").is_some());
        assert!(set.get("broken").is_none());
        assert!(set.get("bad-geometry").is_none());

        let broken = report
            .dropped
            .iter()
            .find(|d| d.name == "broken")
            .unwrap();
        assert!(matches!(broken.reason, DropReason::Unparsable));
        let bad = report
            .dropped
            .iter()
            .find(|d| d.name == "bad-geometry")
            .unwrap();
        assert!(matches!(bad.reason, DropReason::Failed(_)));
    }
}
