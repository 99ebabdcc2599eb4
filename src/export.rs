//! The portable icon-set export document.
//!
//! Icons are stored in "body" form: the inner markup of the `<svg>` element,
//! with the viewBox carried as `left`/`top`/`width`/`height` fields. Fields
//! matching the format defaults are omitted.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::parse::parse_svg;
use crate::serialize::serialize_body;
use crate::set::{Entry, IconSet};

/// Serializable snapshot of an icon set.
#[derive(Debug, Clone, Serialize)]
pub struct IconSetExport {
    pub prefix: String,
    /// Optional set metadata; not populated by the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<SetInfo>,
    pub icons: BTreeMap<String, ExportedIcon>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, ExportedAlias>,
}

/// Set-level metadata (author/license/version extension point).
#[derive(Debug, Clone, Serialize)]
pub struct SetInfo {
    pub author: String,
    pub license: String,
    pub version: String,
}

/// One exported icon.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedIcon {
    pub body: String,
    #[serde(skip_serializing_if = "is_zero", serialize_with = "serialize_dim")]
    pub left: f64,
    #[serde(skip_serializing_if = "is_zero", serialize_with = "serialize_dim")]
    pub top: f64,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_dim")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_dim")]
    pub height: Option<f64>,
}

/// One exported alias.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedAlias {
    pub parent: String,
}

impl IconSetExport {
    /// Snapshot a collection. Entries whose markup no longer parses are
    /// skipped; after the transform step none should remain.
    pub fn from_set(set: &IconSet) -> Self {
        let mut icons = BTreeMap::new();
        let mut aliases = BTreeMap::new();

        for (name, entry) in set.entries() {
            match entry {
                Entry::Icon { source } => {
                    let Ok(svg) = parse_svg(source) else {
                        continue;
                    };
                    let body = serialize_body(&svg, true);

                    let (left, top) = match svg.view_box() {
                        Some(vb) => (vb.left, vb.top),
                        None => (0.0, 0.0),
                    };
                    let (width, height) = match svg.dimensions() {
                        Some((w, h)) => (Some(w), Some(h)),
                        None => (None, None),
                    };

                    icons.insert(
                        name.clone(),
                        ExportedIcon {
                            body,
                            left,
                            top,
                            width,
                            height,
                        },
                    );
                }
                Entry::Alias { parent } => {
                    aliases.insert(
                        name.clone(),
                        ExportedAlias {
                            parent: parent.clone(),
                        },
                    );
                }
            }
        }

        Self {
            prefix: set.prefix().to_string(),
            info: None,
            icons,
            aliases,
        }
    }
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// Whole-number dimensions serialize as integers (`24`, not `24.0`).
fn serialize_dim<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn serialize_opt_dim<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_dim(v, serializer),
        None => serializer.serialize_none(),
    }
}
