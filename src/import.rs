//! Directory import: a file-system tree of SVG files becomes an icon set.

use std::fs;
use std::path::Path;

use ignore::WalkBuilder;

use crate::error::Error;
use crate::set::IconSet;

/// Import settings.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Namespace prefix for the imported collection.
    pub prefix: String,
}

/// Read every `*.svg` file under `dir` into an icon set, one entry per
/// file, named after the file stem. Fails when `dir` is missing or
/// unreadable; individual files are read eagerly and propagate IO errors.
pub fn import_directory(dir: impl AsRef<Path>, options: &ImportOptions) -> Result<IconSet, Error> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Import(format!(
            "{} is not a readable directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkBuilder::new(dir).git_ignore(false).build() {
        let entry = entry.map_err(|e| Error::Import(e.to_string()))?;
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            files.push(path.to_path_buf());
        }
    }
    // Walk order is unspecified; sort so duplicate names resolve the same
    // way every run
    files.sort();

    let mut set = IconSet::new(options.prefix.clone());
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = icon_keyword(stem);
        if name.is_empty() {
            continue;
        }
        let source = fs::read_to_string(&path)?;
        set.insert_icon(name, source);
    }

    Ok(set)
}

/// Derive an icon name from a file stem: lowercase, separators become `-`,
/// anything else outside `[a-z0-9-]` is dropped, runs of `-` collapse.
fn icon_keyword(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());

    for c in stem.chars() {
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            'A'..='Z' => out.push(c.to_ascii_lowercase()),
            ' ' | '\t' | '_' | '.' | '-' => {
                if !out.is_empty() && !out.ends_with('-') {
                    out.push('-');
                }
            }
            _ => {}
        }
    }

    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_icon_keyword() {
        assert_eq!(icon_keyword("arrow-left"), "arrow-left");
        assert_eq!(icon_keyword("Arrow Left"), "arrow-left");
        assert_eq!(icon_keyword("home_24.filled"), "home-24-filled");
        assert_eq!(icon_keyword("--weird--"), "weird");
        assert_eq!(icon_keyword("héllo"), "hllo");
        assert_eq!(icon_keyword("***"), "");
    }

    #[test]
    fn test_import_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Foo Bar.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("baz.SVG"), "<svg/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/qux.svg"), "<svg/>").unwrap();

        let set = import_directory(
            dir.path(),
            &ImportOptions {
                prefix: "custom".into(),
            },
        )
        .unwrap();

        assert_eq!(set.prefix(), "custom");
        assert_eq!(set.names(), vec!["baz", "foo-bar", "qux"]);
    }

    #[test]
    fn test_import_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(import_directory(
            &missing,
            &ImportOptions {
                prefix: "custom".into()
            }
        )
        .is_err());
    }
}
