use std::fs;
use std::path::Path;
use std::process;

use anyhow::Context;
use owo_colors::OwoColorize;

use iconbake::{DropReason, ImportOptions, NormalizeOptions, import_directory, process_set};

/// Directory of source SVG files.
const SOURCE_DIR: &str = "svg/custom";
/// Namespace prefix of the generated set; also the output file name.
const PREFIX: &str = "custom";
/// Directory the icon-set JSON is written to.
const OUTPUT_DIR: &str = "output";

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut set = import_directory(
        SOURCE_DIR,
        &ImportOptions {
            prefix: PREFIX.into(),
        },
    )
    .with_context(|| format!("importing icons from {SOURCE_DIR}"))?;

    let report = process_set(&mut set, &NormalizeOptions::default());
    for dropped in &report.dropped {
        match &dropped.reason {
            DropReason::Unparsable => {
                eprintln!(
                    "{} removed invalid icon: {}",
                    "warning:".yellow().bold(),
                    dropped.name
                );
            }
            DropReason::Failed(err) => {
                eprintln!(
                    "{} failed to process {}: {err}",
                    "error:".red().bold(),
                    dropped.name
                );
            }
        }
    }

    let export = set.export();
    let mut json = serde_json::to_string_pretty(&export).context("serializing icon set")?;
    json.push('\n');

    fs::create_dir_all(OUTPUT_DIR)
        .with_context(|| format!("creating output directory {OUTPUT_DIR}"))?;
    let output_path = Path::new(OUTPUT_DIR).join(format!("{}.json", set.prefix()));
    fs::write(&output_path, json)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!(
        "exported {} icons to {}",
        set.icon_count(),
        output_path.display()
    );
    Ok(())
}
