//! City page discovery and slug-to-label normalization

use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::types::CityPage;

const INDEX_FILE: &str = "index.html";
const STATE_SUFFIX: &str = "nc";

/// Find every city page under `dist_dir`, one per label, sorted by label.
///
/// Pages are either `<slug>.html` files or `<slug>/index.html` directories
/// nested below the root. Nothing directly in the root qualifies: the root
/// `index.html` is the statewide page and loose root files are ignored.
/// When two pages map to the same label, a directory-style `index.html`
/// replaces a flat file.
pub fn discover_city_pages(dist_dir: &Path) -> Result<Vec<CityPage>> {
    if !dist_dir.exists() {
        info!("{} does not exist, no city pages found", dist_dir.display());
        return Ok(Vec::new());
    }

    let mut discovered: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(dist_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dist_dir.display()))?;
        let path = entry.path();

        let is_html = entry.file_name().to_string_lossy().ends_with(".html");
        if entry.file_type().is_dir() || !is_html {
            continue;
        }

        let is_index = entry.file_name() == INDEX_FILE;

        if entry.depth() == 1 {
            if is_index {
                trace!("Skipping statewide page {}", path.display());
            } else {
                trace!("Skipping loose root file {}", path.display());
            }
            continue;
        }

        let slug = if is_index {
            path.parent().and_then(Path::file_name)
        } else {
            path.file_stem()
        };
        let Some(slug) = slug.map(OsStr::to_string_lossy) else {
            continue;
        };

        let label = slug_to_label(&slug);
        if is_index || !discovered.contains_key(&label) {
            debug!("{} -> {}", path.display(), label);
            discovered.insert(label, path.to_path_buf());
        } else {
            debug!("Skipping {}: {} already discovered", path.display(), label);
        }
    }

    let base = dist_dir.parent().unwrap_or(dist_dir);
    let pages = discovered
        .into_iter()
        .map(|(label, path)| -> Result<CityPage> {
            Ok(CityPage::new(label, rel_path(base, &path)?))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Discovered {} city pages in {}",
        pages.len(),
        dist_dir.display()
    );

    Ok(pages)
}

/// Convert a slug like "chapel-hill-nc" into "Chapel Hill, NC"
pub fn slug_to_label(slug: &str) -> String {
    let parts: Vec<&str> = slug.split('-').collect();

    match parts.split_last() {
        Some((last, rest)) if last.eq_ignore_ascii_case(STATE_SUFFIX) => {
            let city = rest.join(" ");
            if city.is_empty() {
                return "NC, NC".to_string();
            }
            format!("{}, NC", title_case(&city))
        }
        _ => title_case(&slug.replace('-', " ")),
    }
}

/// Upper-case the first letter of every run of cased letters, lower-case the rest.
///
/// Uncased letters (CJK, etc.) break a run like punctuation does. Digraphs such
/// as `ǆ` map to their upper-case form; there is no separate titlecase mapping.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if c.is_lowercase() || c.is_uppercase() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// POSIX-style path of `target` relative to `base`
pub fn rel_path(base: &Path, target: &Path) -> Result<String> {
    let relative = target.strip_prefix(base).with_context(|| {
        format!("{} is not under {}", target.display(), base.display())
    })?;

    Ok(relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
