//! Persistence: render a recipe as indented JSON and write `<title>.json`.
//!
//! The same rendering feeds both the stdout echo and the file on disk, so
//! what the user sees is byte-for-byte what gets written. Output is UTF-8
//! with 4-space indentation; an existing file with the same title is
//! silently overwritten.

use crate::error::ExtractError;
use crate::recipe::Recipe;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render a recipe as 4-space-indented JSON bytes.
pub fn render(recipe: &Recipe) -> Result<Vec<u8>, ExtractError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    recipe.serialize(&mut ser)?;
    Ok(buf)
}

/// Write `recipe` to `<title>.json` under `out_dir`, overwriting any
/// existing file of that name.
pub fn write_recipe(recipe: &Recipe, out_dir: &Path) -> Result<PathBuf, ExtractError> {
    let path = out_dir.join(format!("{}.json", recipe.title));
    let bytes = render(recipe)?;
    std::fs::write(&path, &bytes).map_err(|e| ExtractError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;
    info!("wrote {}", path.display());
    Ok(path)
}
