//! Bill loading.

use std::path::Path;

use super::{read_file, SetupError};
use crate::components::Bill;

const UNTITLED: &str = "Untitled Bill";

/// Load a bill from a text file. The id is the file stem and the title is
/// the first non-blank line.
pub fn load_bill(path: impl AsRef<Path>) -> Result<Bill, SetupError> {
    let path = path.as_ref();
    let raw = read_file(path)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SetupError::EmptyBill(path.to_path_buf()));
    }

    let title = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(UNTITLED);
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bill".to_string());

    Ok(Bill::new(id, title, raw))
}
