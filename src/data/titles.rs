use super::aggregate::value_counts;
use super::model::{CellValue, Table};
use super::DataError;

/// Literal marker identifying the ship's captain in the Name column.
pub const CAPTAIN_MARKER: &str = ", Capt.";

// ---------------------------------------------------------------------------
// Title extraction
// ---------------------------------------------------------------------------

/// Pull the honorific out of a `"Surname, Honorific. Given names"` name.
///
/// The name is split on the first `", "`, the two halves are swapped and
/// joined with a space, and everything before the first `.` is kept:
///
/// ```text
/// "Braund, Mr. Owen Harris" → "Mr. Owen Harris Braund" → "Mr"
/// "Rothes, the Countess. of (Lucy ...)" → "the Countess"
/// "Smith, John"             → "John Smith"   (no dot: whole string)
/// ```
///
/// Names with no `", "` are used as-is before the dot split. Only the
/// pre-dot text is returned; the honorific word is not isolated further.
pub fn extract_title(name: &str) -> String {
    // Only the first ", " splits: "A, B, Dr. C" keeps "B, Dr", not "Dr".
    let reordered = match name.split_once(", ") {
        Some((surname, rest)) => format!("{rest} {surname}"),
        None => name.to_string(),
    };
    reordered
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Count extracted titles over the Name column and keep the `top_n` most
/// frequent, ties in first-appearance order. Null names count as `""`.
pub fn title_counts(table: &Table, top_n: usize) -> Result<Vec<(String, usize)>, DataError> {
    let names = table
        .column("Name")
        .ok_or_else(|| DataError::MissingColumn("Name".into()))?;

    let titles: Vec<CellValue> = names
        .values
        .iter()
        .map(|v| CellValue::Str(extract_title(v.as_str().unwrap_or_default())))
        .collect();

    let mut counts: Vec<(String, usize)> = value_counts(titles.iter())
        .into_iter()
        .map(|(title, n)| (title.to_string(), n))
        .collect();
    counts.truncate(top_n);
    Ok(counts)
}

/// Rows whose Name contains [`CAPTAIN_MARKER`] literally.
pub fn find_captains(table: &Table) -> Result<Vec<usize>, DataError> {
    let names = table
        .column("Name")
        .ok_or_else(|| DataError::MissingColumn("Name".into()))?;
    Ok(names
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.as_str().is_some_and(|s| s.contains(CAPTAIN_MARKER)))
        .map(|(i, _)| i)
        .collect())
}
