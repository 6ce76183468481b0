//! Tabular export of results.
//!
//! Writes CSV tables for the caller to persist:
//!
//! - [`write_ranked_summary`]: one row per item with its coverage count
//! - [`write_ranked_elements`]: one row per (item, element) pair
//! - [`write_combinations`]: one row per overlapping pair
//!
//! Header names follow the dataset's [`Columns`], so a `Drug`/`Target`
//! input produces `Drug`/`Target Count` output.

use crate::cover::{Combination, RankedItem};
use crate::dataset::Columns;
use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes `item, <element> Count` rows.
pub fn write_ranked_summary<W: Write>(
    ranked: &[RankedItem],
    columns: &Columns,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([columns.item.clone(), format!("{} Count", columns.element)])?;
    for item in ranked {
        wtr.write_record([item.item.as_str(), item.count.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one `item, element` row per covered element.
pub fn write_ranked_elements<W: Write>(
    ranked: &[RankedItem],
    columns: &Columns,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([columns.item.as_str(), columns.element.as_str()])?;
    for item in ranked {
        for element in &item.elements {
            wtr.write_record([item.item.as_str(), element.as_str()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `<item> A, <item> B, Shared Count, Shared` rows.
///
/// Shared elements are joined with `"; "` in a single cell.
pub fn write_combinations<W: Write>(
    combinations: &[Combination],
    columns: &Columns,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        format!("{} A", columns.item),
        format!("{} B", columns.item),
        "Shared Count".to_string(),
        "Shared".to_string(),
    ])?;
    for combo in combinations {
        wtr.write_record([
            combo.first.clone(),
            combo.second.clone(),
            combo.count.to_string(),
            combo.shared.join("; "),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the ranked summary table to `path`.
pub fn save_ranked_summary(
    ranked: &[RankedItem],
    columns: &Columns,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    write_ranked_summary(ranked, columns, std::fs::File::create(path)?)?;
    info!(path = %path.display(), rows = ranked.len(), "saved ranked items");
    Ok(())
}

/// Writes the combination table to `path`.
pub fn save_combinations(
    combinations: &[Combination],
    columns: &Columns,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    write_combinations(combinations, columns, std::fs::File::create(path)?)?;
    info!(path = %path.display(), rows = combinations.len(), "saved combinations");
    Ok(())
}
