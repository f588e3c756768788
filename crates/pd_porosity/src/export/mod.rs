//! Serialization of the particle positions and damage field.
//!
//! Exporters consume positions as `mint` vectors plus an index-aligned damage slice; they
//! never see the bond network. A failed export leaves the in-memory result untouched, so it
//! can be retried against another destination without recomputation.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mint::Vector2;
use tracing::info;

use crate::error::{Error, Result};
use crate::pipeline::PreDamageResult;

pub mod vtk;

pub use vtk::VtkPolyDataExporter;

/// Trait for writing a point cloud with a scalar damage field.
pub trait FieldExporter {
    fn write_field(
        &self,
        points: &[Vector2<f64>],
        damage: &[f64],
        out: &mut dyn Write,
    ) -> Result<()>;
}

/// Checks the exporter input contract: one damage value per point.
pub(crate) fn check_aligned(points: &[Vector2<f64>], damage: &[f64]) -> Result<()> {
    if points.len() != damage.len() {
        return Err(Error::Export(format!(
            "damage field has {} values for {} points",
            damage.len(),
            points.len()
        )));
    }
    Ok(())
}

/// Writes `result` to `out` with the given exporter.
pub fn export_result(
    exporter: &dyn FieldExporter,
    result: &PreDamageResult,
    out: &mut dyn Write,
) -> Result<()> {
    exporter.write_field(&result.lattice.positions_mint(), result.damage.values(), out)
}

/// Writes `result` to a file at `path`, creating or truncating it.
pub fn export_to_path(
    exporter: &dyn FieldExporter,
    result: &PreDamageResult,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    export_result(exporter, result, &mut writer)?;
    writer.flush()?;
    info!("Field written to {}.", path.display());
    Ok(())
}
