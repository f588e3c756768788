//! Legacy ASCII VTK polydata writer.
//!
//! Layout, in order: header and title, `DATASET POLYDATA`, a `POINTS` block (z fixed at 0),
//! one single-point `VERTICES` cell per particle, and a `POINT_DATA` block carrying the
//! `damage` scalar. Reals use fixed-point notation with six decimals.
use std::io::Write;

use mint::Vector2;

use crate::error::Result;
use crate::export::{check_aligned, FieldExporter};

pub const DEFAULT_TITLE: &str = "Peridynamic porous pre-damage";

/// Writes the legacy `# vtk DataFile Version 3.0` polydata format.
#[derive(Debug, Clone)]
pub struct VtkPolyDataExporter {
    /// Title line, written verbatim on the second line of the file.
    pub title: String,
}

impl Default for VtkPolyDataExporter {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

impl VtkPolyDataExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl FieldExporter for VtkPolyDataExporter {
    fn write_field(
        &self,
        points: &[Vector2<f64>],
        damage: &[f64],
        out: &mut dyn Write,
    ) -> Result<()> {
        check_aligned(points, damage)?;
        let n = points.len();

        writeln!(out, "# vtk DataFile Version 3.0")?;
        // A newline would shift every following section.
        writeln!(out, "{}", self.title.replace(['\n', '\r'], " "))?;
        writeln!(out, "ASCII")?;
        writeln!(out, "DATASET POLYDATA")?;

        writeln!(out, "POINTS {n} float")?;
        for p in points {
            writeln!(out, "{:.6} {:.6} {:.6}", p.x, p.y, 0.0)?;
        }

        writeln!(out, "VERTICES {} {}", n, 2 * n)?;
        for i in 0..n {
            writeln!(out, "1 {i}")?;
        }

        writeln!(out, "POINT_DATA {n}")?;
        writeln!(out, "SCALARS damage float 1")?;
        writeln!(out, "LOOKUP_TABLE default")?;
        for d in damage {
            writeln!(out, "{d:.6}")?;
        }

        Ok(())
    }
}
