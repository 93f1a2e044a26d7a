//! Distance matrix export as CSV.

use std::io::Write;

use crate::distance::DistanceMatrix;
use crate::error::Result;

/// Write `matrix` as CSV: a header of 1-based item ids, then one row per
/// item led by its id. Diagonal cells are left empty.
pub fn write_matrix_csv<W: Write>(matrix: &DistanceMatrix, out: &mut W) -> Result<()> {
    for j in 0..matrix.len() {
        write!(out, ",{}", j + 1)?;
    }
    writeln!(out)?;
    for i in 0..matrix.len() {
        write!(out, "{}", i + 1)?;
        for cell in matrix.row(i) {
            match cell {
                Some(d) => write!(out, ",{d}")?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceBuilder;
    use crate::geometry::Point;
    use crate::item::{Item, Representation};

    #[test]
    fn csv_layout() {
        let items: Vec<Item> = [(0.0, 0.0), (3.0, 4.0), (0.0, 1.5)]
            .into_iter()
            .map(|c| Item::Point(Point::from(c)))
            .collect();
        let d = DistanceBuilder::default()
            .build(&items, Representation::Point)
            .unwrap();
        let mut buf = Vec::new();
        write_matrix_csv(&d.matrix, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ",1,2,3");
        assert_eq!(lines[1], "1,,5,1.5");
        assert!(lines[2].starts_with("2,5,,"));
        assert!(lines[3].ends_with(","));
        assert_eq!(lines.len(), 4);
    }
}
