//! Plain-text dump of side sets.
//!
//! For each set `i` and each cell slot `j < extent(i)` one line `i j k side` is
//! written per recorded side `k`, followed by a blank line after every cell
//! slot and two blank lines after every set:
//!
//! ```text
//! 0 0 0 3
//! <blank>
//! <blank>
//! <blank>
//! <blank>
//! ```

use crate::topology::side_sets::SideSets;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `side_sets` to `writer` in ascending set, cell and side order.
pub fn write_side_sets<W: Write>(writer: &mut W, side_sets: &SideSets) -> std::io::Result<()> {
    for set in 0..side_sets.num_sets() {
        let extent = side_sets.extent(set).map_err(std::io::Error::other)?;
        for cell in 0..extent {
            let sides = side_sets.sides(set, cell).map_err(std::io::Error::other)?;
            for (k, side) in sides.iter().enumerate() {
                writeln!(writer, "{set} {cell} {k} {side}")?;
            }
            writeln!(writer)?;
        }
        write!(writer, "\n\n")?;
    }
    Ok(())
}

/// Write `side_sets` to the file at `path`, replacing it.
pub fn write_side_sets_to_path(path: impl AsRef<Path>, side_sets: &SideSets) -> std::io::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_side_sets(&mut writer, side_sets)?;
    writer.flush()?;
    log::debug!("wrote {} side(s) to {}", side_sets.num_sides(), path.display());
    Ok(())
}
