//! PNG output of a [`Grid`] through its display-color bitmap.

use pixgrid_core::{Grid, Pixel};
use std::path::Path;

use crate::error::CliError;

/// Writes any pixel grid as an RGBA PNG.
///
/// Returns `CliError::Io` if the dimensions overflow `u32` or the file
/// cannot be encoded or written.
pub fn write_png<T: Pixel>(grid: &Grid<T>, path: &Path) -> Result<(), CliError> {
    let w = u32::try_from(grid.width())
        .map_err(|_| CliError::Io(format!("width {} too large for PNG", grid.width())))?;
    let h = u32::try_from(grid.height())
        .map_err(|_| CliError::Io(format!("height {} too large for PNG", grid.height())))?;
    let img = image::RgbaImage::from_raw(w, h, grid.render_to_bitmap())
        .ok_or_else(|| CliError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    log::info!("wrote {}x{} snapshot to {}", w, h, path.display());
    Ok(())
}
