//! Stream compression for printpdf output
//!
//! printpdf writes its content streams uncompressed; the print context runs
//! the finished document through lopdf before handing it back.

use crate::error::SurfaceError;

/// Re-save `uncompressed` with every eligible stream Flate-compressed.
pub fn compress_pdf(uncompressed: &[u8]) -> Result<Vec<u8>, SurfaceError> {
    let mut doc = lopdf::Document::load_mem(uncompressed)
        .map_err(|e| SurfaceError::Formatter(format!("Failed to parse PDF for compression: {}", e)))?;

    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| SurfaceError::Formatter(format!("Failed to save compressed PDF: {}", e)))?;

    Ok(output)
}
