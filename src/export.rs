use anyhow::{Context, Result, anyhow};
use log::debug;
use std::fs;
use svg::Document;

/// Serializes a rendered document to an SVG file.
pub fn save_svg(document: &Document, path: &str) -> Result<()> {
    fs::write(path, document.to_string())
        .with_context(|| format!("Could not write SVG to '{path}'"))?;
    Ok(())
}

/// Rasterizes a rendered document to PNG bytes.
pub fn rasterize(document: &Document) -> Result<Vec<u8>> {
    let markup = document.to_string();
    let options = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_str(&markup, &options)
        .context("Could not parse rendered SVG for rasterization")?;
    let size = tree.size().to_int_size();
    debug!("rasterizing {}x{} px", size.width(), size.height());
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow!("Raster target has zero size"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    pixmap
        .encode_png()
        .context("Could not encode rasterized figure as PNG")
}

/// Rasterizes a rendered document and writes it as a PNG file.
pub fn save_png(document: &Document, path: &str) -> Result<()> {
    let png = rasterize(document)?;
    fs::write(path, png).with_context(|| format!("Could not write PNG to '{path}'"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TrackElement;
    use crate::figure::Figure;

    #[test]
    fn test_rasterize_produces_png() {
        let mut figure = Figure::new();
        figure.add(TrackElement::segment(0.0, 100.0).unwrap());
        let document = figure.show(None, None).unwrap();
        let png = rasterize(&document).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
