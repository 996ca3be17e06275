//! PNG rasterization through resvg.

use std::path::Path;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::RenderError;

/// Renders `svg` into a `width x height` PNG at `path`.
///
/// `font` is registered with the font database under its own family name,
/// which must match the family the SVG asks for.
pub fn write_png(
    svg: &str,
    font: Option<&[u8]>,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), RenderError> {
    let mut options = Options::default();
    if let Some(data) = font {
        options.fontdb_mut().load_font_data(data.to_vec());
    }
    let tree = Tree::from_str(svg, &options).map_err(|err| RenderError::Svg {
        reason: err.to_string(),
    })?;
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    pixmap.save_png(path).map_err(|err| RenderError::Png {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_fills_the_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.png");
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect x="0" y="0" width="40" height="20" fill="#7b73b5"/></svg>"##;

        write_png(svg, None, 40, 20, &path).unwrap();

        let image = Pixmap::load_png(&path).unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));
        let pixel = image.pixel(5, 5).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x7b, 0x73, 0xb5));
    }

    #[test]
    fn zero_sized_canvases_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        assert!(matches!(
            write_png(svg, None, 0, 10, &dir.path().join("x.png")),
            Err(RenderError::Canvas { .. })
        ));
    }

    #[test]
    fn malformed_svg_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_png("<svg", None, 10, 10, &dir.path().join("x.png")),
            Err(RenderError::Svg { .. })
        ));
    }
}
