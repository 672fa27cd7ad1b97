use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point,
};
use std::io::BufWriter;
use std::path::Path;

use super::layout::{FontStyle, Layout, Op, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::RenderError;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

/// 把版面绘制成 PDF 字节
pub fn paint(layout: &Layout) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(&layout.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    for (idx, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for op in &page.ops {
            match op {
                Op::Text {
                    text,
                    x,
                    y,
                    size,
                    style,
                    color: rgb,
                } => {
                    let font: &IndirectFontRef = match style {
                        FontStyle::Regular => &regular,
                        FontStyle::Bold => &bold,
                    };
                    layer.set_fill_color(color(*rgb));
                    layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font);
                }
                Op::Rule {
                    x1,
                    x2,
                    y,
                    thickness,
                    color: rgb,
                } => {
                    layer.set_outline_color(color(*rgb));
                    layer.set_outline_thickness(*thickness);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), Mm(*y)), false),
                            (Point::new(Mm(*x2), Mm(*y)), false),
                        ],
                        is_closed: false,
                    });
                }
                Op::Logo {
                    path,
                    x,
                    y,
                    width,
                    height,
                } => place_logo(&layer, path, *x, *y, *width, *height)?,
            }
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))
}

/// logo 等比缩放进 width × height 的框内，左下角对齐 (x, y)
fn place_logo(
    layer: &PdfLayerReference,
    path: &Path,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Result<(), RenderError> {
    if !path.is_file() {
        return Err(RenderError::LogoNotFound(path.to_path_buf()));
    }
    let decoded = printpdf::image_crate::open(path).map_err(|source| RenderError::Logo {
        path: path.to_path_buf(),
        source,
    })?;

    let (px_w, px_h) = decoded.dimensions();
    if px_w == 0 || px_h == 0 {
        return Ok(());
    }
    // dpi 决定实际尺寸：mm = px / dpi × 25.4，取两方向中更大的 dpi 以放进框内
    let dpi = (px_w as f32 * 25.4 / width).max(px_h as f32 * 25.4 / height);

    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}
