use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::font_metrics::PageConfig;
use super::layout::LaidOutPage;
use super::ExportError;

/// Vertical offset from the top of a line slot to the text baseline, as a
/// fraction of the font size, on top of half the line height.
const BASELINE_FONT_FRACTION: f32 = 0.3;

/// Renders laid-out pages to PDF bytes with the built-in Helvetica font.
pub(super) fn render_pdf(
    title: &str,
    pages: &[LaidOutPage],
    config: &PageConfig,
) -> Result<Vec<u8>, ExportError> {
    let width = Mm(config.page_width_mm);
    let height = Mm(config.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(format!("{e:?}")))?;

    let x = Mm(config.margin_left_mm + config.cell_padding_mm);

    for (index, page) in pages.iter().enumerate() {
        let (page_ref, layer_ref) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Layer {}", index + 1))
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);

        for (slot, line) in page.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let from_top = config.margin_top_mm
                + slot as f32 * config.line_height_mm
                + config.line_height_mm / 2.0
                + BASELINE_FONT_FRACTION * config.font_size_mm();
            layer.use_text(
                line.as_str(),
                config.font_size_pt,
                x,
                Mm(config.page_height_mm - from_top),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Render(format!("{e:?}")))
}
