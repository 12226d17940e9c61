use std::io::Cursor;
use std::path::Path;

use printpdf::image_crate::{self, DynamicImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};
use tracing::{debug, warn};

use super::layout::{
    layout_report, Align, Asset, AssetPresence, DrawOp, Labels, Page, ReportDocument,
    PAGE_HEIGHT, PAGE_WIDTH,
};
use super::text::text_width_mm;
use crate::core::config::PdfConfig;
use crate::core::error::AppError;

/// Resolution images are embedded at before scaling to their target box
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
const DEFAULT_LINE_WIDTH: f32 = 0.2;

/// Renders report documents to PDF bytes with `printpdf`
pub struct ReportPdfRenderer {
    config: PdfConfig,
}

struct LoadedAssets {
    logo: Option<DynamicImage>,
    signature: Option<DynamicImage>,
    font: Option<Vec<u8>>,
}

impl ReportPdfRenderer {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    pub fn labels(&self) -> Labels {
        Labels::new(&self.config.title, &self.config.currency)
    }

    /// Lay out and render `doc`. Blocking: call from `spawn_blocking`.
    pub fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>, AppError> {
        let assets = self.load_assets();
        let presence = AssetPresence {
            logo: assets.logo.is_some(),
            signature: assets.signature.is_some(),
        };
        let pages = layout_report(doc, &self.labels(), presence);

        let (pdf, first_page, first_layer) = PdfDocument::new(
            format!("report-{}", doc.id),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let font = self.font(&pdf, assets.font.as_deref())?;

        for (idx, page) in pages.iter().enumerate() {
            let layer = if idx == 0 {
                pdf.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_idx, layer_idx) =
                    pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                pdf.get_page(page_idx).get_layer(layer_idx)
            };
            draw_page(&layer, &font, page, &assets);
        }

        debug!("Rendered report {} into {} page(s)", doc.id, pages.len());

        pdf.save_to_bytes()
            .map_err(|e| AppError::Internal(format!("Failed to serialize PDF: {}", e)))
    }

    fn font(
        &self,
        pdf: &PdfDocumentReference,
        external: Option<&[u8]>,
    ) -> Result<IndirectFontRef, AppError> {
        if let Some(bytes) = external {
            match pdf.add_external_font(Cursor::new(bytes)) {
                Ok(font) => return Ok(font),
                Err(e) => warn!("Configured PDF font could not be loaded: {}", e),
            }
        }
        pdf.add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Internal(format!("Failed to load builtin font: {}", e)))
    }

    fn load_assets(&self) -> LoadedAssets {
        LoadedAssets {
            logo: self.config.logo_path.as_deref().and_then(load_image),
            signature: self.config.signature_path.as_deref().and_then(load_image),
            font: self
                .config
                .font_path
                .as_deref()
                .and_then(|path| read_asset(path, "font")),
        }
    }
}

fn read_asset(path: &Path, kind: &str) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("PDF {} '{}' unavailable: {}", kind, path.display(), e);
            None
        }
    }
}

fn load_image(path: &Path) -> Option<DynamicImage> {
    let bytes = read_asset(path, "image")?;
    match image_crate::load_from_memory(&bytes) {
        // Flatten alpha: PDF image XObjects are embedded as plain RGB
        Ok(img) => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        Err(e) => {
            warn!("PDF image '{}' could not be decoded: {}", path.display(), e);
            None
        }
    }
}

fn draw_page(layer: &PdfLayerReference, font: &IndirectFontRef, page: &Page, assets: &LoadedAssets) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                text,
                x,
                y,
                size,
                align,
            } => {
                if text.is_empty() {
                    continue;
                }
                let width = text_width_mm(text, *size);
                let left = match align {
                    Align::Left => *x,
                    Align::Center => *x - width / 2.0,
                    Align::Right => *x - width,
                };
                layer.use_text(text.as_str(), *size, Mm(left), Mm(flip(*y)), font);
            }
            DrawOp::Rect { x, y, w, h } => {
                layer.set_outline_thickness(DEFAULT_LINE_WIDTH);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x), Mm(flip(*y))), false),
                        (Point::new(Mm(*x + *w), Mm(flip(*y))), false),
                        (Point::new(Mm(*x + *w), Mm(flip(*y + *h))), false),
                        (Point::new(Mm(*x), Mm(flip(*y + *h))), false),
                    ],
                    is_closed: true,
                });
            }
            DrawOp::Rule {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => {
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x1), Mm(flip(*y1))), false),
                        (Point::new(Mm(*x2), Mm(flip(*y2))), false),
                    ],
                    is_closed: false,
                });
                layer.set_outline_thickness(DEFAULT_LINE_WIDTH);
            }
            DrawOp::Image { asset, x, y, w, h } => {
                let source = match asset {
                    Asset::Logo => assets.logo.as_ref(),
                    Asset::Signature => assets.signature.as_ref(),
                };
                if let Some(source) = source {
                    place_image(layer, source, *x, *y, *w, *h);
                }
            }
        }
    }
}

/// Scale an image into the (x, y, w, h) box, (x, y) being its top-left corner
fn place_image(layer: &PdfLayerReference, source: &DynamicImage, x: f32, y: f32, w: f32, h: f32) {
    let natural_w = source.width().max(1) as f32 * MM_PER_INCH / IMAGE_DPI;
    let natural_h = source.height().max(1) as f32 * MM_PER_INCH / IMAGE_DPI;

    Image::from_dynamic_image(source).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(flip(y + h))),
            scale_x: Some(w / natural_w),
            scale_y: Some(h / natural_h),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}

/// Top-left layout y to bottom-left PDF y
fn flip(y: f32) -> f32 {
    PAGE_HEIGHT - y
}
