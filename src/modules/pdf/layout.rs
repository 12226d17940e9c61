//! Page layout for report exports.
//!
//! Coordinates are millimeters on an A4 page measured from the top-left
//! corner, y growing downwards. The renderer flips them for PDF space.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::text::wrap_text;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const TITLE_SIZE: f32 = 16.0;
pub const BODY_SIZE: f32 = 12.0;
const TITLE_Y: f32 = 20.0;

const LOGO_X: f32 = 160.0;
const LOGO_Y: f32 = 10.0;
const LOGO_SIZE: f32 = 30.0;

const LINE_HEIGHT: f32 = 6.0;
/// Horizontal room lost to cell borders when wrapping
const CELL_PADDING: f32 = 4.0;
/// Distance from a cell's right edge to right-aligned text
const TEXT_INSET: f32 = 2.0;
/// Baseline of the first text line below a row's top edge
const FIRST_BASELINE: f32 = 5.0;

const HEADER_TOP: f32 = 45.0;
const HEADER_X: f32 = 10.0;
const HEADER_VALUE_WIDTH: f32 = 130.0;
const HEADER_LABEL_WIDTH: f32 = 60.0;

const SECTION_GAP: f32 = 5.0;
const SECTION_RULE_WIDTH: f32 = 0.8;
const SECTION_RULE_START: f32 = 10.0;
const SECTION_RULE_END: f32 = 200.0;

const COL_TOTAL: f32 = 50.0;
const COL_QUANTITY: f32 = 30.0;
const COL_COST: f32 = 30.0;
const COL_DESCRIPTION: f32 = 70.0;
pub const TABLE_WIDTH: f32 = COL_TOTAL + COL_QUANTITY + COL_COST + COL_DESCRIPTION;

/// Rows continue on a new page once the cursor passes this line
pub const PAGE_BOTTOM: f32 = 270.0;
pub const CONTINUATION_TOP: f32 = 20.0;

const GRAND_TOTAL_GAP: f32 = 8.0;
const GRAND_TOTAL_X: f32 = 190.0;

const SIGNATURE_WIDTH: f32 = 30.0;
const SIGNATURE_HEIGHT: f32 = 15.0;
const SIGNATURE_BOTTOM_MARGIN: f32 = 10.0;
const SIGNATURE_CAPTION_OFFSET: f32 = 8.0;
const SIGNATURE_RULE_OFFSET: f32 = 3.0;
const SIGNATURE_RULE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Logo,
    Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
    },
    /// Stroked rectangle; (x, y) is the top-left corner
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
    Image {
        asset: Asset,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Everything printed on an exported report
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub supervisor: String,
    pub police_report: String,
    pub street: String,
    pub state: String,
    pub location: String,
    pub coordinates: String,
    pub notes: String,
    pub lines: Vec<DocumentLine>,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct DocumentLine {
    pub description: String,
    pub cost: Decimal,
    pub quantity: Decimal,
    pub line_total: Decimal,
}

/// Static texts printed on the form
#[derive(Debug, Clone)]
pub struct Labels {
    pub title: String,
    pub currency: String,
    pub report_number: String,
    pub date: String,
    pub supervisor: String,
    pub police_report: String,
    pub street: String,
    pub state: String,
    pub location: String,
    pub coordinates: String,
    pub notes: String,
    pub description: String,
    pub cost: String,
    pub quantity: String,
    pub line_total: String,
    pub grand_total: String,
    pub no_damages: String,
}

impl Labels {
    pub fn new(title: &str, currency: &str) -> Self {
        Self {
            title: title.to_string(),
            currency: currency.to_string(),
            report_number: "Report No.".to_string(),
            date: "Date".to_string(),
            supervisor: "Supervisor / Engineer".to_string(),
            police_report: "Police Reference No.".to_string(),
            street: "Street Name".to_string(),
            state: "State".to_string(),
            location: "Incident Location".to_string(),
            coordinates: "Coordinates".to_string(),
            notes: "Notes".to_string(),
            description: "Description".to_string(),
            cost: "Cost".to_string(),
            quantity: "Quantity".to_string(),
            line_total: "Total".to_string(),
            grand_total: "Grand Total".to_string(),
            no_damages: "No damages recorded".to_string(),
        }
    }
}

/// Which optional images are available to the renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetPresence {
    pub logo: bool,
    pub signature: bool,
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, align: Align) {
        self.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size: BODY_SIZE,
            align,
        });
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = CONTINUATION_TOP;
    }
}

/// Lay out a report into pages of draw operations
pub fn layout_report(doc: &ReportDocument, labels: &Labels, assets: AssetPresence) -> Vec<Page> {
    let mut cursor = Cursor {
        pages: vec![Page::default()],
        y: HEADER_TOP,
    };

    if assets.logo {
        cursor.push(DrawOp::Image {
            asset: Asset::Logo,
            x: LOGO_X,
            y: LOGO_Y,
            w: LOGO_SIZE,
            h: LOGO_SIZE,
        });
    }
    cursor.push(DrawOp::Text {
        text: labels.title.clone(),
        x: PAGE_WIDTH / 2.0,
        y: TITLE_Y,
        size: TITLE_SIZE,
        align: Align::Center,
    });

    for (label, value) in header_rows(doc, labels) {
        header_row(&mut cursor, &label, &value);
        if cursor.y > PAGE_BOTTOM {
            cursor.new_page();
        }
    }

    cursor.y += SECTION_GAP;
    cursor.push(DrawOp::Rule {
        x1: SECTION_RULE_START,
        y1: cursor.y,
        x2: SECTION_RULE_END,
        y2: cursor.y,
        thickness: SECTION_RULE_WIDTH,
    });
    cursor.y += SECTION_GAP;

    if doc.lines.is_empty() {
        let y = cursor.y + 4.0;
        cursor.text(labels.no_damages.clone(), PAGE_WIDTH / 2.0, y, Align::Center);
        cursor.y += GRAND_TOTAL_GAP;
    } else {
        item_row(
            &mut cursor,
            &labels.description,
            &labels.cost,
            &labels.quantity,
            &labels.line_total,
        );
        for line in &doc.lines {
            item_row(
                &mut cursor,
                &line.description,
                &format!("{:.2}", line.cost),
                &line.quantity.normalize().to_string(),
                &format!("{:.2}", line.line_total),
            );
            if cursor.y > PAGE_BOTTOM {
                cursor.new_page();
            }
        }
        cursor.y += GRAND_TOTAL_GAP;
        let y = cursor.y;
        cursor.text(
            format!("{}: {}{:.2}", labels.grand_total, labels.currency, doc.total),
            GRAND_TOTAL_X,
            y,
            Align::Right,
        );
    }

    if assets.signature {
        signature_block(&mut cursor, &labels.supervisor);
    }

    cursor.pages
}

fn header_rows(doc: &ReportDocument, labels: &Labels) -> Vec<(String, String)> {
    vec![
        (labels.report_number.clone(), doc.id.to_string()),
        (
            labels.date.clone(),
            doc.created_at.format("%d/%m/%Y").to_string(),
        ),
        (labels.supervisor.clone(), doc.supervisor.clone()),
        (labels.police_report.clone(), doc.police_report.clone()),
        (labels.street.clone(), doc.street.clone()),
        (labels.state.clone(), doc.state.clone()),
        (labels.location.clone(), doc.location.clone()),
        (labels.coordinates.clone(), doc.coordinates.clone()),
        (labels.notes.clone(), doc.notes.clone()),
    ]
}

/// Value cell on the left, label cell on the right; height follows the taller cell
fn header_row(cursor: &mut Cursor, label: &str, value: &str) {
    let label_lines = wrap_text(label, HEADER_LABEL_WIDTH - CELL_PADDING, BODY_SIZE);
    let value_lines = wrap_text(value, HEADER_VALUE_WIDTH - CELL_PADDING, BODY_SIZE);
    let row_height = label_lines.len().max(value_lines.len()) as f32 * LINE_HEIGHT;
    let top = cursor.y;

    cursor.push(DrawOp::Rect {
        x: HEADER_X,
        y: top,
        w: HEADER_VALUE_WIDTH,
        h: row_height,
    });
    cursor.push(DrawOp::Rect {
        x: HEADER_X + HEADER_VALUE_WIDTH,
        y: top,
        w: HEADER_LABEL_WIDTH,
        h: row_height,
    });

    let label_x = HEADER_X + HEADER_VALUE_WIDTH + HEADER_LABEL_WIDTH - TEXT_INSET;
    for (idx, line) in label_lines.into_iter().enumerate() {
        cursor.text(line, label_x, baseline(top, idx), Align::Right);
    }
    let value_x = HEADER_X + HEADER_VALUE_WIDTH - TEXT_INSET;
    for (idx, line) in value_lines.into_iter().enumerate() {
        cursor.text(line, value_x, baseline(top, idx), Align::Right);
    }

    cursor.y += row_height;
}

/// Columns left to right: total, quantity, cost, description
fn item_row(cursor: &mut Cursor, description: &str, cost: &str, quantity: &str, total: &str) {
    let start_x = table_start_x();
    let desc_lines = wrap_text(description, COL_DESCRIPTION - CELL_PADDING, BODY_SIZE);
    let row_height = desc_lines.len().max(1) as f32 * LINE_HEIGHT;
    let top = cursor.y;
    let middle = top + row_height / 2.0 + 2.0;

    let columns = [
        (COL_TOTAL, Some(total)),
        (COL_QUANTITY, Some(quantity)),
        (COL_COST, Some(cost)),
        (COL_DESCRIPTION, None),
    ];

    let mut x = start_x;
    for (width, cell) in columns {
        cursor.push(DrawOp::Rect {
            x,
            y: top,
            w: width,
            h: row_height,
        });
        if let Some(text) = cell {
            cursor.text(text, x + width - TEXT_INSET, middle, Align::Right);
        }
        x += width;
    }

    let desc_x = start_x + TABLE_WIDTH - TEXT_INSET;
    for (idx, line) in desc_lines.into_iter().enumerate() {
        cursor.text(line, desc_x, baseline(top, idx), Align::Right);
    }

    cursor.y += row_height;
}

/// Caption, signing rule and signature image pinned to the bottom of the last page
fn signature_block(cursor: &mut Cursor, caption: &str) {
    let center_x = PAGE_WIDTH / 2.0;
    let sig_x = center_x - SIGNATURE_WIDTH / 2.0;
    let sig_y = PAGE_HEIGHT - SIGNATURE_HEIGHT - SIGNATURE_BOTTOM_MARGIN;

    cursor.text(
        caption,
        center_x,
        sig_y - SIGNATURE_CAPTION_OFFSET,
        Align::Center,
    );
    let rule_y = sig_y - SIGNATURE_RULE_OFFSET;
    cursor.push(DrawOp::Rule {
        x1: sig_x,
        y1: rule_y,
        x2: sig_x + SIGNATURE_WIDTH,
        y2: rule_y,
        thickness: SIGNATURE_RULE_WIDTH,
    });
    cursor.push(DrawOp::Image {
        asset: Asset::Signature,
        x: sig_x,
        y: sig_y,
        w: SIGNATURE_WIDTH,
        h: SIGNATURE_HEIGHT,
    });
}

fn table_start_x() -> f32 {
    (PAGE_WIDTH - TABLE_WIDTH) / 2.0
}

fn baseline(top: f32, line_idx: usize) -> f32 {
    top + FIRST_BASELINE + line_idx as f32 * LINE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn document(lines: usize) -> ReportDocument {
        ReportDocument {
            id: 7,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
            supervisor: "Eng. Salim".to_string(),
            police_report: "PR-2291".to_string(),
            street: "Sultan Qaboos St".to_string(),
            state: "Muscat".to_string(),
            location: "Near exit 12".to_string(),
            coordinates: "23.5880, 58.3829".to_string(),
            notes: String::new(),
            lines: (0..lines)
                .map(|_| DocumentLine {
                    description: "asphalt patch".to_string(),
                    cost: Decimal::new(125, 1),
                    quantity: Decimal::new(40000, 4),
                    line_total: Decimal::from(50),
                })
                .collect(),
            total: Decimal::from(50 * lines as i64),
        }
    }

    fn labels() -> Labels {
        Labels::new("Damage Assessment Form", "OMR")
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn text_y(page: &Page, needle: &str) -> Option<f32> {
        page.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }

    #[test]
    fn test_single_page_report() {
        let pages = layout_report(&document(1), &labels(), AssetPresence::default());
        assert_eq!(pages.len(), 1);

        let texts = texts(&pages[0]);
        assert!(texts.contains(&"Damage Assessment Form"));
        assert!(texts.contains(&"7"));
        assert!(texts.contains(&"14/03/2026"));
        assert!(texts.contains(&"12.50"));
        assert!(texts.contains(&"4"));
        assert!(texts.contains(&"50.00"));
        assert!(texts.contains(&"Grand Total: OMR50.00"));
    }

    #[test]
    fn test_header_block_rows_are_six_mm_each() {
        let pages = layout_report(&document(1), &labels(), AssetPresence::default());
        // 9 single-line header rows from y=45, then gap, rule, gap
        let rule_y = pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Rule { y1, thickness, .. } if *thickness == SECTION_RULE_WIDTH => Some(*y1),
            _ => None,
        });
        assert_eq!(rule_y, Some(HEADER_TOP + 9.0 * LINE_HEIGHT + SECTION_GAP));
    }

    #[test]
    fn test_wrapped_header_value_grows_row() {
        let mut doc = document(1);
        // ~59 characters fit the value column; 150 need three lines
        doc.notes = "crack ".repeat(25);

        let pages = layout_report(&doc, &labels(), AssetPresence::default());
        let notes_label_y = text_y(&pages[0], "Notes").unwrap();
        let notes_row_top = notes_label_y - FIRST_BASELINE;

        let value_rect = pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Rect { x, y, h, .. } if *x == HEADER_X && *y == notes_row_top => Some(*h),
            _ => None,
        });
        assert_eq!(value_rect, Some(3.0 * LINE_HEIGHT));
    }

    #[test]
    fn test_long_header_pushes_table_to_next_page() {
        let mut doc = document(1);
        // 32 wrapped lines: the notes row ends below the page bottom
        doc.notes = "crack ".repeat(320);

        let pages = layout_report(&doc, &labels(), AssetPresence::default());
        assert_eq!(pages.len(), 2);

        let rule_y = pages[1].ops.iter().find_map(|op| match op {
            DrawOp::Rule { y1, thickness, .. } if *thickness == SECTION_RULE_WIDTH => Some(*y1),
            _ => None,
        });
        assert_eq!(rule_y, Some(CONTINUATION_TOP + SECTION_GAP));
        assert!(texts(&pages[1]).contains(&"Description"));
        assert!(!texts(&pages[0]).contains(&"Description"));
    }

    #[test]
    fn test_table_is_centered() {
        let pages = layout_report(&document(1), &labels(), AssetPresence::default());
        let header_y = text_y(&pages[0], "Description").unwrap();

        let first_col_x = pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Rect { x, y, w, .. } if *w == COL_TOTAL && *y < header_y => Some(*x),
            _ => None,
        });
        assert_eq!(first_col_x, Some(15.0));
        assert_eq!(table_start_x() + TABLE_WIDTH, 195.0);
    }

    #[test]
    fn test_long_reports_paginate() {
        let pages = layout_report(&document(60), &labels(), AssetPresence::default());
        assert!(pages.len() >= 2);

        // Every page after the first resumes at the continuation top
        let first_rect_y = pages[1].ops.iter().find_map(|op| match op {
            DrawOp::Rect { y, .. } => Some(*y),
            _ => None,
        });
        assert_eq!(first_rect_y, Some(CONTINUATION_TOP));

        // Rows never start below the page bottom
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Rect { y, .. } = op {
                    assert!(*y <= PAGE_BOTTOM);
                }
            }
        }

        let last = pages.last().unwrap();
        assert!(texts(last).contains(&"Grand Total: OMR3000.00"));
    }

    #[test]
    fn test_empty_report_prints_placeholder() {
        let pages = layout_report(&document(0), &labels(), AssetPresence::default());
        let texts = texts(&pages[0]);

        assert!(texts.contains(&"No damages recorded"));
        assert!(!texts.contains(&"Description"));
        assert!(!texts.iter().any(|t| t.starts_with("Grand Total")));
    }

    #[test]
    fn test_assets_are_placed_when_available() {
        let assets = AssetPresence {
            logo: true,
            signature: true,
        };
        let pages = layout_report(&document(60), &labels(), assets);

        let logo_on_first = pages[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image { asset: Asset::Logo, .. }));
        assert!(logo_on_first);

        let signature = pages.last().unwrap().ops.iter().find_map(|op| match op {
            DrawOp::Image {
                asset: Asset::Signature,
                x,
                y,
                ..
            } => Some((*x, *y)),
            _ => None,
        });
        assert_eq!(signature, Some((90.0, 272.0)));
    }

    #[test]
    fn test_assets_are_skipped_when_missing() {
        let pages = layout_report(&document(1), &labels(), AssetPresence::default());
        assert!(!pages[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
    }
}
