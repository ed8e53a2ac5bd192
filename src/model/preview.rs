use serde::{Deserialize, Serialize};

use super::{EntryId, Platform};

/// Width of the profile card canvas. Only the height is dynamic.
pub const CANVAS_WIDTH: u32 = 308;

/// Geometry constants of the profile card preview.
///
/// `Default` gives the reference card: 632 high, rows every 64 starting
/// at 278, growing once a sixth row pushes past 590.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewLayout {
    pub baseline_height: u32,
    /// Row count the baseline card always has room for.
    pub min_rows: usize,
    pub row_origin: u32,
    pub row_step: u32,
    pub overflow_threshold: u32,
    pub bottom_margin: u32,
}

impl Default for PreviewLayout {
    fn default() -> Self {
        Self {
            baseline_height: 632,
            min_rows: 5,
            row_origin: 278,
            row_step: 64,
            overflow_threshold: 590,
            bottom_margin: 98,
        }
    }
}

impl PreviewLayout {
    /// Y offset of the row at `index`.
    pub fn row_offset(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.row_origin
            .saturating_add(index.saturating_mul(self.row_step))
    }
}

/// One rendered link button on the profile card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewItem {
    pub entry_id: EntryId,
    pub platform: Platform,
    pub label: &'static str,
    pub icon_ref: &'static str,
    pub background_color: &'static str,
    pub uses_dark_text: bool,
    pub href: String,
}

/// Read-only render model of the profile card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewModel {
    pub items: Vec<PreviewItem>,
    pub canvas_height: u32,
    /// Y offsets of the grey row placeholders drawn behind the buttons.
    pub placeholder_rows: Vec<u32>,
}

impl PreviewModel {
    /// SVG `viewBox` of the card at its current height.
    pub fn view_box(&self) -> String {
        format!("0 0 {CANVAS_WIDTH} {}", self.canvas_height)
    }

    /// SVG path data of the outer phone frame.
    pub fn outline_path(&self) -> String {
        let h = i64::from(self.canvas_height) * 1000;
        format!(
            "M1 54.5C1 24.953 24.953 1 54.5 1h199C283.047 1 307 24.953 307 54.5v{straight}\
             c0 29.547-23.953 53.5-53.5 53.5h-199C24.953 {bottom} 1 {curve} 1 {corner}v-{straight}Z",
            straight = milli(h - 109_000),
            bottom = milli(h - 1_000),
            curve = milli(h - 24_953),
            corner = milli(h - 54_500),
        )
    }

    /// SVG path data of the inner screen, including the notch.
    pub fn inner_path(&self) -> String {
        let h = i64::from(self.canvas_height) * 1000;
        format!(
            "M12 55.5C12 30.923 31.923 11 56.5 11h24C86.851 11 92 16.149 92 22.5\
             c0 8.008 6.492 14.5 14.5 14.5h95c8.008 0 14.5-6.492 14.5-14.5 \
             0-6.351 5.149-11.5 11.5-11.5h24c24.577 0 44.5 19.923 44.5 44.5v{straight}\
             c0 24.577-19.923 44.5-44.5 44.5h-195C31.923 {bottom} 12 {curve} 12 {corner}v-{straight}Z",
            straight = milli(h - 111_000),
            bottom = milli(h - 11_000),
            curve = milli(h - 30_923),
            corner = milli(h - 55_500),
        )
    }
}

/// Format a fixed-point value in thousandths without trailing zeros.
fn milli(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let value = value.unsigned_abs();
    let (whole, frac) = (value / 1000, value % 1000);
    if frac == 0 {
        format!("{sign}{whole}")
    } else {
        let frac = format!("{frac:03}");
        format!("{sign}{whole}.{}", frac.trim_end_matches('0'))
    }
}
