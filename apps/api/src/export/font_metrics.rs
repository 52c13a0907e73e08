//! Static glyph widths for the export font and the page geometry it is laid out on.
//!
//! Widths are the Helvetica AFM advance widths in em units (1/1000 of the AFM value).
//! Table covers ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

/// Points to millimetres.
const MM_PER_PT: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry of an exported page. All lengths are in millimetres.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub margin_right_mm: f32,
    /// Content never crosses this distance from the bottom edge; the next line
    /// goes to a new page instead.
    pub margin_bottom_mm: f32,
    /// Inner horizontal padding of each text block.
    pub cell_padding_mm: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
}

/// A4 portrait, 10mm margins, 15mm bottom break margin, 12pt text on 10mm lines.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_left_mm: 10.0,
        margin_top_mm: 10.0,
        margin_right_mm: 10.0,
        margin_bottom_mm: 15.0,
        cell_padding_mm: 1.0,
        font_size_pt: 12.0,
        line_height_mm: 10.0,
    }
}

impl PageConfig {
    /// Usable text width in millimetres (page minus side margins and padding).
    pub fn text_width_mm(&self) -> f32 {
        self.page_width_mm
            - self.margin_left_mm
            - self.margin_right_mm
            - 2.0 * self.cell_padding_mm
    }

    /// Usable text width expressed in em units at the configured font size.
    pub fn text_width_em(&self) -> f32 {
        self.text_width_mm() / (self.font_size_pt * MM_PER_PT)
    }

    /// How many lines fit between the top margin and the bottom break margin.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height_mm - self.margin_top_mm - self.margin_bottom_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }

    /// Font size in millimetres.
    pub fn font_size_mm(&self) -> f32 {
        self.font_size_pt * MM_PER_PT
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside 0x20..=0x7E.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.measure_char(c)).sum()
    }

    pub fn measure_char(&self, c: char) -> f32 {
        // Tabs advance like a space.
        let code = if c == '\t' { 32 } else { c as usize };
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }
}

/// Helvetica, the built-in PDF font used for every export.
pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
};
