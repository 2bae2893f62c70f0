use crate::{
    foundation::core::Size,
    model::field::TextOptions,
};

/// Helvetica ascent, in em.
pub const HELVETICA_ASCENT: f64 = 0.718;
/// Baseline-to-baseline distance, in em.
pub const LINE_HEIGHT: f64 = 1.15;

// Width of `?`, which the encoder substitutes for characters outside Latin-1.
const FALLBACK_ADVANCE: u16 = 556;

// Advance widths per 1000 em for U+0020..=U+007E.
const HELVETICA_ADVANCES: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

// Advance widths per 1000 em for U+00A0..=U+00FF.
const HELVETICA_LATIN1_ADVANCES: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // A grave..
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // a grave..
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // eth..
];

/// Advance width of `c` in Helvetica, per 1000 em.
pub fn char_advance(c: char) -> u16 {
    let code = u32::from(c);
    match code {
        0x20..=0x7e => HELVETICA_ADVANCES[(code - 0x20) as usize],
        0xa0..=0xff => HELVETICA_LATIN1_ADVANCES[(code - 0xa0) as usize],
        _ => FALLBACK_ADVANCE,
    }
}

/// Width of `text` set in Helvetica at `font_size`, in points.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_advance(c))).sum();
    f64::from(units) * font_size / 1000.0
}

/// Greedy word wrap of one paragraph to `max_width`.
///
/// Words wider than the limit stay on a line of their own.
pub fn wrap_words(paragraph: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lines and final font size of a laid-out text field.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Lines in order.
    pub lines: Vec<String>,
    /// Font size after shrink-to-fit.
    pub font_size: f64,
}

impl TextBlock {
    /// Width of the widest line.
    pub fn width(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| text_width(l, self.font_size))
            .fold(0.0, f64::max)
    }

    /// Height from the first line's top to the last line's descent.
    pub fn height(&self) -> f64 {
        block_height(self.lines.len(), self.font_size)
    }
}

fn block_height(lines: usize, font_size: f64) -> f64 {
    if lines == 0 {
        return 0.0;
    }
    font_size * (1.0 + LINE_HEIGHT * (lines - 1) as f64)
}

/// Break `text` into lines and pick the font size for a box of `box_size`.
///
/// Without wrapping at most one line is kept. With wrapping, lines break at the box width and
/// are capped by `max_lines`. Shrink-to-fit scales the font down uniformly so the block fits every
/// declared box dimension; it never scales up.
pub fn layout_text(text: &str, opts: &TextOptions, box_size: Option<Size>) -> TextBlock {
    let fs = opts.font_size;
    let box_w = box_size.map(|s| s.width).filter(|w| *w > 0.0);
    let box_h = box_size.map(|s| s.height).filter(|h| *h > 0.0);

    let mut lines: Vec<String> = if opts.allow_wrap {
        text.lines()
            .flat_map(|p| match box_w {
                Some(w) => wrap_words(p, fs, w),
                None => vec![p.trim().to_owned()],
            })
            .collect()
    } else {
        text.lines().map(|p| p.trim().to_owned()).collect()
    };
    let limit = match (opts.allow_wrap, opts.max_lines) {
        (false, Some(n)) => n.min(1) as usize,
        (false, None) => 1,
        (true, Some(n)) => n as usize,
        (true, None) => usize::MAX,
    };
    lines.truncate(limit);

    let mut block = TextBlock {
        lines,
        font_size: fs,
    };
    if opts.shrink_to_fit && !block.lines.is_empty() {
        let mut scale: f64 = 1.0;
        let w = block.width();
        if let Some(bw) = box_w.filter(|_| w > 0.0) {
            scale = scale.min(bw / w);
        }
        if let Some(bh) = box_h {
            scale = scale.min(bh / block.height());
        }
        block.font_size = fs * scale;
    }
    block
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
