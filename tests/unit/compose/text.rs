use super::*;

fn opts() -> TextOptions {
    TextOptions::default()
}

#[test]
fn helvetica_advances() {
    assert_eq!(char_advance(' '), 278);
    assert_eq!(char_advance('W'), 944);
    assert_eq!(char_advance('i'), 222);
    assert_eq!(char_advance('~'), 584);
    assert_eq!(char_advance('é'), 556);
    // "Ada" = 667 + 556 + 556
    assert!((text_width("Ada", 10.0) - 17.79).abs() < 1e-9);
}

#[test]
fn latin1_advances_match_encoded_glyphs() {
    assert_eq!(char_advance('\u{a0}'), 278);
    assert_eq!(char_advance('©'), 737);
    assert_eq!(char_advance('Æ'), 1000);
    assert_eq!(char_advance('Í'), 278);
    assert_eq!(char_advance('ß'), 611);
    assert_eq!(char_advance('ç'), 500);
    assert_eq!(char_advance('ï'), 278);
    assert_eq!(char_advance('ÿ'), 500);
    assert_eq!(char_advance('€'), char_advance('?'));
    // "Zoë" = 611 + 556 + 556, "Íñi" = 278 + 556 + 222
    assert!((text_width("Zoë", 10.0) - 17.23).abs() < 1e-9);
    assert!((text_width("Íñi", 10.0) - 10.56).abs() < 1e-9);
}

#[test]
fn wrap_breaks_on_width_and_keeps_long_words() {
    let lines = wrap_words("aaa bbb ccc", 10.0, 40.0);
    assert_eq!(lines, vec!["aaa bbb", "ccc"]);

    let lines = wrap_words("supercalifragilistic x", 10.0, 20.0);
    assert_eq!(lines, vec!["supercalifragilistic", "x"]);

    assert_eq!(wrap_words("", 10.0, 20.0), vec![String::new()]);
}

#[test]
fn no_wrap_keeps_one_line() {
    let mut o = opts();
    o.max_lines = Some(3);
    let block = layout_text("first\nsecond", &o, Some(Size::new(10.0, 10.0)));
    assert_eq!(block.lines, vec!["first"]);
    assert_eq!(block.font_size, 12.0);
}

#[test]
fn wrap_respects_max_lines() {
    let mut o = opts();
    o.allow_wrap = true;
    o.font_size = 10.0;
    let block = layout_text("aaa bbb ccc ddd", &o, Some(Size::new(20.0, 100.0)));
    assert_eq!(block.lines, vec!["aaa", "bbb", "ccc", "ddd"]);

    o.max_lines = Some(2);
    let block = layout_text("aaa bbb ccc ddd", &o, Some(Size::new(20.0, 100.0)));
    assert_eq!(block.lines, vec!["aaa", "bbb"]);
}

#[test]
fn shrink_to_fit_scales_down_only() {
    let mut o = opts();
    o.shrink_to_fit = true;
    o.font_size = 20.0;

    let wide = text_width("Hello", 20.0);
    let block = layout_text("Hello", &o, Some(Size::new(wide / 2.0, 100.0)));
    assert!((block.font_size - 10.0).abs() < 1e-9);
    assert!(block.width() <= wide / 2.0 + 1e-9);

    let block = layout_text("Hello", &o, Some(Size::new(500.0, 500.0)));
    assert_eq!(block.font_size, 20.0);

    let block = layout_text("Hello", &o, Some(Size::new(500.0, 5.0)));
    assert!((block.height() - 5.0).abs() < 1e-9);
}

#[test]
fn empty_text_has_no_lines() {
    let block = layout_text("", &opts(), None);
    assert!(block.lines.is_empty());
    assert_eq!(block.height(), 0.0);
}
