//! Static glyph-width tables for the base-14 Helvetica family.
//!
//! Widths are in 1/1000 em, taken from the Adobe core-font AFM files. The
//! oblique faces share the upright widths. Tables cover ASCII 0x20..=0x7E
//! (95 printable characters), index = (char as usize) - 32. The upper half of
//! WinAnsiEncoding (0x80..=0xFF) has its own table; characters outside the
//! code page fall back to `fallback_width`.

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    /// PDF base font name.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
            FontFace::Italic => "Helvetica-Oblique",
            FontFace::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Italic => "F3",
            FontFace::BoldItalic => "F4",
        }
    }

    pub const ALL: [FontFace; 4] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Italic,
        FontFace::BoldItalic,
    ];

    fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldItalic)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric table
// ────────────────────────────────────────────────────────────────────────────

/// Widths within this many points of the limit still fit. Box widths are
/// derived by adding and subtracting padding, so they land a few ULPs off.
pub const FIT_TOLERANCE: f32 = 0.01;

pub struct FontMetricTable {
    widths: [u16; 95],
    /// WinAnsi codes 0x80..=0xFF; 0 marks an unassigned code.
    upper: [u16; 128],
    fallback_width: u16,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match win_ansi_code(c) {
            Some(byte) if byte >= 0x80 && self.upper[byte as usize - 0x80] > 0 => {
                self.upper[byte as usize - 0x80]
            }
            _ => self.fallback_width,
        }
    }

    /// Rendered width of `s` in points at `size`, with `letter_spacing` points
    /// added after every character (PDF `Tc` semantics).
    pub fn measure(&self, s: &str, size: f32, letter_spacing: f32) -> f32 {
        let (units, count) = s
            .chars()
            .fold((0u32, 0u32), |(w, n), c| (w + self.char_width(c) as u32, n + 1));
        units as f32 * size / 1000.0 + letter_spacing * count as f32
    }

    /// Greedy word wrap at `max_width` points.
    ///
    /// Hard newlines always break. A word wider than a full line is split by
    /// characters. Blank input yields no lines; a blank paragraph between two
    /// newlines yields an empty line so vertical rhythm is kept.
    pub fn wrap(&self, text: &str, size: f32, letter_spacing: f32, max_width: f32) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let space_w = self.measure(" ", size, letter_spacing);
        let mut lines = Vec::new();

        for paragraph in text.trim_end().lines() {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut current = String::new();
            let mut current_width = 0.0_f32;
            let limit = max_width + FIT_TOLERANCE;

            for word in words {
                let word_w = self.measure(word, size, letter_spacing);

                if word_w > limit {
                    // Flush what we have, then hard-split the long word.
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    let mut chunk = String::new();
                    let mut chunk_w = 0.0_f32;
                    for c in word.chars() {
                        let c_w = self.measure(c.encode_utf8(&mut [0u8; 4]), size, letter_spacing);
                        if !chunk.is_empty() && chunk_w + c_w > limit {
                            lines.push(std::mem::take(&mut chunk));
                            chunk_w = 0.0;
                        }
                        chunk.push(c);
                        chunk_w += c_w;
                    }
                    current = chunk;
                    current_width = chunk_w;
                    continue;
                }

                if current.is_empty() {
                    current.push_str(word);
                    current_width = word_w;
                } else if current_width + space_w + word_w > limit {
                    lines.push(std::mem::replace(&mut current, word.to_string()));
                    current_width = word_w;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space_w + word_w;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }
}

/// WinAnsiEncoding byte for `c`, or `None` when the code page has no glyph for it.
pub fn win_ansi_code(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    #[rustfmt::skip]
    upper: [
        // 0x80  €    -    ‚    ƒ    „    …     †    ‡    ˆ    ‰     Š    ‹    Œ     -    Ž    -
        556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        // 0x90  -    ‘    ’    “    ”    •    –    —     ˜    ™     š    ›    œ    -    ž    Ÿ
        0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
        // 0xA0 nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        // 0xB0  °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        // 0xC0  À-Å                           Æ     Ç    È-Ë                 Ì-Ï
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        // 0xD0  Ð    Ñ    Ò-Ö                      ×    Ø    Ù-Ü                 Ý    Þ    ß
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        // 0xE0  à-å                           æ    ç    è-ë                 ì-ï
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        // 0xF0  ð    ñ    ò-ö                      ÷    ø    ù-ü                 ý    þ    ÿ
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
    fallback_width: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    #[rustfmt::skip]
    upper: [
        // 0x80  €    -    ‚    ƒ    „    …     †    ‡    ˆ    ‰     Š    ‹    Œ     -    Ž    -
        556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        // 0x90  -    ‘    ’    “    ”    •    –    —     ˜    ™     š    ›    œ    -    ž    Ÿ
        0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
        // 0xA0 nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        // 0xB0  °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        // 0xC0  À-Å                           Æ     Ç    È-Ë                 Ì-Ï
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        // 0xD0  Ð    Ñ    Ò-Ö                      ×    Ø    Ù-Ü                 Ý    Þ    ß
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        // 0xE0  à-å                           æ    ç    è-ë                 ì-ï
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        // 0xF0  ð    ñ    ò-ö                      ÷    ø    ù-ü                 ý    þ    ÿ
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
    fallback_width: 611,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    if face.is_bold() {
        &HELVETICA_BOLD
    } else {
        &HELVETICA
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_returns_zero() {
        assert_eq!(get_metrics(FontFace::Regular).measure("", 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_measure_ascii_characters() {
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 units → 20.56pt at 10pt
        let width = get_metrics(FontFace::Regular).measure("Rust", 10.0, 0.0);
        assert!((width - 20.56).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Distributed systems";
        let regular = get_metrics(FontFace::Regular).measure(text, 11.0, 0.0);
        let bold = get_metrics(FontFace::Bold).measure(text, 11.0, 0.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_letter_spacing_added_per_character() {
        let m = get_metrics(FontFace::Regular);
        let plain = m.measure("ABC", 12.0, 0.0);
        let spaced = m.measure("ABC", 12.0, 1.0);
        assert!((spaced - plain - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_ascii_falls_back() {
        let m = get_metrics(FontFace::Regular);
        assert!((m.measure("\u{2022}", 10.0, 0.0) - 3.5).abs() < 1e-4);
        assert!((m.measure("\u{4E2D}", 10.0, 0.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_win_ansi_upper_half_widths() {
        let regular = get_metrics(FontFace::Regular);
        let bold = get_metrics(FontFace::Bold);
        assert!((regular.measure("\u{2026}", 10.0, 0.0) - 10.0).abs() < 1e-4);
        assert!((regular.measure("\u{2122}", 10.0, 0.0) - 10.0).abs() < 1e-4);
        assert!((regular.measure("\u{0161}", 10.0, 0.0) - 5.0).abs() < 1e-4);
        assert!((bold.measure("\u{0161}", 10.0, 0.0) - 5.56).abs() < 1e-4);
        assert!((regular.measure("\u{00C6}", 10.0, 0.0) - 10.0).abs() < 1e-4);
        // Outside the code page: Ł has no WinAnsi glyph.
        assert!((regular.measure("\u{0141}", 10.0, 0.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_win_ansi_code_points() {
        assert_eq!(win_ansi_code('A'), Some(b'A'));
        assert_eq!(win_ansi_code('\u{E9}'), Some(0xE9));
        assert_eq!(win_ansi_code('\u{2026}'), Some(0x85));
        assert_eq!(win_ansi_code('\u{017E}'), Some(0x9E));
        assert_eq!(win_ansi_code('\u{0141}'), None);
        assert_eq!(win_ansi_code('\u{81}'), None);
    }

    #[test]
    fn test_wrap_blank_is_empty() {
        assert!(get_metrics(FontFace::Regular).wrap("   ", 10.0, 0.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = get_metrics(FontFace::Regular).wrap("Hello world", 10.0, 0.0, 200.0);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let m = get_metrics(FontFace::Regular);
        let text = "Architected a distributed caching layer using consistent hashing, \
                    reducing p99 latency by 40% under peak load";
        let lines = m.wrap(text, 10.0, 0.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(m.measure(line, 10.0, 0.0) <= 150.0 + 1e-3, "overflowing line: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_honours_newlines() {
        let lines = get_metrics(FontFace::Regular).wrap("first\n\nthird", 10.0, 0.0, 500.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrap_word_at_exact_width_stays_whole() {
        let m = get_metrics(FontFace::Regular);
        for word in ["Python", "Docker", "AWS", "Git", "Kubernetes"] {
            let natural = m.measure(word, 9.0, 0.0);
            // Same arithmetic a padded box does: (natural + padding) - padding.
            let padded = (natural + 2.0 * 7.3) - 7.3 - 7.3;
            let just_under = natural - natural * f32::EPSILON * 4.0;
            for width in [natural, padded, just_under] {
                assert_eq!(m.wrap(word, 9.0, 0.0, width), vec![word.to_string()], "{word} at {width}");
            }
        }
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let m = get_metrics(FontFace::Regular);
        let url = "https://example.com/a/really/long/path/that/cannot/fit/on/one/line";
        let lines = m.wrap(url, 10.0, 0.0, 80.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
    }
}
