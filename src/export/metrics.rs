//! Advance widths of the built-in Helvetica faces.
//!
//! Widths are in 1/1000 em, taken from the Adobe core-14 AFM files. Only the
//! Latin-1 range is covered, which is everything `pdf_safe` lets through.

const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Anything outside the tables is measured as a full em.
const FALLBACK_WIDTH: u16 = 1000;

/// Helvetica, U+0020 to U+007E.
const REGULAR_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' to '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' to 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' to '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' to 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' to '~'
];

/// Helvetica-Bold, U+0020 to U+007E.
const BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0' to '?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@' to 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P' to '_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`' to 'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p' to '~'
];

/// Helvetica, U+00A0 to U+00BF.
const REGULAR_SYMBOLS: [u16; 32] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // U+00A0 on
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // U+00B0 on
];

/// Helvetica-Bold, U+00A0 to U+00BF.
const BOLD_SYMBOLS: [u16; 32] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // U+00A0 on
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // U+00B0 on
];

/// Letters in U+00C0 to U+00FF that are measured like an ASCII base letter.
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Þ' => 'P',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ð' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'þ' => 'p',
        _ => return None,
    };
    Some(base)
}

/// Advance width of one character in 1/1000 em.
pub fn glyph_width(c: char, bold: bool) -> u16 {
    let code = c as u32;
    match code {
        0x20..=0x7E => {
            let table = if bold { &BOLD_ASCII } else { &REGULAR_ASCII };
            table[(code - 0x20) as usize]
        }
        0xA0..=0xBF => {
            let table = if bold { &BOLD_SYMBOLS } else { &REGULAR_SYMBOLS };
            table[(code - 0xA0) as usize]
        }
        _ => match c {
            'Æ' => 1000,
            'æ' => 889,
            'ß' => 611,
            'ø' => 611,
            '×' | '÷' => 584,
            _ => base_letter(c).map_or(FALLBACK_WIDTH, |base| glyph_width(base, bold)),
        },
    }
}

/// Width of `text` set at `size_pt`, in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, bold))).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_POINT
}
