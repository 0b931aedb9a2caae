//! Glyph widths for the standard Type1 faces, used when a font dictionary
//! has no usable /Widths array.
//!
//! Widths are Adobe AFM values in 1/1000 em units for the printable ASCII
//! range. Codes outside it get the face's default width.

const FIRST: u32 = 32;
const LAST: u32 = 126;

/// Widths for one face.
#[derive(Debug)]
pub struct StandardFont {
    /// Widths for codes 32..=126.
    widths: [u16; 95],
    /// Width used outside the table.
    default_width: u16,
}

impl StandardFont {
    /// Width of `code` in 1/1000 em units.
    pub fn width(&self, code: u32) -> f64 {
        let w = if (FIRST..=LAST).contains(&code) {
            self.widths[(code - FIRST) as usize]
        } else {
            self.default_width
        };
        f64::from(w)
    }
}

/// Face for a base font name. Subset prefixes (`ABCDEF+`) are ignored and
/// common TrueType aliases map to their Type1 equivalents.
pub fn lookup(base_font: &str) -> Option<&'static StandardFont> {
    let name = strip_subset_prefix(base_font);
    let bold = name.contains("Bold");
    let family = if name.starts_with("Helvetica") || name.starts_with("Arial") {
        Family::Sans
    } else if name.starts_with("Times") {
        Family::Serif
    } else if name.starts_with("Courier") {
        Family::Mono
    } else {
        return None;
    };
    Some(match (family, bold) {
        (Family::Sans, false) => &HELVETICA,
        (Family::Sans, true) => &HELVETICA_BOLD,
        (Family::Serif, false) => &TIMES_ROMAN,
        (Family::Serif, true) => &TIMES_BOLD,
        (Family::Mono, _) => &COURIER,
    })
}

/// Drop a six-letter subset tag such as `ABCDEF+`.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

enum Family {
    Sans,
    Serif,
    Mono,
}

#[rustfmt::skip]
static HELVETICA: StandardFont = StandardFont {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
    ],
    default_width: 556,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardFont = StandardFont {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
    ],
    default_width: 611,
};

#[rustfmt::skip]
static TIMES_ROMAN: StandardFont = StandardFont {
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
        921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
        556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
        333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
        500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
    ],
    default_width: 500,
};

#[rustfmt::skip]
static TIMES_BOLD: StandardFont = StandardFont {
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
        930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
        611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
        333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
        556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
    ],
    default_width: 500,
};

static COURIER: StandardFont = StandardFont {
    widths: [600; 95],
    default_width: 600,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_digits_and_letters() {
        let font = lookup("Helvetica").unwrap();
        assert_eq!(font.width(u32::from(b'0')), 556.0);
        assert_eq!(font.width(u32::from(b'A')), 667.0);
        assert_eq!(font.width(u32::from(b' ')), 278.0);
        assert_eq!(font.width(u32::from(b'~')), 584.0);
    }

    #[test]
    fn bold_face_selected_by_name() {
        let font = lookup("Helvetica-Bold").unwrap();
        assert_eq!(font.width(u32::from(b'C')), 722.0);
        assert_eq!(font.width(u32::from(b'R')), 722.0);
        assert!(std::ptr::eq(lookup("Arial,Bold").unwrap(), font));
    }

    #[test]
    fn aliases_and_subsets() {
        assert!(std::ptr::eq(lookup("ABCDEF+ArialMT").unwrap(), lookup("Helvetica").unwrap()));
        assert_eq!(strip_subset_prefix("ABCDEF+Times-Roman"), "Times-Roman");
        assert_eq!(strip_subset_prefix("Abc+Foo"), "Abc+Foo");
        assert_eq!(lookup("Times-Bold").unwrap().width(u32::from(b'%')), 1000.0);
    }

    #[test]
    fn courier_is_monospaced() {
        let font = lookup("Courier-Oblique").unwrap();
        assert_eq!(font.width(u32::from(b'i')), 600.0);
        assert_eq!(font.width(200), 600.0);
    }

    #[test]
    fn unknown_fonts() {
        assert!(lookup("Wingdings").is_none());
        assert_eq!(lookup("Helvetica").unwrap().width(233), 556.0);
    }
}
