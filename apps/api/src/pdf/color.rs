/// 8-bit RGB colour. Alpha is resolved at construction by blending over white,
/// since every fill in a resume sits on a white page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` / `#RRGGBB` (leading `#` optional). Unparseable input
    /// yields [`palette::BLUE_MEDIUM`].
    pub fn from_hex(hex: &str) -> Self {
        Self::try_from_hex(hex).unwrap_or(palette::BLUE_MEDIUM)
    }

    pub fn try_from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&digits[0..2], 16).ok()?,
                g: u8::from_str_radix(&digits[2..4], 16).ok()?,
                b: u8::from_str_radix(&digits[4..6], 16).ok()?,
            }),
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self {
                    r: nibble(0)?,
                    g: nibble(1)?,
                    b: nibble(2)?,
                })
            }
            _ => None,
        }
    }

    /// The colour as it appears at `alpha` (0–255) opacity over white.
    pub fn with_alpha(self, alpha: u8) -> Self {
        let blend = |c: u8| {
            let a = alpha as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Self {
            r: blend(self.r),
            g: blend(self.g),
            b: blend(self.b),
        }
    }

    /// Components in the 0.0–1.0 range used by PDF colour operators.
    pub fn unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const BLUE_MEDIUM: Rgb = Rgb::new(0x21, 0x96, 0xF3);
    pub const GREY_DARKEN3: Rgb = Rgb::new(0x42, 0x42, 0x42);
    pub const GREY_DARKEN1: Rgb = Rgb::new(0x75, 0x75, 0x75);
    pub const GREY_LIGHTEN1: Rgb = Rgb::new(0xBD, 0xBD, 0xBD);
    pub const GREY_LIGHTEN2: Rgb = Rgb::new(0xE0, 0xE0, 0xE0);
}
