use yansi::Paint;

/// Color palette for terminal messages
pub struct ColorPalette {
    pub muted: (u8, u8, u8),
    pub accent: (u8, u8, u8),
    pub error: (u8, u8, u8),
}

impl ColorPalette {
    pub const TOKYO_NIGHT: Self = Self {
        muted: (86, 95, 137),   // border1
        accent: (122, 162, 247), // hl
        error: (247, 118, 142),  // flash
    };
}

/// Formatting context for plain CLI output
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::TOKYO_NIGHT }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    fn paint(&self, text: &str, (r, g, b): (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let painted = Paint::rgb(text, r, g, b);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn notice(&self, text: &str) -> String {
        self.paint(text, self.palette.muted, false)
    }

    pub fn path(&self, text: &str) -> String {
        self.paint(text, self.palette.accent, false)
    }

    pub fn error(&self, text: &str) -> String {
        let label = self.paint("error:", self.palette.error, true);
        format!("{label} {text}")
    }
}
