use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub disabled: Color,
    pub amount: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(98, 0, 234),
            border: Color::Rgb(60, 66, 72),
            border_focused: Color::Rgb(150, 110, 240),
            disabled: Color::Rgb(90, 90, 90),
            amount: Color::Rgb(180, 140, 255),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
