/// Text and geometry of the trailing "subscribe" frame.
#[derive(Debug, Clone)]
pub struct PromoContent {
    pub title_lines: [String; 2],
    pub subtitle: String,
    pub title_font_size: u32,
    pub logo_size: u32,
    pub logo_position: (u32, u32),
    /// Gap between the title block and the subtitle, also used to lift the title.
    pub spacing: f32,
    pub duration_seconds: f64,
}

impl Default for PromoContent {
    fn default() -> Self {
        Self {
            title_lines: ["¡SUSCRÍBETE A".to_string(), "LECTOR DE SOMBRAS!".to_string()],
            subtitle: "Dale like y activa la campana 🔔".to_string(),
            title_font_size: 70,
            logo_size: 150,
            logo_position: (20, 20),
            spacing: 40.0,
            duration_seconds: 5.0,
        }
    }
}

impl PromoContent {
    pub fn subtitle_font_size(&self) -> u32 {
        self.title_font_size / 2
    }
}
