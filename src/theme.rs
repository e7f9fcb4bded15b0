use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub seat_stroke: String,
    pub seat_stroke_width: f32,
    pub legend_marker_size: f32,
    pub legend_spacing: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#5B6678".to_string(),
            seat_stroke: "#FFFFFF".to_string(),
            seat_stroke_width: 0.5,
            legend_marker_size: 14.0,
            legend_spacing: 8.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#11151C".to_string(),
            text_color: "#E6EAF2".to_string(),
            muted_text_color: "#9AA4B5".to_string(),
            seat_stroke: "#11151C".to_string(),
            seat_stroke_width: 0.5,
            legend_marker_size: 14.0,
            legend_spacing: 8.0,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "light" | "default" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
