pub mod app;
pub mod assets;
pub mod sound;
pub mod theme;
pub mod view;

pub const WINDOW_WIDTH: i32 = 1200;
pub const WINDOW_HEIGHT: i32 = 1000;
pub const WHEEL_CENTER: (f64, f64) = (500.0, 500.0);
pub const WHEEL_RADIUS: f64 = 495.0;
pub const LABEL_MARGIN: f64 = 10.0; // gap between label end and rim
pub const LABEL_MAX_CHARS: usize = 23;
pub const LABEL_MAX_FONT: f64 = 23.0;
pub const WINNER_FONT_SIZE: f64 = 64.0;
pub const WINNER_SUB_FONT_SIZE: f64 = 32.0;
pub const BANNER_PADDING: f64 = 25.0;
pub const BANNER_MAX_WIDTH: f64 = 900.0;
