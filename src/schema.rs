//! Options declared by the XREAL virtual desktop
//!
//! Keys are part of the on-disk format. Renaming one orphans the stored
//! value; changing an option's kind makes older files keep the new default.

use crate::error::OptionsResult;
use crate::option_enum;
use crate::options::{
    BoolOption, Color, ColorOption, EnumOption, FloatOption, IntOption, StringOption,
    Vector2Option, OPTION_DEBOUNCE_DELAY,
};
use crate::registry::{OptionRegistry, RegistryBuilder};
use glam::Vec2;
use std::sync::Arc;
use std::time::Duration;

option_enum! {
    /// Rendering quality preset
    pub enum RenderQuality {
        Low = 0,
        Medium = 1,
        High = 2,
        Ultra = 3,
    }
}

option_enum! {
    /// Color blind assistance mode
    pub enum ColorBlindType {
        None = 0,
        Protanopia = 1,
        Deuteranopia = 2,
        Tritanopia = 3,
    }
}

/// Typed handles to every desktop option plus the registry holding them
#[derive(Debug, Clone)]
pub struct DesktopOptions {
    /// Virtual screen distance from the user
    pub screen_distance: Arc<FloatOption>,
    /// Stereoscopic 3D display mode
    pub display_mode_3d: Arc<BoolOption>,
    /// Roll lock for head tracking
    pub roll_lock: Arc<BoolOption>,
    /// Glasses brightness level (0-7)
    pub brightness: Arc<IntOption>,
    pub auto_brightness: Arc<BoolOption>,
    pub render_quality: Arc<EnumOption<RenderQuality>>,
    pub color_blind_type: Arc<EnumOption<ColorBlindType>>,
    /// Text scaling factor
    pub text_scale: Arc<FloatOption>,
    /// Snap turn angle in degrees
    pub snap_turn_angle: Arc<FloatOption>,
    pub accent_color: Arc<ColorOption>,
    /// Offset of the main panel from the view center
    pub panel_offset: Arc<Vector2Option>,
    /// Name shown for this desktop session
    pub display_name: Arc<StringOption>,
    registry: Arc<OptionRegistry>,
}

impl DesktopOptions {
    pub const DISPLAY_NAME_MAX_LENGTH: usize = 32;

    pub fn new() -> OptionsResult<Self> {
        Self::with_option_debounce(OPTION_DEBOUNCE_DELAY)
    }

    /// Build the option set with a custom delay for each option's debounced hook
    pub fn with_option_debounce(delay: Duration) -> OptionsResult<Self> {
        let mut builder = RegistryBuilder::new();
        let b = &mut builder;

        let screen_distance = b.register(
            FloatOption::new("ScreenDistance", -5.0)
                .with_range(-50.0, 50.0)
                .with_debounce(delay),
        )?;
        let display_mode_3d =
            b.register(BoolOption::new("DisplayMode3d", true).with_debounce(delay))?;
        let roll_lock = b.register(BoolOption::new("RollLock", false).with_debounce(delay))?;
        let brightness = b.register(
            IntOption::new("Brightness", 4)
                .with_range(0, 7)
                .with_debounce(delay),
        )?;
        let auto_brightness =
            b.register(BoolOption::new("AutoBrightness", false).with_debounce(delay))?;
        let render_quality = b.register(
            EnumOption::new("RenderQuality", RenderQuality::High).with_debounce(delay),
        )?;
        let color_blind_type = b.register(
            EnumOption::new("ColorBlindType", ColorBlindType::None).with_debounce(delay),
        )?;
        let text_scale = b.register(
            FloatOption::new("TextScale", 1.0)
                .with_range(0.5, 3.0)
                .with_debounce(delay),
        )?;
        let snap_turn_angle = b.register(
            FloatOption::new("SnapTurnAngle", 30.0)
                .with_range(5.0, 90.0)
                .with_debounce(delay),
        )?;
        let accent_color = b.register(
            ColorOption::new("AccentColor", Color::rgb(0.26, 0.59, 0.98)).with_debounce(delay),
        )?;
        let panel_offset =
            b.register(Vector2Option::new("PanelOffset", Vec2::ZERO).with_debounce(delay))?;
        let display_name = b.register(
            StringOption::new("DisplayName", "XREAL Desktop")
                .with_max_length(Self::DISPLAY_NAME_MAX_LENGTH)
                .with_debounce(delay),
        )?;

        Ok(Self {
            screen_distance,
            display_mode_3d,
            roll_lock,
            brightness,
            auto_brightness,
            render_quality,
            color_blind_type,
            text_scale,
            snap_turn_angle,
            accent_color,
            panel_offset,
            display_name,
            registry: Arc::new(builder.build()),
        })
    }

    pub fn registry(&self) -> &Arc<OptionRegistry> {
        &self.registry
    }
}
