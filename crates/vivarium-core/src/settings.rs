//! Tunable spawner parameters.
//!
//! [`SpawnerSettings`] is plain data with serde defaults, so a scene can
//! load it from JSON and omit any field it does not care about.
//!
//! ```
//! use vivarium_core::settings::SpawnerSettings;
//!
//! let settings = SpawnerSettings::from_json_str(r#"{ "number_of_entities": 250 }"#).unwrap();
//! assert_eq!(settings.number_of_entities, 250);
//! assert_eq!(settings.reference_speed, 5.0);
//! ```

use serde::{Deserialize, Serialize};

/// Largest render buffer a spawner will allocate.
///
/// The overlay accepts any `i32`; counts above this are clamped by
/// [`SpawnerSettings::capacity`] and rejected by
/// [`SpawnerSettings::validate`].
pub const MAX_ENTITIES: i32 = 1_000_000;

/// Errors produced when loading or validating [`SpawnerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The JSON document could not be parsed.
    #[error("failed to parse spawner settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The entity count is not within `1..=MAX_ENTITIES`.
    #[error("number_of_entities must be within 1..={max}, got {value}")]
    EntityCountOutOfRange { value: i32, max: i32 },

    /// A float parameter is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    /// The reference alpha is outside `0.0..=1.0`.
    #[error("reference_alpha must be within 0..=1, got {0}")]
    AlphaOutOfRange(f32),
}

/// Per-spawner tunables.
///
/// `number_of_entities` sizes the render buffer. The reference values are
/// consumed by the simulation and only displayed by the spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    /// Render buffer capacity. Kept as `i32` because the debug overlay edits
    /// it as free-form integer text.
    ///
    /// Loaded settings must lie in `1..=MAX_ENTITIES`. At runtime the
    /// overlay may write anything: zero or a negative count renders
    /// nothing, and larger counts are clamped to [`MAX_ENTITIES`].
    pub number_of_entities: i32,
    /// Reference speed handed to the simulation.
    pub reference_speed: f32,
    /// Reference scale handed to the simulation.
    pub reference_scale: f32,
    /// Reference alpha handed to the simulation, `0.0..=1.0`.
    pub reference_alpha: f32,
    /// Whether scene gizmos should be drawn for this spawner.
    pub use_gizmos: bool,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            number_of_entities: 10,
            reference_speed: 5.0,
            reference_scale: 0.5,
            reference_alpha: 1.0,
            use_gizmos: true,
        }
    }
}

impl SpawnerSettings {
    /// Parse and validate settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] on malformed JSON and the other
    /// variants when [`validate`](Self::validate) rejects the values.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// See [`SettingsError`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_ENTITIES).contains(&self.number_of_entities) {
            return Err(SettingsError::EntityCountOutOfRange {
                value: self.number_of_entities,
                max: MAX_ENTITIES,
            });
        }
        for (field, value) in [
            ("reference_speed", self.reference_speed),
            ("reference_scale", self.reference_scale),
            ("reference_alpha", self.reference_alpha),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.reference_alpha) {
            return Err(SettingsError::AlphaOutOfRange(self.reference_alpha));
        }
        Ok(())
    }

    /// Buffer capacity implied by `number_of_entities`: negative counts as
    /// 0, anything above [`MAX_ENTITIES`] as `MAX_ENTITIES`.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.number_of_entities.min(MAX_ENTITIES)).unwrap_or(0)
    }
}
