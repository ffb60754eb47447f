// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use crate::error::ApiError;
use citygml_lite_geometry::{CoordinateShift, ImportSettings};
use serde::{Deserialize, Serialize};

/// Import options sent as multipart text fields next to the files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Multiplier applied after the origin shift.
    pub scale: f64,
    /// File coordinate that becomes the scene origin.
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_z: f64,
    /// Tag faces with the wall and roof materials.
    pub separate_materials: bool,
    /// Return viewport clip distances per file.
    pub viewport_clip: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportSettings::default().into()
    }
}

impl From<ImportSettings> for ImportOptions {
    fn from(settings: ImportSettings) -> Self {
        Self {
            scale: settings.scale,
            origin_x: settings.origin.x,
            origin_y: settings.origin.y,
            origin_z: settings.origin.z,
            separate_materials: settings.separate_materials,
            viewport_clip: settings.viewport_clip,
        }
    }
}

impl ImportOptions {
    /// Apply one multipart text field.
    ///
    /// Returns `Ok(false)` for field names that are not import options.
    pub fn apply_field(&mut self, name: &str, value: &str) -> Result<bool, ApiError> {
        let value = value.trim();
        match name {
            "scale" => {
                let scale = parse_number(name, value)?;
                if scale <= 0.0 {
                    return Err(invalid(name, "must be greater than zero"));
                }
                self.scale = scale;
            }
            "origin_x" => self.origin_x = parse_number(name, value)?,
            "origin_y" => self.origin_y = parse_number(name, value)?,
            "origin_z" => self.origin_z = parse_number(name, value)?,
            "separate_materials" => self.separate_materials = parse_flag(name, value)?,
            "viewport_clip" => self.viewport_clip = parse_flag(name, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Settings for the geometry importer.
    pub fn to_settings(&self) -> ImportSettings {
        ImportSettings {
            scale: self.scale,
            origin: CoordinateShift::new(self.origin_x, self.origin_y, self.origin_z),
            separate_materials: self.separate_materials,
            viewport_clip: self.viewport_clip,
        }
    }

    /// Stable text form used when deriving cache keys.
    pub fn fingerprint(&self) -> String {
        format!(
            "scale={:e};origin={:e},{:e},{:e};separate={};clip={}",
            self.scale,
            self.origin_x,
            self.origin_y,
            self.origin_z,
            self.separate_materials,
            self.viewport_clip
        )
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidOption {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64, ApiError> {
    let number: f64 = value
        .parse()
        .map_err(|_| invalid(field, format!("'{}' is not a number", value)))?;
    if !number.is_finite() {
        return Err(invalid(field, "must be finite"));
    }
    Ok(number)
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(field, format!("'{}' is not a boolean", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_importer() {
        let options = ImportOptions::default();
        assert_eq!(options.to_settings(), ImportSettings::default());
        assert_eq!(options.scale, 0.1);
        assert!(options.separate_materials);
    }

    #[test]
    fn test_apply_fields() {
        let mut options = ImportOptions::default();
        assert!(options.apply_field("scale", " 0.001 ").unwrap());
        assert!(options.apply_field("origin_x", "5000").unwrap());
        assert!(options.apply_field("origin_z", "-12.5").unwrap());
        assert!(options.apply_field("separate_materials", "false").unwrap());
        assert!(options.apply_field("viewport_clip", "On").unwrap());
        assert!(!options.apply_field("comment", "anything").unwrap());

        let settings = options.to_settings();
        assert_eq!(settings.scale, 0.001);
        assert_eq!(settings.origin, CoordinateShift::new(5000.0, 0.0, -12.5));
        assert!(!settings.separate_materials);
        assert!(settings.viewport_clip);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut options = ImportOptions::default();
        assert!(matches!(
            options.apply_field("scale", "big"),
            Err(ApiError::InvalidOption { .. })
        ));
        assert!(options.apply_field("scale", "0").is_err());
        assert!(options.apply_field("origin_y", "inf").is_err());
        assert!(options.apply_field("viewport_clip", "maybe").is_err());
        assert_eq!(options, ImportOptions::default());
    }

    #[test]
    fn test_fingerprint_tracks_settings() {
        let a = ImportOptions::default();
        let mut b = a;
        b.apply_field("origin_y", "1").unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), ImportOptions::default().fingerprint());
    }
}
