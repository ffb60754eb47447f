// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface materials
//!
//! Imported meshes carry exactly two material slots: slot 0 for walls (and
//! every other non-roof surface), slot 1 for roofs.

use crate::error::{Error, Result};

/// Default wall color (light gray)
pub const WALL_MATERIAL_COLOR: &str = "#c9c9c9";

/// Default roof color (brick red)
pub const ROOF_MATERIAL_COLOR: &str = "#a62f20";

/// Per-face material selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaterialTag {
    Wall = 0,
    Roof = 1,
}

impl MaterialTag {
    /// Material slot this tag selects
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Flat-shaded surface material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// RGBA in 0-1 range
    pub diffuse_color: [f32; 4],
    pub specular_intensity: f32,
    pub roughness: f32,
}

impl Material {
    /// Matte material from a `#rrggbb` color
    pub fn matte(name: impl Into<String>, hex_color: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            diffuse_color: hex_to_rgba(hex_color)?,
            specular_intensity: 0.0,
            roughness: 1.0,
        })
    }
}

/// The wall and roof materials shared by every mesh of an import
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPair {
    pub wall: Material,
    pub roof: Material,
}

impl MaterialPair {
    pub fn new(wall_color: &str, roof_color: &str) -> Result<Self> {
        Ok(Self {
            wall: Material::matte("Wall_Material", wall_color)?,
            roof: Material::matte("Roof_Material", roof_color)?,
        })
    }

    /// Materials in slot order
    #[inline]
    pub fn slots(&self) -> [&Material; 2] {
        [&self.wall, &self.roof]
    }
}

impl Default for MaterialPair {
    fn default() -> Self {
        let matte = |name: &str, rgb: [u8; 3]| Material {
            name: name.to_string(),
            diffuse_color: rgb_to_rgba(rgb),
            specular_intensity: 0.0,
            roughness: 1.0,
        };
        Self {
            wall: matte("Wall_Material", [0xc9, 0xc9, 0xc9]),
            roof: matte("Roof_Material", [0xa6, 0x2f, 0x20]),
        }
    }
}

#[inline]
fn rgb_to_rgba(rgb: [u8; 3]) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        1.0,
    ]
}

/// Convert `#rrggbb` (leading `#` optional) to normalized RGBA with alpha 1
pub fn hex_to_rgba(hex_color: &str) -> Result<[f32; 4]> {
    let hex = hex_color.strip_prefix('#').unwrap_or(hex_color);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(Error::InvalidColor(hex_color.to_string()));
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| Error::InvalidColor(hex_color.to_string()))?;
    }
    Ok(rgb_to_rgba(rgb))
}
