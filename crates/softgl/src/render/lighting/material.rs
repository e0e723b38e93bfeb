//! Surface materials and the global light model

use crate::error::{GlError, GlResult};
use crate::foundation::math::Vec4;
use crate::render::lighting::specular::shininess_index;
use crate::render::state::{ColorMaterialMode, Face};

/// A single material parameter, as passed to `Context::material`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParam {
    /// Emitted color
    Emission(Vec4),
    /// Ambient reflectance
    Ambient(Vec4),
    /// Diffuse reflectance
    Diffuse(Vec4),
    /// Specular reflectance
    Specular(Vec4),
    /// Ambient and diffuse reflectance at once
    AmbientAndDiffuse(Vec4),
    /// Specular exponent in `[0, 128]`
    Shininess(f32),
}

/// Surface reflectance properties
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Emitted color
    pub emission: Vec4,
    /// Ambient reflectance
    pub ambient: Vec4,
    /// Diffuse reflectance; its alpha is the lit vertex alpha
    pub diffuse: Vec4,
    specular: Vec4,
    shininess: f32,
    shininess_index: usize,
    has_specular: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            shininess_index: 0,
            has_specular: false,
        }
    }
}

impl Material {
    /// Apply one parameter
    pub fn set(&mut self, param: MaterialParam) -> GlResult<()> {
        match param {
            MaterialParam::Emission(c) => self.emission = c,
            MaterialParam::Ambient(c) => self.ambient = c,
            MaterialParam::Diffuse(c) => self.diffuse = c,
            MaterialParam::Specular(c) => {
                self.specular = c;
                self.has_specular = c.x != 0.0 || c.y != 0.0 || c.z != 0.0;
            }
            MaterialParam::AmbientAndDiffuse(c) => {
                self.ambient = c;
                self.diffuse = c;
            }
            MaterialParam::Shininess(s) => {
                if !(0.0..=128.0).contains(&s) {
                    return Err(GlError::InvalidValue(format!("shininess {s}")));
                }
                self.shininess = s;
                self.shininess_index = shininess_index(s);
            }
        }
        Ok(())
    }

    /// Specular reflectance
    pub fn specular(&self) -> Vec4 {
        self.specular
    }

    /// Specular exponent
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Quantized shininess used to key the specular cache
    pub fn shininess_index(&self) -> usize {
        self.shininess_index
    }

    /// False when the specular color is black and the term can be skipped
    pub fn has_specular(&self) -> bool {
        self.has_specular
    }
}

/// Material property tracking the current color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMaterial {
    /// Faces whose material follows the color
    pub face: Face,
    /// Property that follows the color
    pub mode: ColorMaterialMode,
}

impl Default for ColorMaterial {
    fn default() -> Self {
        Self {
            face: Face::FrontAndBack,
            mode: ColorMaterialMode::AmbientAndDiffuse,
        }
    }
}

impl ColorMaterial {
    /// The material parameter to apply for `color`
    pub fn param(&self, color: Vec4) -> MaterialParam {
        match self.mode {
            ColorMaterialMode::Emission => MaterialParam::Emission(color),
            ColorMaterialMode::Ambient => MaterialParam::Ambient(color),
            ColorMaterialMode::Diffuse => MaterialParam::Diffuse(color),
            ColorMaterialMode::Specular => MaterialParam::Specular(color),
            ColorMaterialMode::AmbientAndDiffuse => MaterialParam::AmbientAndDiffuse(color),
        }
    }
}

/// A light-model parameter, as passed to `Context::light_model`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightModelParam {
    /// Scene ambient color
    Ambient(Vec4),
    /// Compute specular highlights from the actual eye direction
    LocalViewer(bool),
    /// Light back faces with the back material
    TwoSide(bool),
}

/// Global lighting settings
#[derive(Debug, Clone, PartialEq)]
pub struct LightModel {
    /// Scene ambient color
    pub ambient: Vec4,
    /// Local viewer for specular half vectors
    pub local_viewer: bool,
    /// Two-sided lighting
    pub two_side: bool,
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            local_viewer: false,
            two_side: false,
        }
    }
}

impl LightModel {
    /// Apply one parameter
    pub fn set(&mut self, param: LightModelParam) {
        match param {
            LightModelParam::Ambient(c) => self.ambient = c,
            LightModelParam::LocalViewer(on) => self.local_viewer = on,
            LightModelParam::TwoSide(on) => self.two_side = on,
        }
    }
}
