//! Light sources and the enabled-light list

use crate::core::limits::MAX_LIGHTS;
use crate::error::{GlError, GlResult};
use crate::foundation::collections::IndexLinks;
use crate::foundation::math::{utils, Vec3, Vec4};

/// A single light parameter, as passed to `Context::light`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightParam {
    /// Ambient intensity
    Ambient(Vec4),
    /// Diffuse intensity
    Diffuse(Vec4),
    /// Specular intensity
    Specular(Vec4),
    /// Position in object space; `w == 0` makes the light directional
    Position(Vec4),
    /// Spot direction in object space
    SpotDirection(Vec3),
    /// Spot exponent in `[0, 128]`
    SpotExponent(f32),
    /// Spot cutoff angle in degrees: `[0, 90]`, or 180 for no spot
    SpotCutoff(f32),
    /// Constant attenuation, `>= 0`
    ConstantAttenuation(f32),
    /// Linear attenuation, `>= 0`
    LinearAttenuation(f32),
    /// Quadratic attenuation, `>= 0`
    QuadraticAttenuation(f32),
}

/// A light source
///
/// Position and spot direction are stored in eye space, as they were at the
/// time they were set.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Ambient intensity
    pub ambient: Vec4,
    /// Diffuse intensity
    pub diffuse: Vec4,
    /// Specular intensity
    pub specular: Vec4,
    position: Vec4,
    spot_direction: Vec3,
    spot_exponent: f32,
    spot_cutoff: f32,
    attenuation: [f32; 3],

    // Derived
    norm_position: Vec3,
    norm_spot_direction: Vec3,
    cos_spot_cutoff: f32,
}

impl Light {
    /// Default parameters for light number `index`
    ///
    /// Light 0 starts with white diffuse and specular, the others black.
    pub fn new(index: usize) -> Self {
        let bright = if index == 0 {
            Vec4::new(1.0, 1.0, 1.0, 1.0)
        } else {
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        };
        let mut light = Self {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: bright,
            specular: bright,
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            spot_direction: Vec3::new(0.0, 0.0, -1.0),
            spot_exponent: 0.0,
            spot_cutoff: 180.0,
            attenuation: [1.0, 0.0, 0.0],
            norm_position: Vec3::zeros(),
            norm_spot_direction: Vec3::zeros(),
            cos_spot_cutoff: -1.0,
        };
        light.update_derived();
        light
    }

    fn update_derived(&mut self) {
        self.norm_position = utils::normalize_or_zero(self.position.xyz());
        self.norm_spot_direction = utils::normalize_or_zero(self.spot_direction);
        self.cos_spot_cutoff = if self.has_spot() {
            self.spot_cutoff.to_radians().cos()
        } else {
            -1.0
        };
    }

    /// Apply one parameter, validating its range
    ///
    /// Geometric parameters are expected already in eye space.
    pub fn set(&mut self, param: LightParam) -> GlResult<()> {
        match param {
            LightParam::Ambient(c) => self.ambient = c,
            LightParam::Diffuse(c) => self.diffuse = c,
            LightParam::Specular(c) => self.specular = c,
            LightParam::Position(p) => self.position = p,
            LightParam::SpotDirection(d) => self.spot_direction = d,
            LightParam::SpotExponent(e) => {
                if !(0.0..=128.0).contains(&e) {
                    return Err(GlError::InvalidValue(format!("spot exponent {e}")));
                }
                self.spot_exponent = e;
            }
            LightParam::SpotCutoff(c) => {
                if c != 180.0 && !(0.0..=90.0).contains(&c) {
                    return Err(GlError::InvalidValue(format!("spot cutoff {c}")));
                }
                self.spot_cutoff = c;
            }
            LightParam::ConstantAttenuation(k)
            | LightParam::LinearAttenuation(k)
            | LightParam::QuadraticAttenuation(k)
                if k < 0.0 =>
            {
                return Err(GlError::InvalidValue(format!("attenuation {k}")));
            }
            LightParam::ConstantAttenuation(k) => self.attenuation[0] = k,
            LightParam::LinearAttenuation(k) => self.attenuation[1] = k,
            LightParam::QuadraticAttenuation(k) => self.attenuation[2] = k,
        }
        self.update_derived();
        Ok(())
    }

    /// Eye-space position
    pub fn position(&self) -> Vec4 {
        self.position
    }

    /// True for lights at infinity (`w == 0`)
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    /// Normalized direction toward a directional light
    pub fn direction(&self) -> Vec3 {
        self.norm_position
    }

    /// Whether a spot cone is configured
    pub fn has_spot(&self) -> bool {
        self.spot_cutoff != 180.0
    }

    /// Normalized eye-space spot direction
    pub fn spot_direction(&self) -> Vec3 {
        self.norm_spot_direction
    }

    /// Spot exponent
    pub fn spot_exponent(&self) -> f32 {
        self.spot_exponent
    }

    /// Spot cutoff in degrees
    pub fn spot_cutoff(&self) -> f32 {
        self.spot_cutoff
    }

    /// Cosine of the spot cutoff; -1 when there is no spot
    pub fn cos_spot_cutoff(&self) -> f32 {
        self.cos_spot_cutoff
    }

    /// `[constant, linear, quadratic]` attenuation
    pub fn attenuation(&self) -> [f32; 3] {
        self.attenuation
    }
}

/// Fixed array of lights with the enabled ones threaded into a list
#[derive(Debug, Clone)]
pub struct LightTable {
    lights: Vec<Light>,
    enabled: IndexLinks,
}

impl Default for LightTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LightTable {
    /// `MAX_LIGHTS` lights at their defaults, none enabled
    pub fn new() -> Self {
        Self {
            lights: (0..MAX_LIGHTS).map(Light::new).collect(),
            enabled: IndexLinks::new(MAX_LIGHTS),
        }
    }

    fn check(&self, index: usize) -> GlResult<()> {
        if index < self.lights.len() {
            Ok(())
        } else {
            Err(GlError::InvalidLight(index))
        }
    }

    /// Light number `index`
    pub fn get(&self, index: usize) -> GlResult<&Light> {
        self.check(index)?;
        Ok(&self.lights[index])
    }

    /// Set a parameter of light `index`
    pub fn set(&mut self, index: usize, param: LightParam) -> GlResult<()> {
        self.check(index)?;
        self.lights[index].set(param)
    }

    /// Enable or disable light `index`
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> GlResult<()> {
        self.check(index)?;
        let changed = if enabled {
            self.enabled.link(index)
        } else {
            self.enabled.unlink(index)
        };
        if changed {
            log::trace!("Light {index} {}", if enabled { "enabled" } else { "disabled" });
        }
        Ok(())
    }

    /// Whether light `index` is enabled
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.contains(index)
    }

    /// Indices of enabled lights in traversal order
    pub fn enabled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.enabled.iter()
    }

    /// Enabled lights in traversal order
    pub fn enabled(&self) -> impl Iterator<Item = &Light> + '_ {
        self.enabled.iter().map(move |i| &self.lights[i])
    }

    /// Number of enabled lights
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_follow_light_number() {
        let table = LightTable::new();
        assert_eq!(table.get(0).unwrap().diffuse, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(table.get(1).unwrap().diffuse, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(table.get(0).unwrap().is_directional());
        assert!(!table.get(0).unwrap().has_spot());
        assert!(matches!(table.get(MAX_LIGHTS), Err(GlError::InvalidLight(32))));
    }

    #[test]
    fn test_spot_cutoff_derives_cosine() {
        let mut light = Light::new(0);
        light.set(LightParam::SpotCutoff(60.0)).unwrap();
        assert!(light.has_spot());
        assert_relative_eq!(light.cos_spot_cutoff(), 0.5, epsilon = 1e-6);
        light.set(LightParam::SpotCutoff(180.0)).unwrap();
        assert_eq!(light.cos_spot_cutoff(), -1.0);
    }

    #[test]
    fn test_out_of_range_values_leave_light_unchanged() {
        let mut light = Light::new(0);
        assert!(light.set(LightParam::SpotCutoff(120.0)).is_err());
        assert!(light.set(LightParam::SpotExponent(200.0)).is_err());
        assert!(light.set(LightParam::LinearAttenuation(-1.0)).is_err());
        assert_eq!(light, Light::new(0));
    }

    #[test]
    fn test_spot_direction_is_normalized() {
        let mut light = Light::new(0);
        light
            .set(LightParam::SpotDirection(Vec3::new(0.0, 3.0, 4.0)))
            .unwrap();
        assert_relative_eq!(light.spot_direction(), Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_enable_disable_reverse_order_empties_list() {
        let mut table = LightTable::new();
        for i in 0..5 {
            table.set_enabled(i, true).unwrap();
        }
        assert_eq!(table.enabled_indices().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
        for i in (0..5).rev() {
            table.set_enabled(i, false).unwrap();
            assert!(!table.enabled_indices().any(|e| e == i));
        }
        assert_eq!(table.enabled_count(), 0);
    }

    #[test]
    fn test_enable_twice_links_once() {
        let mut table = LightTable::new();
        table.set_enabled(3, true).unwrap();
        table.set_enabled(3, true).unwrap();
        assert_eq!(table.enabled_count(), 1);
        table.set_enabled(3, false).unwrap();
        table.set_enabled(3, false).unwrap();
        assert_eq!(table.enabled_count(), 0);
    }
}
