//! Per-vertex lighting
//!
//! Lighting runs in eye space once per vertex. Only lights on the enabled
//! list are visited. The result is
//!
//! ```text
//! emission + ambient_material * ambient_model
//!   + sum over lights of att * spot * (ambient + diffuse + specular)
//! ```
//!
//! clamped to `[0, 1]`, with alpha taken from the diffuse material.

pub mod light;
pub mod material;
pub mod specular;

pub use light::{Light, LightParam, LightTable};
pub use material::{ColorMaterial, LightModel, LightModelParam, Material, MaterialParam};
pub use specular::{SpecularCache, SpecularStats, SpecularTable};

use crate::error::GlResult;
use crate::foundation::math::{utils, Vec3, Vec4};
use crate::render::state::Face;

/// Lights, materials and light model owned by a context
#[derive(Debug)]
pub struct LightingState {
    /// Light table and enabled list
    pub lights: LightTable,
    /// Front material
    pub front: Material,
    /// Back material, used by two-sided lighting
    pub back: Material,
    /// Global light model
    pub model: LightModel,
    /// Color material binding
    pub color_material: ColorMaterial,
    specular: SpecularCache,
}

impl LightingState {
    /// Default lighting state with a specular pool of `specular_buffers` tables
    pub fn new(specular_buffers: usize) -> Self {
        Self {
            lights: LightTable::new(),
            front: Material::default(),
            back: Material::default(),
            model: LightModel::default(),
            color_material: ColorMaterial::default(),
            specular: SpecularCache::new(specular_buffers),
        }
    }

    /// The specular cache
    pub fn specular_cache(&self) -> &SpecularCache {
        &self.specular
    }

    /// Release cached specular tables
    pub fn release(&mut self) {
        self.specular.clear();
    }

    /// Apply a material parameter to the selected faces
    pub fn set_material(&mut self, face: Face, param: MaterialParam) -> GlResult<()> {
        // Validate against a scratch copy so a failure changes neither face.
        let mut front = self.front.clone();
        let mut back = self.back.clone();
        if face.includes_front() {
            front.set(param)?;
        }
        if face.includes_back() {
            back.set(param)?;
        }
        self.front = front;
        self.back = back;
        Ok(())
    }

    /// Route the current color into the color-material property
    pub fn apply_color_material(&mut self, color: Vec4) {
        let cm = self.color_material;
        // Color parameters cannot fail validation.
        let _ = self.set_material(cm.face, cm.param(color));
    }

    /// Front and back colors for a vertex
    ///
    /// `normal` and `eye` are in eye space. The back color equals the front
    /// color unless two-sided lighting is on.
    pub fn shade(&mut self, normal: &Vec3, eye: &Vec4) -> (Vec4, Vec4) {
        let front = shade_vertex(
            &self.lights,
            &self.model,
            &self.front,
            normal,
            eye,
            &mut self.specular,
        );
        let back = if self.model.two_side {
            shade_vertex(
                &self.lights,
                &self.model,
                &self.back,
                &-normal,
                eye,
                &mut self.specular,
            )
        } else {
            front
        };
        (front, back)
    }
}

/// Evaluate the lighting equation for one vertex and one material
pub fn shade_vertex(
    lights: &LightTable,
    model: &LightModel,
    material: &Material,
    normal: &Vec3,
    eye: &Vec4,
    cache: &mut SpecularCache,
) -> Vec4 {
    let mut rgb = material.emission.xyz() + material.ambient.xyz().component_mul(&model.ambient.xyz());

    let eye_point = if eye.w != 0.0 && eye.w != 1.0 {
        eye.xyz() / eye.w
    } else {
        eye.xyz()
    };
    let view = if model.local_viewer {
        utils::normalize_or_zero(eye_point)
    } else {
        Vec3::zeros()
    };

    for light in lights.enabled() {
        let (dir, att) = if light.is_directional() {
            (light.direction(), 1.0)
        } else {
            let pos = light.position();
            let pos = if pos.w == 1.0 { pos.xyz() } else { pos.xyz() / pos.w };
            let to_light = pos - eye_point;
            let dist = to_light.norm();
            let dir = utils::normalize_or_zero(to_light);
            let mut att = attenuation(light.attenuation(), dist);

            if light.has_spot() {
                let dot_spot = -dir.dot(&light.spot_direction());
                if dot_spot < light.cos_spot_cutoff() {
                    continue;
                }
                if light.spot_exponent() > 0.0 {
                    att *= dot_spot.max(0.0).powf(light.spot_exponent());
                }
            }
            (dir, att)
        };

        let mut contrib = light.ambient.xyz().component_mul(&material.ambient.xyz());

        let n_dot_l = normal.dot(&dir);
        if n_dot_l > 0.0 {
            contrib += light.diffuse.xyz().component_mul(&material.diffuse.xyz()) * n_dot_l;

            if material.has_specular() {
                let half = if model.local_viewer {
                    dir - view
                } else {
                    dir + Vec3::new(0.0, 0.0, 1.0)
                };
                let half = utils::normalize_or_zero(half);
                let n_dot_h = normal.dot(&half);
                if n_dot_h > 0.0 {
                    let table = cache.get(material.shininess_index(), material.shininess());
                    let factor = table.lookup(n_dot_h);
                    contrib += light.specular.xyz().component_mul(&material.specular().xyz()) * factor;
                }
            }
        }

        rgb += contrib * att;
    }

    Vec4::new(
        rgb.x.clamp(0.0, 1.0),
        rgb.y.clamp(0.0, 1.0),
        rgb.z.clamp(0.0, 1.0),
        material.diffuse.w.clamp(0.0, 1.0),
    )
}

#[inline]
fn attenuation(k: [f32; 3], dist: f32) -> f32 {
    let denom = k[0] + dist * (k[1] + dist * k[2]);
    if denom > f32::EPSILON {
        1.0 / denom
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn black_model() -> LightModel {
        LightModel {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ..LightModel::default()
        }
    }

    #[test]
    fn test_unlit_scene_is_emission_plus_ambient() {
        let mut state = LightingState::new(4);
        let (front, back) = state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        // 0.2 * 0.2 from the light model, no lights enabled.
        assert_relative_eq!(front, Vec4::new(0.04, 0.04, 0.04, 1.0), epsilon = EPSILON);
        assert_eq!(front, back);
    }

    #[test]
    fn test_directional_diffuse_follows_cosine() {
        let mut state = LightingState::new(4);
        state.model = black_model();
        state.lights.set_enabled(0, true).unwrap();

        let (facing, _) = state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        assert_relative_eq!(facing.x, 0.8, epsilon = EPSILON);

        let tilted = Vec3::new(0.0, 1.0, 1.0).normalize();
        let (lit, _) = state.shade(&tilted, &Vec4::new(0.0, 0.0, -5.0, 1.0));
        assert_relative_eq!(lit.x, 0.8 * std::f32::consts::FRAC_1_SQRT_2, epsilon = EPSILON);

        let (away, _) = state.shade(&-Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        assert_relative_eq!(away.x, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_specular_highlight_uses_cache() {
        let mut state = LightingState::new(4);
        state.model = black_model();
        state.lights.set_enabled(0, true).unwrap();
        state
            .set_material(Face::Front, MaterialParam::Specular(Vec4::new(1.0, 1.0, 1.0, 1.0)))
            .unwrap();
        state.set_material(Face::Front, MaterialParam::Shininess(16.0)).unwrap();

        let (c, _) = state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        // Diffuse 0.8 plus a full highlight, clamped.
        assert_relative_eq!(c.x, 1.0, epsilon = EPSILON);
        state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        let stats = state.specular_cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_positional_light_attenuates() {
        let mut state = LightingState::new(4);
        state.model = black_model();
        state.lights.set_enabled(0, true).unwrap();
        state
            .lights
            .set(0, LightParam::Position(Vec4::new(0.0, 0.0, 0.0, 1.0)))
            .unwrap();
        state.lights.set(0, LightParam::LinearAttenuation(1.0)).unwrap();

        // Vertex 3 units in front of the light, normal facing it: att = 1 / (1 + 3).
        let (c, _) = state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -3.0, 1.0));
        assert_relative_eq!(c.x, 0.8 / 4.0, epsilon = EPSILON);
    }

    #[test]
    fn test_outside_spot_cone_contributes_nothing() {
        let mut state = LightingState::new(4);
        state.model = black_model();
        state.lights.set_enabled(0, true).unwrap();
        state
            .lights
            .set(0, LightParam::Position(Vec4::new(0.0, 0.0, 0.0, 1.0)))
            .unwrap();
        state.lights.set(0, LightParam::SpotCutoff(10.0)).unwrap();
        state
            .lights
            .set(0, LightParam::Ambient(Vec4::new(1.0, 1.0, 1.0, 1.0)))
            .unwrap();

        let (inside, _) = state.shade(&Vec3::z(), &Vec4::new(0.0, 0.0, -3.0, 1.0));
        assert!(inside.x > 0.0);
        let (outside, _) = state.shade(&Vec3::z(), &Vec4::new(3.0, 0.0, -3.0, 1.0));
        assert_relative_eq!(outside, Vec4::new(0.0, 0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_two_sided_lighting_uses_back_material() {
        let mut state = LightingState::new(4);
        state.model = black_model();
        state.model.two_side = true;
        state.lights.set_enabled(0, true).unwrap();
        state
            .set_material(Face::Back, MaterialParam::Diffuse(Vec4::new(0.0, 1.0, 0.0, 1.0)))
            .unwrap();

        // Normal facing away from the light: only the back side is lit.
        let (front, back) = state.shade(&-Vec3::z(), &Vec4::new(0.0, 0.0, -5.0, 1.0));
        assert_relative_eq!(front.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(back.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(back.x, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_material_error_changes_neither_face() {
        let mut state = LightingState::new(1);
        assert!(state
            .set_material(Face::FrontAndBack, MaterialParam::Shininess(-1.0))
            .is_err());
        assert_eq!(state.front, Material::default());
        assert_eq!(state.back, Material::default());
    }
}
