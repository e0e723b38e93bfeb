//! Public pipeline entry points
//!
//! Recordable calls build an [`Op`] and go through `submit`. List management,
//! texture name management, selection setup and queries always run
//! immediately.

use std::rc::Rc;

use super::Context;
use crate::command::{ListMode, Op};
use crate::core::config::ContextConfig;
use crate::error::{GlError, GlResult};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::clip::Viewport;
use crate::render::framebuffer::FrameBuffer;
use crate::render::lighting::{LightModelParam, LightParam, MaterialParam, SpecularStats};
use crate::render::matrix::MatrixMode;
use crate::render::selection::SelectionHit;
use crate::render::state::{
    BlendFactor, Capability, ClearMask, ColorMaterialMode, CompareFunc, Face, FrontFace,
    PolygonMode, Primitive, RenderMode, ShadeModel, TexFilter, TexFormat,
};

impl Context<'_> {
    // Primitives and current attributes

    /// Open a primitive
    pub fn begin(&mut self, kind: Primitive) -> GlResult<()> {
        self.submit(Op::Begin(kind))
    }

    /// Close the open primitive
    pub fn end(&mut self) -> GlResult<()> {
        self.submit(Op::End)
    }

    /// Vertex with `z = 0`, `w = 1`
    pub fn vertex2(&mut self, x: f32, y: f32) -> GlResult<()> {
        self.vertex4(x, y, 0.0, 1.0)
    }

    /// Vertex with `w = 1`
    pub fn vertex3(&mut self, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.vertex4(x, y, z, 1.0)
    }

    /// Homogeneous vertex
    pub fn vertex4(&mut self, x: f32, y: f32, z: f32, w: f32) -> GlResult<()> {
        self.submit(Op::Vertex(Vec4::new(x, y, z, w)))
    }

    /// Opaque current color
    pub fn color3(&mut self, r: f32, g: f32, b: f32) -> GlResult<()> {
        self.color4(r, g, b, 1.0)
    }

    /// Current color
    pub fn color4(&mut self, r: f32, g: f32, b: f32, a: f32) -> GlResult<()> {
        self.submit(Op::Color(Vec4::new(r, g, b, a)))
    }

    /// Current normal
    pub fn normal3(&mut self, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.submit(Op::Normal(Vec3::new(x, y, z)))
    }

    /// Current texture coordinate with `r = 0`, `q = 1`
    pub fn tex_coord2(&mut self, s: f32, t: f32) -> GlResult<()> {
        self.tex_coord4(s, t, 0.0, 1.0)
    }

    /// Current texture coordinate
    pub fn tex_coord4(&mut self, s: f32, t: f32, r: f32, q: f32) -> GlResult<()> {
        self.submit(Op::TexCoord(Vec4::new(s, t, r, q)))
    }

    /// Whether following vertices start boundary edges
    pub fn edge_flag(&mut self, flag: bool) -> GlResult<()> {
        self.submit(Op::EdgeFlag(flag))
    }

    // Matrices

    /// Select the stack that matrix calls operate on
    pub fn matrix_mode(&mut self, mode: MatrixMode) -> GlResult<()> {
        self.submit(Op::MatrixMode(mode))
    }

    /// Replace the current matrix with the identity
    pub fn load_identity(&mut self) -> GlResult<()> {
        self.submit(Op::LoadIdentity)
    }

    /// Replace the current matrix; `m` is column-major
    pub fn load_matrix(&mut self, m: &[f32; 16]) -> GlResult<()> {
        self.submit(Op::LoadMatrix(Mat4::from_gl(m)))
    }

    /// Post-multiply the current matrix; `m` is column-major
    pub fn mult_matrix(&mut self, m: &[f32; 16]) -> GlResult<()> {
        self.submit(Op::MultMatrix(Mat4::from_gl(m)))
    }

    /// Duplicate the top of the current stack
    pub fn push_matrix(&mut self) -> GlResult<()> {
        self.submit(Op::PushMatrix)
    }

    /// Discard the top of the current stack
    pub fn pop_matrix(&mut self) -> GlResult<()> {
        self.submit(Op::PopMatrix)
    }

    /// Multiply by a translation
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.submit(Op::Translate(Vec3::new(x, y, z)))
    }

    /// Multiply by a rotation of `angle` degrees about `(x, y, z)`
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.submit(Op::Rotate(angle, Vec3::new(x, y, z)))
    }

    /// Multiply by a scale
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.submit(Op::Scale(Vec3::new(x, y, z)))
    }

    /// Multiply by a perspective projection
    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> GlResult<()> {
        self.submit(Op::Frustum([left, right, bottom, top, near, far]))
    }

    /// Multiply by an orthographic projection
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> GlResult<()> {
        self.submit(Op::Ortho([left, right, bottom, top, near, far]))
    }

    /// Top of the `mode` stack, column-major
    pub fn get_matrix(&self, mode: MatrixMode) -> [f32; 16] {
        self.matrices.top(mode).to_gl()
    }

    /// Depth of the `mode` stack
    pub fn matrix_depth(&self, mode: MatrixMode) -> usize {
        self.matrices.stack(mode).depth()
    }

    // Viewport and capabilities

    /// Map normalized device coordinates to the window rectangle
    ///
    /// `y` is measured from the top of the frame buffer.
    pub fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> GlResult<()> {
        self.submit(Op::Viewport(x, y, width, height))
    }

    /// Current viewport
    pub fn current_viewport(&self) -> Viewport {
        self.viewport
    }

    /// Turn a capability on
    pub fn enable(&mut self, cap: impl Into<Capability>) -> GlResult<()> {
        self.submit(Op::Enable(cap.into()))
    }

    /// Turn a capability off
    pub fn disable(&mut self, cap: impl Into<Capability>) -> GlResult<()> {
        self.submit(Op::Disable(cap.into()))
    }

    /// Whether a capability is on
    pub fn is_enabled(&self, cap: impl Into<Capability>) -> bool {
        match cap.into() {
            Capability::Feature(f) => self.features.contains(f),
            Capability::Light(index) => self.lighting.lights.is_enabled(index),
        }
    }

    // Lighting

    /// Set a light parameter; position and spot direction are taken through
    /// the current model-view matrix
    pub fn light(&mut self, index: usize, param: LightParam) -> GlResult<()> {
        self.submit(Op::Light(index, param))
    }

    /// Set a light model parameter
    pub fn light_model(&mut self, param: LightModelParam) -> GlResult<()> {
        self.submit(Op::LightModel(param))
    }

    /// Set a material parameter on one or both faces
    pub fn material(&mut self, face: Face, param: MaterialParam) -> GlResult<()> {
        self.submit(Op::Material(face, param))
    }

    /// Choose which material property tracks the current color
    pub fn color_material(&mut self, face: Face, mode: ColorMaterialMode) -> GlResult<()> {
        self.submit(Op::ColorMaterial(face, mode))
    }

    /// Flat or smooth shading
    pub fn shade_model(&mut self, model: ShadeModel) -> GlResult<()> {
        self.submit(Op::ShadeModel(model))
    }

    /// Enabled light indices, most recently enabled first
    pub fn enabled_lights(&self) -> Vec<usize> {
        self.lighting.lights.enabled_indices().collect()
    }

    /// Counters of the specular table cache
    pub fn specular_stats(&self) -> SpecularStats {
        self.lighting.specular_cache().stats()
    }

    // Polygons

    /// Faces discarded when culling is enabled
    pub fn cull_face(&mut self, face: Face) -> GlResult<()> {
        self.submit(Op::CullFace(face))
    }

    /// Winding of front faces
    pub fn front_face(&mut self, winding: FrontFace) -> GlResult<()> {
        self.submit(Op::FrontFace(winding))
    }

    /// Fill, outline or vertex rendering per face
    pub fn polygon_mode(&mut self, face: Face, mode: PolygonMode) -> GlResult<()> {
        self.submit(Op::PolygonMode(face, mode))
    }

    /// Depth offset of polygons: `factor * slope + units * 2^-24`
    pub fn polygon_offset(&mut self, factor: f32, units: f32) -> GlResult<()> {
        self.submit(Op::PolygonOffset(factor, units))
    }

    // Fragment operations

    /// Depth comparison
    pub fn depth_func(&mut self, func: CompareFunc) -> GlResult<()> {
        self.submit(Op::DepthFunc(func))
    }

    /// Enable or disable depth writes
    pub fn depth_mask(&mut self, on: bool) -> GlResult<()> {
        self.submit(Op::DepthMask(on))
    }

    /// Alpha comparison against `reference`, clamped to `[0, 1]`
    pub fn alpha_func(&mut self, func: CompareFunc, reference: f32) -> GlResult<()> {
        self.submit(Op::AlphaFunc(func, reference))
    }

    /// Blend factors
    pub fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> GlResult<()> {
        self.submit(Op::BlendFunc(src, dst))
    }

    /// Per-channel color writes
    pub fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) -> GlResult<()> {
        self.submit(Op::ColorMask([r, g, b, a]))
    }

    /// Color used by `clear`
    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) -> GlResult<()> {
        self.submit(Op::ClearColor(Vec4::new(r, g, b, a)))
    }

    /// Depth used by `clear`, clamped to `[0, 1]`
    pub fn clear_depth(&mut self, depth: f32) -> GlResult<()> {
        self.submit(Op::ClearDepth(depth))
    }

    /// Clear the selected planes of the whole frame buffer
    pub fn clear(&mut self, mask: ClearMask) -> GlResult<()> {
        self.submit(Op::Clear(mask))
    }

    // Textures

    /// Make `handle` the current texture, creating it if unknown
    pub fn bind_texture(&mut self, handle: u32) -> GlResult<()> {
        self.submit(Op::BindTexture(handle))
    }

    /// Upload one level of the bound texture
    ///
    /// The image is resampled to the context's internal texture size for
    /// that level.
    pub fn tex_image_2d(
        &mut self,
        level: usize,
        format: TexFormat,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> GlResult<()> {
        self.submit(Op::TexImage2D {
            level,
            format,
            width,
            height,
            data: Rc::from(pixels),
        })
    }

    /// Resample filter used by following uploads
    pub fn tex_parameter(&mut self, filter: TexFilter) -> GlResult<()> {
        self.submit(Op::TexFilter(filter))
    }

    /// `n` unused texture handles, all above every handle in use
    pub fn gen_textures(&mut self, n: usize) -> GlResult<Vec<u32>> {
        self.outside_primitive("gen_textures between begin and end")?;
        let first = self.textures.handles().max().map_or(1, |h| h.saturating_add(1));
        let handles: Vec<u32> = (0..n)
            .filter_map(|i| u32::try_from(i).ok().and_then(|i| first.checked_add(i)))
            .collect();
        if handles.len() < n {
            return Err(self.report(GlError::InvalidValue(format!("cannot generate {n} texture handles"))));
        }
        for &h in &handles {
            self.textures.alloc(h);
        }
        Ok(handles)
    }

    /// Free textures; the default texture 0 is kept
    ///
    /// Deleting the bound texture rebinds texture 0.
    pub fn delete_textures(&mut self, handles: &[u32]) -> GlResult<()> {
        self.outside_primitive("delete_textures between begin and end")?;
        for &h in handles.iter().filter(|&&h| h != 0) {
            if self.textures.free(h) && self.bound_texture == h {
                self.bound_texture = 0;
            }
        }
        Ok(())
    }

    /// Currently bound texture handle
    pub fn bound_texture(&self) -> u32 {
        self.bound_texture
    }

    /// Whether `handle` names a texture
    pub fn is_texture(&self, handle: u32) -> bool {
        self.textures.contains(handle)
    }

    // Display lists

    /// Start compiling list `name`
    pub fn new_list(&mut self, name: u32, mode: ListMode) -> GlResult<()> {
        self.outside_primitive("new_list between begin and end")?;
        self.start_list(name, mode).map_err(|e| self.report(e))
    }

    /// Store the list being compiled
    pub fn end_list(&mut self) -> GlResult<()> {
        self.outside_primitive("end_list between begin and end")?;
        self.finish_list().map_err(|e| self.report(e))
    }

    /// Execute list `name`
    pub fn call_list(&mut self, name: u32) -> GlResult<()> {
        self.submit(Op::CallList(name))
    }

    /// Reserve `range` consecutive unused list names; returns the first
    pub fn gen_lists(&mut self, range: u32) -> GlResult<u32> {
        self.outside_primitive("gen_lists between begin and end")?;
        let slots = self.config.op_buffer_slots;
        self.lists.gen_lists(range, slots).ok_or_else(|| {
            self.report(GlError::InvalidValue(format!("no run of {range} free list names")))
        })
    }

    /// Whether `name` holds a list
    pub fn is_list(&self, name: u32) -> bool {
        self.lists.is_list(name)
    }

    /// Delete `range` lists starting at `first`
    pub fn delete_lists(&mut self, first: u32, range: u32) -> GlResult<()> {
        self.outside_primitive("delete_lists between begin and end")?;
        self.lists.delete(first, range);
        Ok(())
    }

    // Selection

    /// Size the selection buffer in words
    pub fn select_buffer(&mut self, words: usize) -> GlResult<()> {
        self.outside_primitive("select_buffer between begin and end")?;
        if self.render_mode == RenderMode::Select {
            return Err(self.report(GlError::InvalidOperation("select_buffer while selecting")));
        }
        self.selection.set_buffer(words);
        Ok(())
    }

    /// Switch between rendering and selection
    ///
    /// Leaving selection mode returns the number of hit records, negated if
    /// the buffer overflowed; every other switch returns 0.
    pub fn render_mode(&mut self, mode: RenderMode) -> GlResult<i64> {
        self.outside_primitive("render_mode between begin and end")?;
        let hits = match self.render_mode {
            RenderMode::Select => self.selection.end(),
            RenderMode::Render => 0,
        };
        if mode == RenderMode::Select {
            self.selection.begin();
        }
        log::debug!("Render mode {:?} -> {mode:?}", self.render_mode);
        self.render_mode = mode;
        Ok(hits)
    }

    /// Current render mode
    pub fn current_render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Empty the name stack
    pub fn init_names(&mut self) -> GlResult<()> {
        self.submit(Op::InitNames)
    }

    /// Push a name
    pub fn push_name(&mut self, name: u32) -> GlResult<()> {
        self.submit(Op::PushName(name))
    }

    /// Pop a name
    pub fn pop_name(&mut self) -> GlResult<()> {
        self.submit(Op::PopName)
    }

    /// Replace the top name
    pub fn load_name(&mut self, name: u32) -> GlResult<()> {
        self.submit(Op::LoadName(name))
    }

    /// Raw words of the selection buffer
    pub fn selection_buffer(&self) -> &[u32] {
        self.selection.buffer()
    }

    /// Decoded selection records
    pub fn selection_hits(&self) -> Vec<SelectionHit> {
        self.selection.hits()
    }

    // Queries

    /// The frame buffer being drawn into
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &*self.fb
    }

    /// Creation-time configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Whether a list is being compiled
    pub fn is_compiling(&self) -> bool {
        self.recorder.is_some()
    }
}

