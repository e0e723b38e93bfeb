//! # Rendering Context
//!
//! The aggregate root of the pipeline. A [`Context`] borrows the embedder's
//! frame buffer for its whole lifetime and owns every other piece of state:
//! matrix stacks, lights and materials, textures, display lists, selection
//! and fragment state.
//!
//! Each public call is expressed as an [`Op`] and passed to `submit`, which
//! either executes it or appends it to the list being compiled. List replay
//! goes through the same `execute` dispatch, so recorded and immediate calls
//! behave identically.
//!
//! ## Errors
//!
//! A failing call returns the error, logs it and latches it in the context's
//! error slot until [`Context::get_error`] reads it. Only the first error since
//! the last read is kept. Failed calls leave state untouched.

mod api;
mod primitive;
mod vertex;

use crate::command::{DisplayList, ListMode, ListRecorder, ListTable, Op};
use crate::core::config::{ConfigError, ContextConfig};
use crate::error::{GlError, GlResult};
use crate::foundation::math::{Mat4, Mat4Ext, Vec4};
use crate::render::clip::Viewport;
use crate::render::framebuffer::{pack_color, FrameBuffer};
use crate::render::lighting::{LightParam, LightingState};
use crate::render::matrix::{MatrixMode, MatrixState};
use crate::render::raster::{FragmentState, Rasterizer};
use crate::render::selection::Selection;
use crate::render::state::{
    Capability, ClearMask, Face, Features, FrontFace, PolygonMode, RenderMode, ShadeModel,
    TexFilter,
};
use crate::render::texture::{self, TextureManager};

use vertex::{Current, PrimitiveState};

/// Embedder hooks
///
/// Replaces an untyped back-pointer: anything the embedder needs to react to
/// is a method here.
pub trait RenderHost {
    /// The viewport now needs `width x height` pixels of frame buffer
    ///
    /// Called whenever the viewport changes. Returning `Err` rejects the new
    /// viewport and the reason is reported as [`GlError::ViewportResize`].
    fn resize_viewport(
        &mut self,
        fb: &mut FrameBuffer,
        width: usize,
        height: usize,
    ) -> Result<(), String>;
}

/// Host that grows the frame buffer to fit the viewport and never shrinks it
#[derive(Debug, Default, Clone, Copy)]
pub struct GrowingHost;

impl RenderHost for GrowingHost {
    fn resize_viewport(
        &mut self,
        fb: &mut FrameBuffer,
        width: usize,
        height: usize,
    ) -> Result<(), String> {
        if width > fb.width() || height > fb.height() {
            fb.resize(width.max(fb.width()), height.max(fb.height()));
        }
        Ok(())
    }
}

/// A software rendering context bound to one frame buffer
pub struct Context<'fb> {
    fb: &'fb mut FrameBuffer,
    host: Box<dyn RenderHost + 'fb>,
    config: ContextConfig,

    features: Features,
    matrices: MatrixState,
    viewport: Viewport,
    lighting: LightingState,

    textures: TextureManager,
    bound_texture: u32,
    tex_filter: TexFilter,

    fragment: FragmentState,
    shade_model: ShadeModel,
    cull_face: Face,
    front_face: FrontFace,
    /// Front and back polygon modes
    polygon_mode: (PolygonMode, PolygonMode),
    /// `(factor, units)`
    polygon_offset: (f32, f32),
    clear_color: Vec4,
    clear_depth: f32,

    current: Current,
    primitive: Option<PrimitiveState>,

    render_mode: RenderMode,
    selection: Selection,

    lists: ListTable,
    recorder: Option<ListRecorder>,

    error: Option<GlError>,
    closed: bool,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("viewport", &self.viewport)
            .field("features", &self.features)
            .field("render_mode", &self.render_mode)
            .field("textures", &self.textures.len())
            .field("compiling", &self.recorder.as_ref().map(|r| r.name))
            .finish_non_exhaustive()
    }
}

impl<'fb> Context<'fb> {
    /// Create a context drawing into `fb`
    ///
    /// `max_texture_dimension` is rounded down to a power of two and is the
    /// edge length level-0 texture images are stored at.
    pub fn new(fb: &'fb mut FrameBuffer, max_texture_dimension: usize) -> Self {
        let dim = max_texture_dimension.max(1);
        let texture_size = 1usize << (usize::BITS - 1 - dim.leading_zeros());
        Self::build(fb, ContextConfig::new(texture_size), Box::new(GrowingHost))
    }

    /// Create a context from a validated configuration
    pub fn with_config(fb: &'fb mut FrameBuffer, config: &ContextConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(fb, config.clone(), Box::new(GrowingHost)))
    }

    /// Create a context with a custom embedder host
    pub fn with_host(
        fb: &'fb mut FrameBuffer,
        config: &ContextConfig,
        host: Box<dyn RenderHost + 'fb>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(fb, config.clone(), host))
    }

    fn build(fb: &'fb mut FrameBuffer, config: ContextConfig, host: Box<dyn RenderHost + 'fb>) -> Self {
        let viewport = Viewport::new(0, 0, fb.width(), fb.height());
        let mut textures = TextureManager::new();
        textures.alloc(0);

        log::debug!(
            "Context created: {}x{} frame buffer, texture size {}, {} list names",
            fb.width(),
            fb.height(),
            config.texture_size,
            config.max_display_lists
        );

        Self {
            fb,
            host,
            features: Features::empty(),
            matrices: MatrixState::new(),
            viewport,
            lighting: LightingState::new(config.specular_buffers),
            textures,
            bound_texture: 0,
            tex_filter: TexFilter::default(),
            fragment: FragmentState::default(),
            shade_model: ShadeModel::default(),
            cull_face: Face::Back,
            front_face: FrontFace::default(),
            polygon_mode: (PolygonMode::Fill, PolygonMode::Fill),
            polygon_offset: (0.0, 0.0),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 0.0),
            clear_depth: 1.0,
            current: Current::default(),
            primitive: None,
            render_mode: RenderMode::Render,
            selection: Selection::new(),
            lists: ListTable::new(config.max_display_lists),
            recorder: None,
            error: None,
            closed: false,
            config,
        }
    }

    /// Release textures, display lists and cached specular tables
    ///
    /// Also runs when the context is dropped; calling it twice is harmless.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.textures.clear();
        self.lists.clear();
        self.lighting.release();
        self.recorder = None;
        self.primitive = None;
        self.closed = true;
        log::debug!("Context closed");
    }

    /// Read and clear the first error raised since the last read
    pub fn get_error(&mut self) -> Option<GlError> {
        self.error.take()
    }

    /// Log an error and latch it if the slot is empty
    fn report(&mut self, err: GlError) -> GlError {
        log::warn!("{err}");
        if self.error.is_none() {
            self.error = Some(err.clone());
        }
        err
    }

    /// Reject calls that are never legal between `begin` and `end`
    fn outside_primitive(&mut self, what: &'static str) -> GlResult<()> {
        if self.primitive.is_some() {
            return Err(self.report(GlError::InvalidOperation(what)));
        }
        Ok(())
    }

    /// Record or execute an operation
    fn submit(&mut self, op: Op) -> GlResult<()> {
        if let Some(recorder) = self.recorder.as_mut() {
            match recorder.mode {
                ListMode::Compile => {
                    recorder.list.push(op);
                    return Ok(());
                }
                ListMode::CompileAndExecute => recorder.list.push(op.clone()),
            }
        }
        self.execute(&op).map_err(|e| self.report(e))
    }

    /// Run one operation against the live state
    fn execute(&mut self, op: &Op) -> GlResult<()> {
        if self.primitive.is_some() && !op.allowed_in_primitive() {
            return Err(GlError::InvalidOperation(
                "operation not allowed between begin and end",
            ));
        }

        match op {
            Op::Begin(kind) => self.begin_primitive(*kind),
            Op::End => self.end_primitive(),
            Op::Vertex(coord) => self.emit_vertex(*coord),
            Op::Color(c) => {
                self.current.color = *c;
                if self.features.contains(Features::COLOR_MATERIAL) {
                    self.lighting.apply_color_material(*c);
                }
                Ok(())
            }
            Op::Normal(n) => {
                self.current.normal = *n;
                Ok(())
            }
            Op::TexCoord(t) => {
                self.current.tex_coord = *t;
                Ok(())
            }
            Op::EdgeFlag(flag) => {
                self.current.edge_flag = *flag;
                Ok(())
            }

            Op::MatrixMode(mode) => {
                self.matrices.set_mode(*mode);
                Ok(())
            }
            Op::LoadIdentity => {
                self.matrices.load(Mat4::identity());
                Ok(())
            }
            Op::LoadMatrix(m) => {
                self.matrices.load(*m);
                Ok(())
            }
            Op::MultMatrix(m) => {
                self.matrices.mult(m);
                Ok(())
            }
            Op::PushMatrix => self.matrices.push(),
            Op::PopMatrix => self.matrices.pop(),
            Op::Translate(v) => {
                self.matrices.mult(&Mat4::new_translation(v));
                Ok(())
            }
            Op::Rotate(angle, axis) => {
                self.matrices.mult(&Mat4::rotation_degrees(*angle, *axis));
                Ok(())
            }
            Op::Scale(v) => {
                self.matrices.mult(&Mat4::new_nonuniform_scaling(v));
                Ok(())
            }
            Op::Frustum([l, r, b, t, n, f]) => {
                let m = Mat4::frustum(*l, *r, *b, *t, *n, *f).ok_or_else(|| {
                    GlError::InvalidValue(format!("frustum {l} {r} {b} {t} {n} {f}"))
                })?;
                self.matrices.mult(&m);
                Ok(())
            }
            Op::Ortho([l, r, b, t, n, f]) => {
                let m = Mat4::ortho(*l, *r, *b, *t, *n, *f).ok_or_else(|| {
                    GlError::InvalidValue(format!("ortho {l} {r} {b} {t} {n} {f}"))
                })?;
                self.matrices.mult(&m);
                Ok(())
            }

            Op::Viewport(x, y, w, h) => self.set_viewport(*x, *y, *w, *h),
            Op::Enable(cap) => self.set_capability(*cap, true),
            Op::Disable(cap) => self.set_capability(*cap, false),

            Op::Light(index, param) => {
                let param = self.light_to_eye(*param);
                self.lighting.lights.set(*index, param)
            }
            Op::LightModel(param) => {
                self.lighting.model.set(*param);
                Ok(())
            }
            Op::Material(face, param) => self.lighting.set_material(*face, *param),
            Op::ColorMaterial(face, mode) => {
                self.lighting.color_material.face = *face;
                self.lighting.color_material.mode = *mode;
                Ok(())
            }

            Op::ShadeModel(model) => {
                self.shade_model = *model;
                Ok(())
            }
            Op::CullFace(face) => {
                self.cull_face = *face;
                Ok(())
            }
            Op::FrontFace(winding) => {
                self.front_face = *winding;
                Ok(())
            }
            Op::PolygonMode(face, mode) => {
                if face.includes_front() {
                    self.polygon_mode.0 = *mode;
                }
                if face.includes_back() {
                    self.polygon_mode.1 = *mode;
                }
                Ok(())
            }
            Op::PolygonOffset(factor, units) => {
                self.polygon_offset = (*factor, *units);
                Ok(())
            }

            Op::DepthFunc(func) => {
                self.fragment.depth_func = *func;
                Ok(())
            }
            Op::DepthMask(on) => {
                self.fragment.depth_mask = *on;
                Ok(())
            }
            Op::AlphaFunc(func, reference) => {
                self.fragment.alpha_func = *func;
                self.fragment.alpha_ref = reference.clamp(0.0, 1.0);
                Ok(())
            }
            Op::BlendFunc(src, dst) => {
                self.fragment.blend_src = *src;
                self.fragment.blend_dst = *dst;
                Ok(())
            }
            Op::ColorMask(mask) => {
                self.fragment.color_mask = *mask;
                Ok(())
            }

            Op::ClearColor(c) => {
                self.clear_color = *c;
                Ok(())
            }
            Op::ClearDepth(d) => {
                self.clear_depth = d.clamp(0.0, 1.0);
                Ok(())
            }
            Op::Clear(mask) => {
                if mask.contains(ClearMask::COLOR) {
                    self.fb.clear_color(pack_color(&self.clear_color));
                }
                if mask.contains(ClearMask::DEPTH) {
                    self.fb.clear_depth(self.clear_depth);
                }
                Ok(())
            }

            Op::BindTexture(handle) => {
                if !self.textures.contains(*handle) {
                    self.textures.alloc(*handle);
                }
                self.bound_texture = *handle;
                Ok(())
            }
            Op::TexImage2D {
                level,
                format,
                width,
                height,
                data,
            } => {
                let image = texture::build_level(
                    self.config.texture_size,
                    *level,
                    *format,
                    *width,
                    *height,
                    data,
                    self.tex_filter,
                )?;
                if !self.textures.contains(self.bound_texture) {
                    self.textures.alloc(self.bound_texture);
                }
                if let Some(tex) = self.textures.find_mut(self.bound_texture) {
                    tex.set_level(*level, image);
                }
                Ok(())
            }
            Op::TexFilter(filter) => {
                self.tex_filter = *filter;
                Ok(())
            }

            // Name-stack calls only mean something while selecting.
            Op::InitNames if self.render_mode == RenderMode::Select => {
                self.selection.init_names();
                Ok(())
            }
            Op::PushName(name) if self.render_mode == RenderMode::Select => {
                self.selection.push_name(*name)
            }
            Op::PopName if self.render_mode == RenderMode::Select => self.selection.pop_name(),
            Op::LoadName(name) if self.render_mode == RenderMode::Select => {
                self.selection.load_name(*name)
            }
            Op::InitNames | Op::PushName(_) | Op::PopName | Op::LoadName(_) => Ok(()),

            Op::CallList(name) => self.replay(*name),
        }
    }

    /// Replay list `name`; errors inside the list are reported and skipped
    fn replay(&mut self, name: u32) -> GlResult<()> {
        let list = self.lists.get(name).ok_or(GlError::UnknownList(name))?;
        log::trace!("Replaying list {name} ({} ops)", list.len());
        for op in list.ops() {
            if let Err(e) = self.execute(op) {
                self.report(e);
            }
        }
        Ok(())
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> GlResult<()> {
        if width <= 0 || height <= 0 {
            return Err(GlError::InvalidValue(format!("viewport size {width}x{height}")));
        }
        let (w, h) = (width as usize, height as usize);
        let viewport = Viewport::new(x, y, w, h);
        if viewport == self.viewport {
            return Ok(());
        }

        let need_w = usize::try_from(x.saturating_add(width)).unwrap_or(0);
        let need_h = usize::try_from(y.saturating_add(height)).unwrap_or(0);
        self.host
            .resize_viewport(self.fb, need_w, need_h)
            .map_err(|reason| GlError::ViewportResize {
                width: w,
                height: h,
                reason,
            })?;

        log::debug!("Viewport set to ({x}, {y}) {w}x{h}");
        self.viewport = viewport;
        Ok(())
    }

    fn set_capability(&mut self, cap: Capability, on: bool) -> GlResult<()> {
        match cap {
            Capability::Feature(f) => {
                self.features.set(f, on);
                Ok(())
            }
            Capability::Light(index) => self.lighting.lights.set_enabled(index, on),
        }
    }

    /// Move geometric light parameters into eye space with the current model-view
    fn light_to_eye(&self, param: LightParam) -> LightParam {
        let mv = self.matrices.top(MatrixMode::ModelView);
        match param {
            LightParam::Position(p) => LightParam::Position(mv * p),
            LightParam::SpotDirection(d) => {
                LightParam::SpotDirection(mv.fixed_view::<3, 3>(0, 0) * d)
            }
            other => other,
        }
    }

    /// Rasterizer over the frame buffer with the current fragment state
    fn rasterizer(&mut self) -> Rasterizer<'_> {
        let texture = if self.features.contains(Features::TEXTURE_2D) {
            self.textures
                .find(self.bound_texture)
                .and_then(|t| t.level(0))
        } else {
            None
        };
        Rasterizer::new(self.fb, &self.fragment, self.features, texture)
    }

    fn start_list(&mut self, name: u32, mode: ListMode) -> GlResult<()> {
        if self.recorder.is_some() {
            return Err(GlError::InvalidOperation("new_list while compiling a list"));
        }
        self.lists.check_name(name)?;
        log::debug!("Compiling list {name} ({mode:?})");
        self.recorder = Some(ListRecorder {
            name,
            mode,
            list: DisplayList::new(self.config.op_buffer_slots),
        });
        Ok(())
    }

    fn finish_list(&mut self) -> GlResult<()> {
        let recorder = self
            .recorder
            .take()
            .ok_or(GlError::InvalidOperation("end_list without new_list"))?;
        log::debug!(
            "List {} compiled: {} ops in {} buffers",
            recorder.name,
            recorder.list.len(),
            recorder.list.buffers().len()
        );
        self.lists.define(recorder.name, recorder.list)
    }
}

impl Drop for Context<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
