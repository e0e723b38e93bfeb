//! Vertex transform and primitive assembly

use super::Context;
use crate::core::limits::POLYGON_MAX_VERTEX;
use crate::error::{GlError, GlResult};
use crate::foundation::math::{utils, Vec3, Vec4};
use crate::render::clip::ClipCode;
use crate::render::matrix::MatrixMode;
use crate::render::state::{Features, Primitive};
use crate::render::vertex::Vertex;

/// Attributes applied to the next vertex
#[derive(Debug, Clone, Copy)]
pub(super) struct Current {
    pub color: Vec4,
    pub normal: Vec3,
    pub tex_coord: Vec4,
    pub edge_flag: bool,
}

impl Default for Current {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            tex_coord: Vec4::new(0.0, 0.0, 0.0, 1.0),
            edge_flag: true,
        }
    }
}

/// The primitive between `begin` and `end`
#[derive(Debug)]
pub(super) struct PrimitiveState {
    kind: Primitive,
    pending: Vec<Vertex>,
    first: Option<Vertex>,
    count: usize,
}

impl PrimitiveState {
    fn new(kind: Primitive) -> Self {
        Self {
            kind,
            pending: Vec::with_capacity(POLYGON_MAX_VERTEX),
            first: None,
            count: 0,
        }
    }
}

/// Copy of `v` with its edge flag replaced
fn with_edge(v: &Vertex, edge_flag: bool) -> Vertex {
    Vertex { edge_flag, ..*v }
}

impl Context<'_> {
    pub(super) fn begin_primitive(&mut self, kind: Primitive) -> GlResult<()> {
        if self.primitive.is_some() {
            return Err(GlError::InvalidOperation("begin inside begin/end"));
        }
        self.primitive = Some(PrimitiveState::new(kind));
        Ok(())
    }

    pub(super) fn end_primitive(&mut self) -> GlResult<()> {
        let prim = self
            .primitive
            .take()
            .ok_or(GlError::InvalidOperation("end without begin"))?;

        match prim.kind {
            Primitive::LineLoop if prim.count >= 2 => {
                if let (Some(last), Some(first)) = (prim.pending.last(), prim.first.as_ref()) {
                    self.draw_line(last, first);
                }
            }
            Primitive::Polygon if prim.pending.len() >= 3 => self.draw_polygon(&prim.pending),
            _ => {}
        }
        Ok(())
    }

    pub(super) fn emit_vertex(&mut self, coord: Vec4) -> GlResult<()> {
        let Some(mut prim) = self.primitive.take() else {
            return Err(GlError::InvalidOperation("vertex outside begin/end"));
        };
        let v = self.transform_vertex(coord);
        self.assemble(&mut prim, v);
        prim.count += 1;
        self.primitive = Some(prim);
        Ok(())
    }

    /// Object space to clip space, with lighting and texture matrix
    fn transform_vertex(&mut self, coord: Vec4) -> Vertex {
        let cur = self.current;
        let mut v = Vertex {
            coord,
            normal: cur.normal,
            tex_coord: cur.tex_coord,
            color: cur.color,
            back_color: cur.color,
            edge_flag: cur.edge_flag,
            ..Vertex::default()
        };

        if self.features.contains(Features::LIGHTING) {
            let eye = self.matrices.top(MatrixMode::ModelView) * coord;
            v.eye = eye;
            v.clip = self.matrices.top(MatrixMode::Projection) * eye;

            let mut normal = self.matrices.normal_matrix() * cur.normal;
            if self.features.contains(Features::NORMALIZE) {
                normal = utils::normalize_or_zero(normal);
            }
            let (front, back) = self.lighting.shade(&normal, &eye);
            v.color = front;
            v.back_color = back;
        } else {
            v.clip = self.matrices.model_projection() * coord;
        }

        if self.matrices.texture_matrix_active() {
            v.tex_coord = self.matrices.top(MatrixMode::Texture) * cur.tex_coord;
        }

        v.clip_code = ClipCode::of(&v.clip);
        v
    }

    /// Feed one vertex to the primitive, drawing whatever it completes
    fn assemble(&mut self, prim: &mut PrimitiveState, v: Vertex) {
        match prim.kind {
            Primitive::Points => self.draw_point(&v),
            Primitive::Lines => {
                prim.pending.push(v);
                if let [a, b] = prim.pending[..] {
                    self.draw_line(&a, &b);
                    prim.pending.clear();
                }
            }
            Primitive::LineStrip | Primitive::LineLoop => {
                if prim.count == 0 {
                    prim.first = Some(v);
                }
                if let Some(prev) = prim.pending.last() {
                    let prev = *prev;
                    self.draw_line(&prev, &v);
                }
                prim.pending.clear();
                prim.pending.push(v);
            }
            Primitive::Triangles => {
                prim.pending.push(v);
                if let [a, b, c] = prim.pending[..] {
                    self.draw_triangle(&a, &b, &c, &c);
                    prim.pending.clear();
                }
            }
            Primitive::TriangleStrip => {
                prim.pending.push(v);
                if let [a, b, c] = prim.pending[..] {
                    // Every other triangle is flipped to keep a consistent winding.
                    if (prim.count - 2) % 2 == 1 {
                        self.draw_triangle(&b, &a, &c, &c);
                    } else {
                        self.draw_triangle(&a, &b, &c, &c);
                    }
                    prim.pending.remove(0);
                }
            }
            Primitive::TriangleFan => {
                prim.pending.push(v);
                if let [a, b, c] = prim.pending[..] {
                    self.draw_triangle(&a, &b, &c, &c);
                    prim.pending.remove(1);
                }
            }
            Primitive::Quads => {
                prim.pending.push(v);
                if let [a, b, c, d] = prim.pending[..] {
                    self.draw_quad(&a, &b, &c, &d, &d);
                    prim.pending.clear();
                }
            }
            Primitive::QuadStrip => {
                prim.pending.push(v);
                if let [a, b, c, d] = prim.pending[..] {
                    self.draw_quad(&a, &b, &d, &c, &d);
                    prim.pending = vec![c, d];
                }
            }
            Primitive::Polygon => prim.pending.push(v),
        }
    }

    /// Split a quad along `a-c`; the diagonal is not a boundary edge
    fn draw_quad(&mut self, a: &Vertex, b: &Vertex, c: &Vertex, d: &Vertex, provoking: &Vertex) {
        self.draw_triangle(a, b, &with_edge(c, false), provoking);
        self.draw_triangle(&with_edge(a, false), c, d, provoking);
    }

    /// Fan a convex polygon from its first vertex
    fn draw_polygon(&mut self, vertices: &[Vertex]) {
        let n = vertices.len();
        let first = vertices[0];
        let provoking = vertices[n - 1];
        for i in 1..n - 1 {
            let a = with_edge(&first, i == 1 && first.edge_flag);
            let b = vertices[i];
            let c = with_edge(&vertices[i + 1], i + 1 == n - 1 && vertices[i + 1].edge_flag);
            self.draw_triangle(&a, &b, &c, &provoking);
        }
    }
}
