//! Vertex/index buffer upload and vertex attribute layouts.
use crate::api as gl;
use crate::api::types::*;
use crate::api::Gl;
use std::mem;
use std::os::raw::c_void;

const FLOAT_SIZE: usize = mem::size_of::<f32>();

/// Description of a float vertex attribute within an interleaved vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Attribute location in the vertex shader.
    pub location: u32,
    /// Number of float components (1 to 4).
    pub components: i32,
    /// Offset from the start of the vertex, in floats.
    pub offset: usize,
}

/// Layout of interleaved float vertex data inside a single vertex buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    /// Number of floats per vertex.
    pub stride: usize,
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    pub const fn new(stride: usize, attributes: &'static [VertexAttribute]) -> VertexLayout {
        VertexLayout { stride, attributes }
    }

    pub fn byte_stride(&self) -> GLsizei {
        (self.stride * FLOAT_SIZE) as GLsizei
    }

    pub fn byte_offset(attribute: &VertexAttribute) -> usize {
        attribute.offset * FLOAT_SIZE
    }

    /// Number of complete vertices in `vertices`.
    pub fn vertex_count(&self, vertices: &[f32]) -> usize {
        if self.stride == 0 {
            0
        } else {
            vertices.len() / self.stride
        }
    }

    /// Binds every attribute of the layout to the currently bound vertex buffer and VAO.
    pub fn apply(&self, gl: &Gl) {
        for a in self.attributes.iter() {
            unsafe {
                gl.VertexAttribPointer(
                    a.location,
                    a.components,
                    gl::FLOAT,
                    gl::FALSE,
                    self.byte_stride(),
                    Self::byte_offset(a) as *const c_void,
                );
                gl.EnableVertexAttribArray(a.location);
            }
        }
    }
}

macro_rules! attr {
    ($location:expr, $components:expr, $offset:expr) => {
        VertexAttribute {
            location: $location,
            components: $components,
            offset: $offset,
        }
    };
}

/// `vec3 position`
pub const POSITION: VertexLayout = VertexLayout::new(3, &[attr!(0, 3, 0)]);
/// `vec3 position, vec3 color`
pub const POSITION_COLOR: VertexLayout = VertexLayout::new(6, &[attr!(0, 3, 0), attr!(1, 3, 3)]);
/// `vec3 position, vec3 color, vec2 texcoords`
pub const POSITION_COLOR_TEXCOORD: VertexLayout =
    VertexLayout::new(8, &[attr!(0, 3, 0), attr!(1, 3, 3), attr!(2, 2, 6)]);
/// `vec3 position, vec2 texcoords`
pub const POSITION_TEXCOORD: VertexLayout =
    VertexLayout::new(5, &[attr!(0, 3, 0), attr!(1, 2, 3)]);

//--------------------------------------------------------------------------------------------------

/// Geometry uploaded once to the GPU: a VAO with its vertex buffer and optional index buffer.
#[derive(Debug)]
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: Option<GLuint>,
    count: GLsizei,
}

fn upload_buffer<T>(gl: &Gl, target: GLenum, data: &[T]) -> GLuint {
    unsafe {
        let mut obj = 0;
        gl.GenBuffers(1, &mut obj);
        gl.BindBuffer(target, obj);
        gl.BufferData(
            target,
            mem::size_of_val(data) as GLsizeiptr,
            data.as_ptr() as *const c_void,
            gl::STATIC_DRAW,
        );
        obj
    }
}

impl Mesh {
    /// Uploads interleaved vertices (and indices, if any) and records the attribute layout in a
    /// new VAO.
    pub fn new(gl: &Gl, vertices: &[f32], indices: Option<&[u32]>, layout: &VertexLayout) -> Mesh {
        if layout.stride != 0 && vertices.len() % layout.stride != 0 {
            warn!(
                "{} trailing floats do not form a complete vertex (stride {})",
                vertices.len() % layout.stride,
                layout.stride
            );
        }

        unsafe {
            let mut vao = 0;
            gl.GenVertexArrays(1, &mut vao);
            gl.BindVertexArray(vao);

            let vbo = upload_buffer(gl, gl::ARRAY_BUFFER, vertices);
            let ebo = indices.map(|indices| upload_buffer(gl, gl::ELEMENT_ARRAY_BUFFER, indices));
            layout.apply(gl);

            // the element buffer binding is part of the VAO state: unbind the VAO first
            gl.BindVertexArray(0);
            gl.BindBuffer(gl::ARRAY_BUFFER, 0);

            let count = match indices {
                Some(indices) => indices.len(),
                None => layout.vertex_count(vertices),
            } as GLsizei;

            debug!(
                "mesh vao={} vbo={} ebo={:?} ({} elements)",
                vao, vbo, ebo, count
            );

            Mesh {
                vao,
                vbo,
                ebo,
                count,
            }
        }
    }

    pub fn vao(&self) -> GLuint {
        self.vao
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// Number of indices (indexed meshes) or vertices drawn.
    pub fn count(&self) -> GLsizei {
        self.count
    }

    pub fn bind(&self, gl: &Gl) {
        unsafe { gl.BindVertexArray(self.vao) }
    }

    /// Binds the VAO and draws the whole mesh as triangles.
    pub fn draw(&self, gl: &Gl) {
        self.bind(gl);
        unsafe {
            if self.is_indexed() {
                gl.DrawElements(
                    gl::TRIANGLES,
                    self.count,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl.DrawArrays(gl::TRIANGLES, 0, self.count);
            }
        }
    }

    pub fn destroy(self, gl: &Gl) {
        unsafe {
            gl.DeleteVertexArrays(1, &self.vao);
            gl.DeleteBuffers(1, &self.vbo);
            if let Some(ebo) = self.ebo {
                gl.DeleteBuffers(1, &ebo);
            }
        }
    }
}
