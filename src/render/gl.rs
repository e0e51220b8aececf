// gl.rs - WebGL2 texture renderer
//
// Per frame: encode the grid into `CellTexture`, upload it with one
// texSubImage2D call, draw one full-screen quad. The fragment shader
// looks up each cell's glyph in a static atlas texture.

use js_sys::{Float32Array, Uint8Array};
use log::{debug, info, warn};
use wasm_bindgen::JsValue;
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::{js_err, shaders, CellTexture, Palette, Renderer};
use crate::glyphs::ALPHABET_SIZE;
use crate::grid::{Geometry, GridBuffer};

const GRID_UNIT: u32 = 0;
const ATLAS_UNIT: u32 = 1;

#[derive(Default)]
struct Uniforms {
    grid: Option<WebGlUniformLocation>,
    atlas: Option<WebGlUniformLocation>,
    cell_size: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
    glyph_count: Option<WebGlUniformLocation>,
}

pub struct GlRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    _quad: WebGlBuffer,
    grid_texture: WebGlTexture,
    atlas_texture: WebGlTexture,
    uniforms: Uniforms,
    cells: CellTexture,
    palette: Palette,
}

impl GlRenderer {
    /// Compile the program and upload the atlas.
    ///
    /// `atlas` must already be loaded: `ALPHABET_SIZE` glyphs stacked
    /// vertically, coverage in the alpha channel.
    pub fn new(gl: GL, atlas: &HtmlImageElement, palette: Palette) -> Result<Self, JsValue> {
        let (atlas_w, atlas_h) = (atlas.natural_width(), atlas.natural_height());
        if atlas_w == 0 || atlas_h == 0 {
            return Err(js_err("glyph atlas image is not loaded"));
        }
        Self::build(gl, palette, atlas_w, atlas_h, |gl| {
            gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                atlas,
            )
        })
    }

    /// Same as `new`, with the atlas given as tightly packed RGBA8 rows
    /// `width` pixels wide.
    pub fn from_rgba(gl: GL, pixels: &[u8], width: u32, palette: Palette) -> Result<Self, JsValue> {
        let row_bytes = width as usize * 4;
        if row_bytes == 0 || pixels.is_empty() || pixels.len() % row_bytes != 0 {
            return Err(js_err("atlas pixels do not form whole RGBA rows"));
        }
        let height = (pixels.len() / row_bytes) as u32;
        Self::build(gl, palette, width, height, |gl| {
            gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                GL::TEXTURE_2D,
                0,
                GL::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                Some(pixels),
            )
        })
    }

    fn build(
        gl: GL,
        palette: Palette,
        atlas_w: u32,
        atlas_h: u32,
        upload_atlas: impl FnOnce(&GL) -> Result<(), JsValue>,
    ) -> Result<Self, JsValue> {
        if atlas_h % ALPHABET_SIZE as u32 != 0 {
            warn!("atlas height {atlas_h} is not a multiple of {ALPHABET_SIZE}; glyphs will bleed");
        }

        gl.disable(GL::DEPTH_TEST);
        gl.disable(GL::BLEND);
        gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);

        let program = link_program(&gl, shaders::QUAD_VERTEX, shaders::CELL_FRAGMENT)?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| js_err("failed to create quad VAO"))?;
        gl.bind_vertex_array(Some(&vao));
        let quad = gl
            .create_buffer()
            .ok_or_else(|| js_err("failed to create quad buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        unsafe {
            let view = Float32Array::view(&shaders::QUAD);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }
        gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(0);
        gl.bind_vertex_array(None);

        let grid_texture = create_texture(&gl, GL::NEAREST)?;

        let atlas_texture = create_texture(&gl, GL::LINEAR)?;
        upload_atlas(&gl)?;
        info!("glyph atlas {atlas_w}x{atlas_h} uploaded");

        let uniforms = Uniforms {
            grid: gl.get_uniform_location(&program, "u_grid"),
            atlas: gl.get_uniform_location(&program, "u_atlas"),
            cell_size: gl.get_uniform_location(&program, "u_cellSize"),
            resolution: gl.get_uniform_location(&program, "u_resolution"),
            glyph_count: gl.get_uniform_location(&program, "u_glyphCount"),
        };

        let renderer = Self {
            gl,
            program,
            vao,
            _quad: quad,
            grid_texture,
            atlas_texture,
            uniforms,
            cells: CellTexture::new(0, 0),
            palette,
        };
        renderer.apply_static_uniforms();
        Ok(renderer)
    }

    fn apply_static_uniforms(&self) {
        self.gl.use_program(Some(&self.program));
        self.gl.uniform1i(self.uniforms.grid.as_ref(), GRID_UNIT as i32);
        self.gl.uniform1i(self.uniforms.atlas.as_ref(), ATLAS_UNIT as i32);
        self.gl.uniform1f(self.uniforms.glyph_count.as_ref(), ALPHABET_SIZE as f32);
    }

    /// (Re)allocate grid texture storage; one texel per cell
    fn allocate_grid_texture(&self, rows: usize, cols: usize) -> Result<(), JsValue> {
        self.gl.bind_texture(GL::TEXTURE_2D, Some(&self.grid_texture));
        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_array_buffer_view(
                GL::TEXTURE_2D,
                0,
                GL::RGBA8 as i32,
                cols as i32,
                rows as i32,
                0,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                None,
            )?;
        debug!("grid texture {cols}x{rows} allocated");
        Ok(())
    }

    fn upload_cells(&self) -> Result<(), JsValue> {
        self.gl.bind_texture(GL::TEXTURE_2D, Some(&self.grid_texture));
        unsafe {
            let view = Uint8Array::view(self.cells.bytes());
            self.gl
                .tex_sub_image_2d_with_i32_and_i32_and_u32_and_type_and_opt_array_buffer_view(
                    GL::TEXTURE_2D,
                    0,
                    0,
                    0,
                    self.cells.cols() as i32,
                    self.cells.rows() as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    Some(&view),
                )?;
        }
        Ok(())
    }
}

impl Renderer for GlRenderer {
    type Error = JsValue;

    fn resize(&mut self, geometry: &Geometry) -> Result<(), JsValue> {
        self.gl
            .viewport(0, 0, geometry.canvas_width as i32, geometry.canvas_height as i32);
        self.cells.resize(geometry.rows, geometry.cols);
        if !geometry.is_empty() {
            self.allocate_grid_texture(geometry.rows, geometry.cols)?;
        }
        Ok(())
    }

    fn render(&mut self, geometry: &Geometry, grid: &GridBuffer) -> Result<(), JsValue> {
        self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        if geometry.is_empty() { return Ok(()); }

        let reallocate = grid.rows() != self.cells.rows() || grid.cols() != self.cells.cols();
        self.cells.encode(grid, &self.palette);
        if reallocate {
            self.allocate_grid_texture(grid.rows(), grid.cols())?;
        }
        self.upload_cells()?;

        self.gl.use_program(Some(&self.program));
        self.gl.active_texture(GL::TEXTURE0 + GRID_UNIT);
        self.gl.bind_texture(GL::TEXTURE_2D, Some(&self.grid_texture));
        self.gl.active_texture(GL::TEXTURE0 + ATLAS_UNIT);
        self.gl.bind_texture(GL::TEXTURE_2D, Some(&self.atlas_texture));

        self.gl.uniform1f(self.uniforms.cell_size.as_ref(), geometry.cell_size);
        self.gl.uniform2f(
            self.uniforms.resolution.as_ref(),
            geometry.canvas_width as f32,
            geometry.canvas_height as f32,
        );

        self.gl.bind_vertex_array(Some(&self.vao));
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        self.gl.bind_vertex_array(None);
        Ok(())
    }
}

fn create_texture(gl: &GL, filter: u32) -> Result<WebGlTexture, JsValue> {
    let texture = gl
        .create_texture()
        .ok_or_else(|| js_err("failed to create texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, filter as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, filter as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram, JsValue> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src)?;
    let program = gl
        .create_program()
        .ok_or_else(|| js_err("failed to create program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    gl.detach_shader(&program, &vertex);
    gl.detach_shader(&program, &fragment);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    if linked {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".to_string());
        Err(js_err(&format!("failed to link program: {info}")))
    }
}

fn compile_shader(gl: &GL, shader_type: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| js_err("failed to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        Err(js_err(&format!("failed to compile shader: {info}")))
    }
}
