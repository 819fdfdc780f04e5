use std::collections::HashMap;

use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use crate::error::{Error, Result};
use crate::style::shader::{fragment_source, ShaderUniforms, UniformValue, VERTEX_SOURCE};

/// Two triangles covering clip space.
const FULLSCREEN: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, //
    -1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
];

/// Compiled field program plus the fullscreen quad it is drawn on.
pub struct FieldPipeline {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    _buffer: WebGlBuffer,
    locations: HashMap<&'static str, Option<WebGlUniformLocation>>,
}

impl FieldPipeline {
    pub fn new(gl: &GL) -> Result<Self> {
        let vert = compile(gl, GL::VERTEX_SHADER, VERTEX_SOURCE)?;
        let frag = compile(gl, GL::FRAGMENT_SHADER, &fragment_source())?;
        let program = link(gl, &vert, &frag)?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| Error::Shader("cannot create vertex array".into()))?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| Error::Shader("cannot create buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let vertices = js_sys::Float32Array::from(&FULLSCREEN[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);

        let position = gl.get_attrib_location(&program, "aPosition");
        if position < 0 {
            return Err(Error::Shader("aPosition not found".into()));
        }
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        log::info!("field shader ready");
        Ok(Self {
            program,
            vao,
            _buffer: buffer,
            locations: HashMap::new(),
        })
    }

    pub fn draw(&mut self, gl: &GL, uniforms: &ShaderUniforms) {
        let [w, h] = uniforms.resolution;
        gl.viewport(0, 0, w as i32, h as i32);
        gl.use_program(Some(&self.program));

        for (name, value) in uniforms.entries() {
            let program = &self.program;
            // Cached including misses; the compiler drops unused uniforms.
            let location = self
                .locations
                .entry(name)
                .or_insert_with(|| gl.get_uniform_location(program, name));
            let Some(location) = location.as_ref() else {
                continue;
            };
            match value {
                UniformValue::Float(v) => gl.uniform1f(Some(location), v),
                UniformValue::Bool(v) => gl.uniform1i(Some(location), v as i32),
                UniformValue::Vec2(v) => gl.uniform2f(Some(location), v[0], v[1]),
                UniformValue::Vec3(v) => gl.uniform3f(Some(location), v[0], v[1], v[2]),
            }
        }

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 6);
        gl.bind_vertex_array(None);
    }
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| Error::Shader("cannot create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(Error::Shader(log))
    }
}

fn link(gl: &GL, vert: &WebGlShader, frag: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| Error::Shader("cannot create program".into()))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        Err(Error::Shader(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

/// Clears the GL canvas to white, for styles drawn on the 2D overlay only.
pub fn clear_white(gl: &GL, width: f64, height: f64) {
    gl.viewport(0, 0, width as i32, height as i32);
    gl.clear_color(1.0, 1.0, 1.0, 1.0);
    gl.clear(GL::COLOR_BUFFER_BIT);
}
