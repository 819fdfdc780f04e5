//! GPU variant: fragment-shader program and its uniforms.
//!
//! The `voronoi()` GLSL routine is generated from the constants in
//! [`crate::field`] so it cannot drift from the CPU search that places the
//! overlay text.

use super::overlay::{baseline_labels, overlay_cells, TextMark};
use super::FrameContext;
use crate::error::Result;
use crate::field::{HASH_DOT, HASH_GAIN, JITTER_AMPLITUDE, JITTER_CENTER};
use crate::mapper::CoordinateMapper;
use crate::params::{RenderMode, RenderParameters};
use crate::search::{DEGENERATE_EPSILON, INTERIOR_SENTINEL};

pub const VERTEX_SOURCE: &str = r#"
    #ifdef GL_ES
    precision mediump float;
    #endif
    attribute vec2 aPosition;
    void main() {
        gl_Position = vec4(aPosition, 0.0, 1.0);
    }
"#;

const VORONOI_MARKER: &str = "// @voronoi";

const FRAGMENT_TEMPLATE: &str = r#"
    #ifdef GL_ES
    precision highp float;
    #endif
    uniform vec2 iResolution;
    uniform float iTime;
    uniform bool Fill;
    uniform bool Distances;
    uniform bool InteriorDistances;
    uniform bool Grayscale;
    uniform bool Colorful;
    uniform vec3 FillColor;
    uniform bool Contour;
    uniform bool Edge;
    uniform vec3 EdgeColor;
    uniform bool Point;
    uniform vec3 PointColor;
    uniform float Speed;
    uniform float Scale;
    uniform float SminValue;
    uniform float Radius;

    // @voronoi

    void main() {
        // Top-down pixel coordinates, same as the overlay canvas.
        vec2 px = vec2(gl_FragCoord.x, iResolution.y - gl_FragCoord.y);
        vec2 uv = px / iResolution.xy - .5;
        uv.x *= iResolution.x / iResolution.y;

        if (length(uv) > Radius) {
            gl_FragColor = vec4(1.);
            return;
        }

        uv *= Scale;
        vec2 t = vec2(iTime * Speed);
        vec4 voro = voronoi(uv, t, SminValue);
        vec3 color = vec3(0.);

        if (Fill)              color += FillColor;
        if (Grayscale)         color += hash1(floor(uv) + voro.xy);
        if (Colorful)          color += hash3(floor(uv) + voro.xy);
        if (Distances)         color += vec3(voro.z);
        if (InteriorDistances) color += vec3(voro.w);

        if (Contour) {
            vec3 ct = vec3(.5 + .5 * cos(voro.w * 70.));
            color = mix(color, ct, voro.w);
        }
        if (Edge)  color = mix(EdgeColor, color, smoothstep(.03, .06, voro.w));
        if (Point) color = mix(PointColor, color, smoothstep(.003, .005, voro.z));

        gl_FragColor = vec4(color, 1.);
    }
"#;

/// GLSL `hash1`/`hash2`/`hash3`, `smin` and `voronoi` with the crate's constants.
pub fn voronoi_source() -> String {
    format!(
        r#"
    #define TAU 6.28318530718
    float hash1(vec2 uv) {{
        return fract(sin(dot(uv, vec2({k1:?}, {k2:?}))) * {gain:?});
    }}
    vec2 hash2(vec2 uv) {{
        float x = hash1(uv);
        return vec2(x, hash1(uv + x));
    }}
    vec3 hash3(vec2 uv) {{
        vec2 xy = hash2(uv);
        return vec3(xy, hash1(uv + xy));
    }}
    float smin(float a, float b, float t) {{
        float c = clamp(.5 + (a - b) / t, 0., 1.);
        return (1. - c) * (a - .5 * t * c) + c * b;
    }}
    vec2 cellPoint(vec2 cell, vec2 t) {{
        return {center:?} + {amp:?} * sin(t + hash2(cell) * TAU);
    }}
    vec4 voronoi(vec2 uv, vec2 t, float mt) {{
        vec2 fuv = fract(uv);
        vec2 iuv = floor(uv);
        vec2 moff = vec2(0.), mdir = vec2(0.), off, dir;
        float mdst = {sentinel:?};
        for (int x = -1; x <= 1; x++)
        for (int y = -1; y <= 1; y++) {{
            off = vec2(float(x), float(y));
            dir = cellPoint(iuv + off, t) + off - fuv;
            float dst = dot(dir, dir);
            if (dst < mdst) {{ mdst = dst; moff = off; mdir = dir; }}
        }}
        float midst = {sentinel:?};
        for (int x = -2; x <= 2; x++)
        for (int y = -2; y <= 2; y++) {{
            off = moff + vec2(float(x), float(y));
            dir = cellPoint(iuv + off, t) + off - fuv;
            if (dot(mdir - dir, mdir - dir) > {eps:?}) {{
                float idst = dot(.5 * (mdir + dir), normalize(dir - mdir));
                midst = smin(midst, idst, abs(mt));
            }}
        }}
        return vec4(moff, mdst, midst);
    }}
"#,
        k1 = HASH_DOT.0,
        k2 = HASH_DOT.1,
        gain = HASH_GAIN,
        center = JITTER_CENTER,
        amp = JITTER_AMPLITUDE,
        sentinel = INTERIOR_SENTINEL,
        eps = DEGENERATE_EPSILON,
    )
}

/// Complete fragment program.
pub fn fragment_source() -> String {
    FRAGMENT_TEMPLATE.replace(VORONOI_MARKER, &voronoi_source())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

/// One frame's uniform values.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderUniforms {
    pub resolution: [f32; 2],
    /// Frame number; the shader multiplies it by `speed`.
    pub time: f32,
    pub speed: f32,
    pub scale: f32,
    pub smooth: f32,
    pub radius: f32,
    pub mode: RenderMode,
    pub fill_color: [f32; 3],
    pub contour: bool,
    pub edge: bool,
    pub edge_color: [f32; 3],
    pub point: bool,
    pub point_color: [f32; 3],
}

impl ShaderUniforms {
    pub fn new(params: &RenderParameters, frame: u64, width: f64, height: f64) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time: frame as f32,
            speed: params.speed as f32,
            scale: params.scale as f32,
            smooth: params.smooth_coefficient() as f32,
            radius: params.region_radius as f32,
            mode: params.mode,
            fill_color: params.fill_color.to_array(),
            contour: params.contour,
            edge: params.edge,
            edge_color: params.edge_color.to_array(),
            point: params.point,
            point_color: params.point_color.to_array(),
        }
    }

    /// `(name, value)` pairs in upload order. Exactly one mode flag is true.
    pub fn entries(&self) -> Vec<(&'static str, UniformValue)> {
        let mut entries = vec![
            ("iResolution", UniformValue::Vec2(self.resolution)),
            ("iTime", UniformValue::Float(self.time)),
            ("Speed", UniformValue::Float(self.speed)),
            ("Scale", UniformValue::Float(self.scale)),
            ("SminValue", UniformValue::Float(self.smooth)),
            ("Radius", UniformValue::Float(self.radius)),
        ];
        entries.extend(
            RenderMode::ALL
                .into_iter()
                .map(|m| (m.uniform_name(), UniformValue::Bool(m == self.mode))),
        );
        entries.extend([
            ("FillColor", UniformValue::Vec3(self.fill_color)),
            ("Contour", UniformValue::Bool(self.contour)),
            ("Edge", UniformValue::Bool(self.edge)),
            ("EdgeColor", UniformValue::Vec3(self.edge_color)),
            ("Point", UniformValue::Bool(self.point)),
            ("PointColor", UniformValue::Vec3(self.point_color)),
        ]);
        entries
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderFrame {
    pub uniforms: ShaderUniforms,
    pub labels: Vec<TextMark>,
}

/// Uniforms for the GPU pass plus label text pinned to the shader's points.
pub fn render(ctx: &FrameContext<'_>) -> Result<ShaderFrame> {
    let params = ctx.params;
    let mapper = CoordinateMapper::new(ctx.width, ctx.height, params.scale)?;
    let cells = overlay_cells(&mapper, params, params.time_at(ctx.frame));
    Ok(ShaderFrame {
        uniforms: ShaderUniforms::new(params, ctx.frame, ctx.width, ctx.height),
        labels: baseline_labels(&cells, params),
    })
}
