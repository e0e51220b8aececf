// shaders.rs - GLSL for the texture renderer

pub const QUAD_VERTEX: &str = r#"#version 300 es
precision highp float;

layout (location = 0) in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const CELL_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_grid;
uniform sampler2D u_atlas;
uniform float u_cellSize;
uniform vec2 u_resolution;
uniform float u_glyphCount;

out vec4 out_color;

void main() {
    // Canvas pixel with a top-left origin, matching grid row order
    vec2 pixel = vec2(gl_FragCoord.x, u_resolution.y - gl_FragCoord.y);
    vec2 cell = floor(pixel / u_cellSize);

    ivec2 gridSize = textureSize(u_grid, 0);
    if (cell.x >= float(gridSize.x) || cell.y >= float(gridSize.y)) {
        out_color = vec4(0.0, 0.0, 0.0, 1.0);
        return;
    }

    vec4 texel = texelFetch(u_grid, ivec2(cell), 0);
    float glyph = floor(texel.a * 255.0 + 0.5);

    // One atlas row per glyph
    vec2 sub = fract(pixel / u_cellSize);
    vec2 uv = vec2(sub.x, (glyph + sub.y) / u_glyphCount);
    float coverage = texture(u_atlas, uv).a;

    out_color = vec4(texel.rgb * coverage, 1.0);
}
"#;

/// Two triangles covering clip space, drawn as a strip
pub const QUAD: [f32; 8] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
     1.0,  1.0,
];
