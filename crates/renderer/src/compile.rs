use std::borrow::Cow;

use anyhow::{anyhow, Result};
use wgpu::naga::ShaderStage;

/// Compiles the static full-viewport triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    compile_stage(
        device,
        "fullscreen triangle vertex",
        Cow::Borrowed(VERTEX_SHADER_GLSL),
        ShaderStage::Vertex,
    )
}

/// Wraps the user's fragment source with the uniform prelude and compiles it
/// as GLSL.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let wrapped = wrap_viewer_fragment(source);
    compile_stage(
        device,
        "viewer fragment",
        Cow::Owned(wrapped),
        ShaderStage::Fragment,
    )
}

/// Compiles one stage inside a validation error scope so a broken shader
/// comes back as an `Err` carrying the full diagnostic instead of a panic.
fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    shader: Cow<'_, str>,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader,
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("{stage:?} stage failed to compile:\n{error}"));
    }
    Ok(module)
}

/// Uniform names the viewer supplies; declarations of these in user source
/// are stripped so the injected block can take over.
const UNIFORM_NAMES: [&str; 7] = [
    "iResolution",
    "iStep",
    "fTime",
    "fTimeDelta",
    "fTimestamp",
    "iDate",
    "iMouse",
];

/// Produces a self-contained GLSL fragment shader from the user's source.
///
/// Steps performed:
///
/// 1. Drop the leading `#version` directive so [`HEADER`] can supply its own.
/// 2. Drop `uniform` declarations of the viewer-supplied names; the injected
///    block and macro aliases replace them, which is what makes every
///    uniform optional to declare.
/// 3. Drop top-level `out vec4 <name>;` declarations and alias `<name>` to
///    the header's location-0 output.
fn wrap_viewer_fragment(source: &str) -> String {
    let mut skipped_version = false;
    let mut output_aliases = Vec::new();
    let mut sanitized = String::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if !skipped_version && trimmed.starts_with("#version") {
            skipped_version = true;
            continue;
        }
        if trimmed.starts_with("uniform ")
            && UNIFORM_NAMES.iter().any(|name| trimmed.contains(name))
        {
            continue;
        }
        if let Some(name) = color_output_name(trimmed) {
            output_aliases.push(name.to_owned());
            continue;
        }
        sanitized.push_str(line);
        sanitized.push('\n');
    }

    let mut prelude = String::from(HEADER);
    for name in &output_aliases {
        prelude.push_str("#define ");
        prelude.push_str(name);
        prelude.push_str(" fragview_color\n");
    }

    format!("{prelude}\n#line 1\n{sanitized}")
}

/// Recognises a top-level `out vec4 <name>;` declaration and returns the name.
fn color_output_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("out ")?.trim_start();
    let rest = rest.strip_prefix("vec4")?.trim_start();
    let name = rest.strip_suffix(';')?.trim();
    let is_ident = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_ident.then_some(name)
}

/// GLSL prologue injected ahead of every fragment shader.
///
/// The block layout must match [`FrameUniforms`](crate::gpu::uniforms::FrameUniforms)
/// field for field, including the explicit padding before `_iDate`.
const HEADER: &str = r"#version 450
layout(location = 0) out vec4 fragview_color;

layout(std140, set = 0, binding = 0) uniform FrameParams {
    ivec2 _iResolution;
    int _iStep;
    float _fTime;
    float _fTimeDelta;
    float _fTimestamp;
    ivec2 _padding0;
    ivec4 _iDate;
    ivec4 _iMouse;
} ubo;

#define iResolution ubo._iResolution
#define iStep ubo._iStep
#define fTime ubo._fTime
#define fTimeDelta ubo._fTimeDelta
#define fTimestamp ubo._fTimestamp
#define iDate ubo._iDate
#define iMouse ubo._iMouse
";

/// Minimal full-viewport triangle vertex shader; the three vertex indices
/// span a triangle that covers the whole clip space, no vertex buffer needed.
const VERTEX_SHADER_GLSL: &str = r"#version 450

void main() {
    float x = -1.0 + float((gl_VertexIndex & 1) << 2);
    float y = -1.0 + float((gl_VertexIndex & 2) << 1);
    gl_Position = vec4(x, y, 0.0, 1.0);
}
";

/// Constant-black fragment used when the shader on disk fails its very first
/// compile; the viewer stays up and the operator's next save recovers.
pub(crate) const FALLBACK_FRAGMENT_GLSL: &str = r"out vec4 frag_colour;

void main() {
    frag_colour = vec4(0.0, 0.0, 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_strips_version_and_viewer_uniforms() {
        let source = r#"#version 410
out vec4 frag_colour;
uniform ivec2 iResolution;
uniform float fTime;

void main() {
    frag_colour = vec4(fTime, 0.0, 0.0, 1.0);
}
"#;

        let wrapped = wrap_viewer_fragment(source);
        assert!(!wrapped.contains("#version 410"));
        assert!(wrapped.starts_with("#version 450"));
        assert!(!wrapped.contains("uniform ivec2 iResolution"));
        assert!(!wrapped.contains("uniform float fTime"));
        assert!(!wrapped.contains("out vec4 frag_colour;"));
        assert!(wrapped.contains("#define frag_colour fragview_color"));
        assert!(wrapped.contains("frag_colour = vec4(fTime, 0.0, 0.0, 1.0);"));
    }

    #[test]
    fn wrap_keeps_unrelated_declarations() {
        let source = "uniform float u_custom;\nvoid main() {}\n";

        let wrapped = wrap_viewer_fragment(source);
        assert!(wrapped.contains("uniform float u_custom;"));
    }

    #[test]
    fn wrap_handles_sources_without_version_or_outputs() {
        let wrapped = wrap_viewer_fragment("void main() {}\n");
        assert!(wrapped.starts_with("#version 450"));
        assert!(wrapped.contains("void main() {}"));
    }

    #[test]
    fn fallback_fragment_wraps_cleanly() {
        let wrapped = wrap_viewer_fragment(FALLBACK_FRAGMENT_GLSL);
        assert!(wrapped.contains("#define frag_colour fragview_color"));
        assert!(wrapped.contains("vec4(0.0, 0.0, 0.0, 1.0)"));
    }

    #[test]
    fn recognises_color_output_declarations() {
        assert_eq!(color_output_name("out vec4 frag_colour;"), Some("frag_colour"));
        assert_eq!(color_output_name("out vec4  color ;"), Some("color"));
        assert_eq!(color_output_name("out vec2 uv;"), None);
        assert_eq!(color_output_name("layout(location = 0) out vec4 c;"), None);
        assert_eq!(color_output_name("out vec4 frag_colour"), None);
    }
}
