use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Starter fragment shader written by `fragview init`.
///
/// Declares every uniform the viewer supplies so the operator starts from a
/// complete canvas.
const TEMPLATE: &str = r#"#version 410
out vec4 frag_colour;

uniform ivec2 iResolution;
uniform int iStep;
uniform float fTime;
uniform float fTimeDelta;
uniform float fTimestamp;
uniform ivec4 iDate;
uniform ivec4 iMouse;

void main() {
    frag_colour = vec4(0.0, 0.87, 0.0, 1.0);
}
"#;

/// Writes the starter shader, refusing to clobber an existing file.
pub fn write_template(path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(TEMPLATE.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "starter shader written");
    Ok(())
}
