// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context};
use platform::GfxShaderDesc;
use tracing::debug;

const STAGE_MARKER: &str = "#shader";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vertex,
    Pixel,
    Compute,
}

/// Reads a shader file, which contains the sources of each stage after a
/// `#shader vertex`, `#shader pixel` or `#shader compute` line.
pub fn load(shader_path: &Path) -> anyhow::Result<GfxShaderDesc> {
    let source =
        fs::read_to_string(shader_path).context("Failed to open shader file for importing")?;
    let shader = split_stages(&source)
        .with_context(|| format!("Failed to split {} into stages", shader_path.display()))?;
    debug!("Read a {} shader from {}.", kind(&shader), shader_path.display());
    Ok(shader)
}

fn kind(shader: &GfxShaderDesc) -> &'static str {
    match shader {
        GfxShaderDesc::Graphics { .. } => "graphics",
        GfxShaderDesc::Compute { .. } => "compute",
    }
}

pub fn split_stages(source: &str) -> anyhow::Result<GfxShaderDesc> {
    let mut vertex: Option<String> = None;
    let mut pixel: Option<String> = None;
    let mut compute: Option<String> = None;
    let mut current: Option<Stage> = None;

    for (i, line) in source.lines().enumerate() {
        if let Some(stage_name) = line.trim().strip_prefix(STAGE_MARKER) {
            let stage = match stage_name.trim() {
                "vertex" => Stage::Vertex,
                "pixel" | "fragment" => Stage::Pixel,
                "compute" => Stage::Compute,
                other => bail!("Line {}: unknown shader stage {other:?}", i + 1),
            };
            let slot = match stage {
                Stage::Vertex => &mut vertex,
                Stage::Pixel => &mut pixel,
                Stage::Compute => &mut compute,
            };
            if slot.is_some() {
                bail!("Line {}: the {stage:?} stage appears twice", i + 1);
            }
            *slot = Some(String::new());
            current = Some(stage);
            continue;
        }

        let text = match current {
            Some(Stage::Vertex) => vertex.as_mut(),
            Some(Stage::Pixel) => pixel.as_mut(),
            Some(Stage::Compute) => compute.as_mut(),
            None if line.trim().is_empty() => continue,
            None => bail!("Line {}: source code before the first {STAGE_MARKER} line", i + 1),
        };
        let text = text.ok_or_else(|| anyhow!("the current stage has no source buffer"))?;
        text.push_str(line);
        text.push('\n');
    }

    match (vertex, pixel, compute) {
        (Some(vertex), Some(pixel), None) => Ok(GfxShaderDesc::Graphics { vertex, pixel }),
        (None, None, Some(compute)) => Ok(GfxShaderDesc::Compute { compute }),
        (None, None, None) => bail!("No {STAGE_MARKER} lines found"),
        (_, _, Some(_)) => bail!("Compute shaders can't have vertex or pixel stages"),
        (Some(_), None, None) => bail!("Vertex stage without a pixel stage"),
        (None, Some(_), None) => bail!("Pixel stage without a vertex stage"),
    }
}
