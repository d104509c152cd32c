//! Binary for inspecting, baking, and generating Sproxel voxel images.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;

use sproxel::group::LayerGroup;
use sproxel::layer::VoxelGridLayer;
use sproxel::math::{Cube, GridAab};
use sproxel::palette::Palette;
use sproxel::project::Project;
use sproxel_port::file::Fileish as _;
use sproxel_port::{export_layer_to_path, load_layer, png_io};

mod command_options;
use command_options::{Command, SproxelArgs};
mod logging;

fn main() -> Result<(), anyhow::Error> {
    let SproxelArgs { command, logging } = SproxelArgs::parse();
    logging::install(&logging)?;

    let mut project = Project::new();
    match command {
        Command::Info { input_file } => info(&input_file),
        Command::Bake {
            input_files,
            output_file,
        } => bake(&mut project, &input_files, &output_file),
        Command::Palette { output_file } => {
            let layer = palette_layer(project.main_palette());
            export_layer_to_path(&layer, &output_file)
                .with_context(|| format!("failed to write {}", output_file.display()))
        }
    }
}

#[allow(clippy::ptr_arg, reason = "`Fileish` is implemented for `PathBuf`, not `Path`")]
fn info(input_file: &PathBuf) -> Result<(), anyhow::Error> {
    let layer = load_layer(input_file, None)?;
    let size = layer.bounds().size();
    println!("{}", input_file.display());
    println!(
        "  dimensions: {x}×{y}×{z}",
        x = size.width,
        y = size.height,
        z = size.depth
    );
    match layer.palette() {
        Some(palette) => println!("  indexed, {n} colors", n = palette.num_colors()),
        None => println!("  direct color"),
    }

    // Decoding succeeded once already, so this re-read is only for the metadata.
    let raster = png_io::read_png(&input_file.read()?)?;
    for (keyword, text) in raster.text_entries() {
        println!("  {keyword}: {text}");
    }
    Ok(())
}

fn bake(
    project: &mut Project,
    input_files: &[PathBuf],
    output_file: &Path,
) -> Result<(), anyhow::Error> {
    let main_palette = Arc::clone(project.main_palette());
    let group: LayerGroup = input_files
        .iter()
        .map(|path| load_layer(path, Some(Arc::clone(&main_palette))))
        .collect::<Result<_, _>>()?;
    let index = project.add_group(group);
    let group = project.group(index).expect("group was just added");

    let baked = group.bake();
    log::info!(
        "baked {n} layers into {mode} layer",
        n = group.len(),
        mode = if baked.is_indexed() {
            "an indexed"
        } else {
            "a direct-color"
        }
    );
    export_layer_to_path(&baked, output_file)
        .with_context(|| format!("failed to write {}", output_file.display()))
}

/// Lays out a palette's colors as a 16×16×1 indexed layer, with index `y * 16 + x` at
/// (`x`, `y`), so that it may be viewed or edited as an image.
fn palette_layer(palette: &Arc<Palette>) -> VoxelGridLayer {
    let mut layer = VoxelGridLayer::with_palette(
        GridAab::from_lower_size([0, 0, 0], [16, 16, 1]),
        Arc::clone(palette),
    );
    layer.set_name(palette.name());
    for (i, color) in palette.iter().enumerate() {
        let index = i as u8;
        let cube = Cube::new(i32::from(index % 16), i32::from(index / 16), 0);
        layer
            .set(cube, color, Some(index))
            .expect("palette has at most 256 colors");
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn palette_layer_layout() {
        let palette = Arc::new(Palette::default_main());
        let layer = palette_layer(&palette);
        assert_eq!(
            layer.bounds(),
            GridAab::from_lower_size([0, 0, 0], [16, 16, 1])
        );
        assert_eq!(layer.index([0, 0, 0]), Some(0));
        assert_eq!(layer.index([3, 2, 0]), Some(35));
        assert_eq!(layer.index([15, 15, 0]), Some(255));
        assert_eq!(layer.color([3, 2, 0]), palette.color(35).unwrap());
        assert!(Arc::ptr_eq(layer.palette().unwrap(), &palette));
    }

    #[test]
    fn bake_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = Project::new();
        let palette_path = dir.path().join("palette.png");
        export_layer_to_path(&palette_layer(project.main_palette()), &palette_path).unwrap();

        let output = dir.path().join("out.png");
        bake(
            &mut project,
            &[palette_path.clone(), palette_path],
            &output,
        )
        .unwrap();

        let baked = load_layer(&output, None).unwrap();
        assert!(baked.is_indexed());
        assert_eq!(baked.index([3, 2, 0]), Some(35));
        assert_eq!(project.groups()[0].len(), 2);
    }
}
