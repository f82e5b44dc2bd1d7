//! skyline CLI - inspect scene files and pick buildings
//!
//! Loads a TOML scene description, builds the acceleration grid and either
//! reports on it or runs a selection ray through it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use skyline_geom::Ray;
use skyline_math::{IVec2, Vec3};
use skyline_scene::{Scene, SceneDescription};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "skyline")]
#[command(about = "Inspect city scenes and their acceleration grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a scene file
    Info {
        /// Path to the scene .toml
        file: PathBuf,
    },
    /// List the boxes registered in every grid cell
    Grid {
        /// Path to the scene .toml
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Select the building under a ray, creating one on open ground
    Pick {
        /// Path to the scene .toml
        file: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, requires = "direction", conflicts_with = "camera")]
        origin: Option<Vec3>,
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, requires = "origin")]
        direction: Option<Vec3>,
        /// Shoot through a named camera instead
        #[arg(long, requires = "pixel")]
        camera: Option<String>,
        /// Pixel as x,y
        #[arg(long, value_parser = parse_pixel, requires = "camera")]
        pixel: Option<IVec2>,
        /// Image size as WxH
        #[arg(long, value_parser = parse_image_size, default_value = "640x480")]
        image: (u32, u32),
        /// Write the scene, including any new box, to this file
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file } => show_info(&file)?,
        Commands::Grid { file, json } => show_grid(&file, json)?,
        Commands::Pick {
            file,
            origin,
            direction,
            camera,
            pixel,
            image,
            write,
        } => {
            let mut scene = load_scene(&file)?;
            let ray = match (origin, direction, camera, pixel) {
                (Some(origin), Some(direction), _, _) => Ray::new(origin, direction)?,
                (_, _, Some(name), Some(pixel)) => {
                    let camera = scene
                        .camera(&name)
                        .with_context(|| format!("no camera named {name:?}"))?;
                    camera.generate_ray(pixel, image.0, image.1)?
                }
                _ => bail!("pick needs --origin and --direction, or --camera and --pixel"),
            };
            pick(&mut scene, &ray)?;
            if let Some(out) = write {
                scene
                    .to_description()?
                    .save(&out)
                    .with_context(|| format!("writing {}", out.display()))?;
                println!("Wrote {}", out.display());
            }
        }
    }

    Ok(())
}

fn load_scene(file: &Path) -> Result<Scene> {
    let desc = SceneDescription::load(file)?;
    let scene = Scene::from_description(&desc)
        .with_context(|| format!("building scene from {}", file.display()))?;
    log::debug!(
        "loaded {}: {} boxes, {} cameras",
        file.display(),
        scene.boxes().len(),
        scene.cameras().len()
    );
    Ok(scene)
}

fn show_info(file: &Path) -> Result<()> {
    let mut scene = load_scene(file)?;
    let stats = scene.prepare()?.stats();

    println!("skyline scene: {}", file.display());
    println!("  Boxes: {}", scene.boxes().len());
    println!("  Materials: {}", scene.materials().len());
    println!("  Textures: {}", scene.textures().len());
    println!("  Cameras: {}", scene.cameras().len());
    println!("  Sky radius: {}", scene.sky().radius);
    let sun = scene.sun().center;
    println!("  Sun: ({}, {}, {})", sun.x, sun.y, sun.z);

    let res = scene.resolution();
    println!("\nGrid {}x{}:", res.x, res.y);
    println!("  Occupied cells: {} of {}", stats.occupied, stats.cells);
    println!("  Index entries: {}", stats.indices);
    println!("  Most boxes in a cell: {}", stats.max_per_cell);
    println!("  Mean per occupied cell: {:.2}", stats.mean_per_occupied);

    if !scene.materials().is_empty() {
        println!("\nMaterials:");
        for (name, index) in scene.material_names() {
            let users = scene.boxes().iter().filter(|b| b.material == index).count();
            println!("  {index}: {name} ({users} boxes)");
        }
    }

    Ok(())
}

fn show_grid(file: &Path, as_json: bool) -> Result<()> {
    let mut scene = load_scene(file)?;
    scene.prepare()?;
    let built = scene.grid().context("grid missing after prepare")?;
    let grid = built.grid();
    let names = scene.box_names();

    let cells: Vec<(IVec2, Vec<&str>)> = (0..grid.cell_count())
        .map(|i| {
            let cell = grid.cell_at(i);
            let boxes = built
                .cell_boxes(&cell)
                .iter()
                .map(|&b| names[b as usize].as_str())
                .collect();
            (cell, boxes)
        })
        .collect();

    if as_json {
        let report = json!({
            "resolution": [grid.max.x, grid.max.y],
            "origin": [grid.origin.x, grid.origin.y],
            "cell_size": [grid.cell_size.x, grid.cell_size.y],
            "stats": built.stats(),
            "cells": cells
                .iter()
                .map(|(cell, boxes)| json!({ "cell": [cell.x, cell.y], "boxes": boxes }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Grid {}x{} from ({}, {}), cells {} x {}",
        grid.max.x, grid.max.y, grid.origin.x, grid.origin.y, grid.cell_size.x, grid.cell_size.y
    );
    for (cell, boxes) in cells.iter().filter(|(_, boxes)| !boxes.is_empty()) {
        println!("  ({}, {}): {}", cell.x, cell.y, boxes.join(", "));
    }

    Ok(())
}

fn pick(scene: &mut Scene, ray: &Ray) -> Result<()> {
    scene.prepare()?;
    let Some(selection) = scene.select(ray)? else {
        println!("Nothing under the ray");
        return Ok(());
    };

    let verb = if selection.created { "Created" } else { "Selected" };
    let b = &*selection.aabb;
    println!("{verb} box {}: {}", selection.index, selection.name);
    println!("  Center: ({}, {}, {})", b.center.x, b.center.y, b.center.z);
    println!("  Width: ({}, {}, {})", b.width.x, b.width.y, b.width.z);
    println!("  Material: {}", b.material);
    if !selection.cells.is_empty() {
        let cells: Vec<String> = selection
            .cells
            .iter()
            .map(|c| format!("({}, {})", c.x, c.y))
            .collect();
        println!("  Cells: {}", cells.join(" "));
    }

    Ok(())
}

fn parse_list<T: FromStr, const N: usize>(s: &str, sep: char) -> Result<[T; N], String> {
    let parts: Vec<T> = s
        .split(sep)
        .map(|p| p.trim().parse::<T>().map_err(|_| format!("invalid number {p:?}")))
        .collect::<Result<_, _>>()?;
    let found = parts.len();
    parts
        .try_into()
        .map_err(|_| format!("expected {N} values separated by '{sep}', got {found}"))
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let [x, y, z] = parse_list::<f32, 3>(s, ',')?;
    Ok(Vec3::new(x, y, z))
}

fn parse_pixel(s: &str) -> Result<IVec2, String> {
    let [x, y] = parse_list::<i32, 2>(s, ',')?;
    Ok(IVec2::new(x, y))
}

fn parse_image_size(s: &str) -> Result<(u32, u32), String> {
    let [w, h] = parse_list::<u32, 2>(s, 'x')?;
    if w == 0 || h == 0 {
        return Err(format!("image size must be positive, got {s}"));
    }
    Ok((w, h))
}
