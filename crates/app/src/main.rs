use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eframe::egui;
use still_life_core::{build_scene, mip_level_count, Aabb, ViewerSettings, SETTINGS_FILE};

mod app;
mod console;
mod input;

use app::{load_textures, StillLifeApp};

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    settings_path: Option<PathBuf>,
    texture_dir: Option<PathBuf>,
    headless: bool,
    help: bool,
}

/// `args[0]` is the program name.
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--settings requires a path".to_string())?;
                parsed.settings_path = Some(PathBuf::from(value));
            }
            "--textures" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--textures requires a directory".to_string())?;
                parsed.texture_dir = Some(PathBuf::from(value));
            }
            "--headless" => parsed.headless = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(parsed)
}

fn print_help() {
    println!(
        "still_life [options]\n  --settings <path>   settings file (default {SETTINGS_FILE})\n  --textures <dir>    texture directory\n  --headless          print scene and texture summary, then exit\n  --help"
    );
}

/// Model-space size of a mesh's bounding box.
fn format_extent(bounds: Option<Aabb>) -> String {
    match bounds {
        Some(Aabb { min, max }) => format!(
            "{:.2} x {:.2} x {:.2}",
            max[0] - min[0],
            max[1] - min[1],
            max[2] - min[2]
        ),
        None => "empty".to_string(),
    }
}

fn run_headless(settings: &ViewerSettings) -> Result<(), String> {
    let scene = build_scene(&settings.scene).map_err(|err| err.to_string())?;

    println!(
        "{:<12} {:>9} {:>10}  {:<14} extent",
        "object", "vertices", "triangles", "texture"
    );
    for instance in &scene.instances {
        println!(
            "{:<12} {:>9} {:>10}  {:<14} {}",
            instance.object.label(),
            instance.mesh.vertex_count(),
            instance.mesh.triangle_count(),
            instance.texture.file_name(),
            format_extent(instance.mesh.bounds())
        );
    }
    println!(
        "total: {} vertices, {} triangles",
        scene.total_vertices(),
        scene.total_triangles()
    );

    for (slot, result) in load_textures(&settings.scene.texture_dir) {
        match result {
            Ok(image) => println!(
                "{slot:?}: {} {}x{} {:?}, {} mip levels",
                image.name,
                image.width,
                image.height,
                image.format,
                mip_level_count(image.width, image.height)
            ),
            Err(err) => {
                tracing::warn!("headless: {}", err);
                println!("{slot:?}: unavailable ({err})");
            }
        }
    }

    tracing::info!("headless: completed");
    Ok(())
}

fn main() {
    let (console, log_level) = console::setup_tracing();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            print_help();
            process::exit(1);
        }
    };
    if cli.help {
        print_help();
        return;
    }

    let settings_path = cli
        .settings_path
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let mut settings = ViewerSettings::load_or_default(&settings_path);
    if let Some(dir) = cli.texture_dir {
        settings.scene.texture_dir = dir;
    }

    if cli.headless {
        if let Err(err) = run_headless(&settings) {
            tracing::error!("headless error: {}", err);
            process::exit(1);
        }
        return;
    }

    tracing::info!("still life starting");

    let failed = Arc::new(AtomicBool::new(false));
    let app_failed = failed.clone();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_title("Still Life"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    let result = eframe::run_native(
        "still_life",
        native_options,
        Box::new(move |cc| {
            if cc.wgpu_render_state.is_none() {
                return Err("wgpu render state unavailable".into());
            }
            let app = StillLifeApp::new(settings, settings_path, console, log_level, app_failed)?;
            Ok(Box::new(app))
        }),
    );

    if let Err(err) = result {
        tracing::error!("viewer failed: {}", err);
        process::exit(1);
    }
    if failed.load(Ordering::SeqCst) {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("still_life")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_use_defaults() {
        assert_eq!(parse_args(&args(&[])).unwrap(), CliArgs::default());
    }

    #[test]
    fn paths_and_flags_parse() {
        let parsed = parse_args(&args(&[
            "--settings",
            "view.json",
            "--textures",
            "assets",
            "--headless",
        ]))
        .unwrap();
        assert_eq!(parsed.settings_path, Some(PathBuf::from("view.json")));
        assert_eq!(parsed.texture_dir, Some(PathBuf::from("assets")));
        assert!(parsed.headless);
        assert!(!parsed.help);
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_args(&args(&["--textures"])).unwrap_err();
        assert!(err.contains("--textures"));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse_args(&args(&["--plan", "x"])).is_err());
    }

    #[test]
    fn extent_reports_bounding_box_size() {
        let mut settings = ViewerSettings::default();
        settings.scene.cylinder_segments = 4;
        let scene = build_scene(&settings.scene).unwrap();
        let ramekin = scene.get(still_life_core::SceneObject::Ramekin).unwrap();
        assert_eq!(format_extent(ramekin.mesh.bounds()), "1.00 x 1.00 x 0.50");
        assert_eq!(format_extent(None), "empty");
    }

    #[test]
    fn headless_summary_runs_without_textures() {
        let mut settings = ViewerSettings::default();
        settings.scene.cylinder_segments = 8;
        settings.scene.texture_dir = PathBuf::from("no/such/dir");
        assert!(run_headless(&settings).is_ok());
    }

    #[test]
    fn headless_rejects_degenerate_segments() {
        let mut settings = ViewerSettings::default();
        settings.scene.cylinder_segments = 2;
        assert!(run_headless(&settings).is_err());
    }
}
