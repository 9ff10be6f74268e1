use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "geomotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a scene script and print the evaluation order of its derived objects.
    Check(CheckArgs),
    /// Render every frame of a scene script.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Frame file format.
    #[arg(long, value_enum, default_value_t = FrameFormat::Svg)]
    format: FrameFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrameFormat {
    Svg,
    Png,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load(path: &Path) -> anyhow::Result<(geomotion::Script, geomotion::Scene)> {
    let script = geomotion::read_script(path)?;
    let scene = geomotion::build_scene(&script)
        .with_context(|| format!("build scene from '{}'", path.display()))?;
    Ok((script, scene))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let (script, scene) = load(&args.in_path)?;
    println!(
        "ok: {} objects, {} timeline steps",
        script.objects.len(),
        script.timeline.len()
    );
    for (i, label) in geomotion::evaluation_order(&scene).iter().enumerate() {
        println!("{i:>4} {label}");
    }
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (script, mut scene) = load(&args.in_path)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let background = scene.config().background;
    let frames = match args.format {
        FrameFormat::Svg => {
            let mut renderer = geomotion::SvgRenderer::new(background);
            geomotion::run_timeline(&mut scene, &script.timeline, &mut renderer)?;
            render_static(&mut scene, &mut renderer)?;
            let docs = renderer.into_documents();
            for (idx, doc) in &docs {
                let path = args.out.join(format!("frame_{:06}.svg", idx.0));
                std::fs::write(&path, doc)
                    .with_context(|| format!("write svg '{}'", path.display()))?;
            }
            docs.len()
        }
        FrameFormat::Png => {
            let sink = geomotion::PngSequenceSink::new(&args.out, "frame");
            let mut renderer = geomotion::RasterRenderer::new(sink, background, scene.fps());
            geomotion::run_timeline(&mut scene, &script.timeline, &mut renderer)?;
            render_static(&mut scene, &mut renderer)?;
            renderer.finish()?.written()
        }
    };

    eprintln!("wrote {frames} frames to {}", args.out.display());
    Ok(())
}

/// A timeline without animations still yields one frame of the scene.
fn render_static(
    scene: &mut geomotion::Scene,
    renderer: &mut dyn geomotion::Renderer,
) -> anyhow::Result<()> {
    if scene.frame().0 == 0 {
        scene.render_frame(renderer)?;
    }
    Ok(())
}
