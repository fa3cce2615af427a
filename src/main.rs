use std::{fs, process};

use anyhow::{Context, Result, bail};

use grid_rover::{
    engine::program,
    player::Player,
    world::{GridWorld, terrain::WorldConfig},
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const CHECK_USAGE: &str = "grid-rover check <script.txt>";
const RUN_USAGE: &str = "grid-rover run <script.txt> <world.json>";
const GEN_USAGE: &str = "grid-rover gen <flat|maze> <width> <depth>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("check") => {
            let script_path = args.next().context(CHECK_USAGE)?;
            check(&script_path)
        }
        Some("run") => {
            let script_path = args.next().context(RUN_USAGE)?;
            let world_path = args.next().context(RUN_USAGE)?;
            play(&script_path, &world_path)
        }
        Some("gen") => {
            let kind = args.next().context(GEN_USAGE)?;
            let width = parse_dim(args.next(), GEN_USAGE)?;
            let depth = parse_dim(args.next(), GEN_USAGE)?;
            generate(&kind, width, depth)
        }
        _ => bail!(
            "grid-rover — terminal robot scripting sandbox\n\nUsage:\n  {CHECK_USAGE}\n  {RUN_USAGE}\n  {GEN_USAGE}"
        ),
    }
}

fn check(script_path: &str) -> Result<()> {
    let script =
        fs::read_to_string(script_path).with_context(|| format!("Failed to read {script_path}"))?;
    let program = program::compile(&script)
        .with_context(|| format!("Failed to compile {script_path}"))?;

    eprintln!("Compiled {} instructions from {script_path}", program.len());
    Ok(())
}

fn play(script_path: &str, world_path: &str) -> Result<()> {
    let script =
        fs::read_to_string(script_path).with_context(|| format!("Failed to read {script_path}"))?;
    let program = program::compile(&script)
        .with_context(|| format!("Failed to compile {script_path}"))?;

    let world_json =
        fs::read_to_string(world_path).with_context(|| format!("Failed to read {world_path}"))?;
    let config: WorldConfig = serde_json::from_str(&world_json)
        .with_context(|| format!("Failed to parse {world_path}"))?;

    let mut player = Player::new(GridWorld::from_config(config), program);
    player.play()
}

fn generate(kind: &str, width: i32, depth: i32) -> Result<()> {
    let config = match kind {
        "flat" => WorldConfig::flat(width, depth),
        "maze" => WorldConfig::maze(width, depth),
        _ => bail!("Unknown world kind '{kind}'\n\nUsage:\n  {GEN_USAGE}"),
    };

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn parse_dim(arg: Option<String>, usage: &str) -> Result<i32> {
    let arg = arg.context(usage.to_string())?;
    let dim: i32 = arg
        .parse()
        .with_context(|| format!("'{arg}' is not a valid dimension"))?;
    if dim < 2 {
        bail!("Dimension {dim} is too small (need at least 2)");
    }
    Ok(dim)
}
