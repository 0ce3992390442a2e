mod edit_op;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Report;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use text_rope::{Rope, RopeConfig};

use crate::edit_op::EditOp;

#[derive(Parser)]
#[command(name = "text-rope", about = "Load, edit and inspect text through a persistent rope", version)]
struct Cli {
    /// Largest leaf, in characters. Falls back to ROPE_MAX_LEAF_SIZE.
    #[arg(long)]
    max_leaf: Option<usize>,

    /// Smallest leaf kept after rebalancing. Falls back to ROPE_MIN_LEAF_SIZE.
    #[arg(long)]
    min_leaf: Option<usize>,

    /// Height factor c in ceil(c * log2(len + 1)). Falls back to ROPE_BALANCE_FACTOR.
    #[arg(long)]
    balance: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print length, height and leaf count of a file loaded as a rope
    Stats { file: PathBuf },
    /// Apply edits in order and print the resulting text
    Edit {
        file: PathBuf,
        #[arg(required = true)]
        ops: Vec<EditOp>,
    },
    /// Print the characters in [START, END)
    Slice { file: PathBuf, start: usize, end: usize },
    /// Insert single characters one at a time and check the height bound
    Stress {
        #[arg(short, long, default_value = "10000")]
        count: usize,
        #[arg(long, value_enum, default_value = "front")]
        at: Position,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Position {
    Front,
    Back,
    Middle,
}

impl Cli {
    fn config(&self) -> Result<RopeConfig, Report> {
        let base = RopeConfig::from_env()?;
        let config = RopeConfig::new(
            self.max_leaf.unwrap_or(base.max_leaf_size()),
            self.min_leaf.unwrap_or(base.min_leaf_size()),
            self.balance.unwrap_or(base.balance_factor()),
        )?;

        debug!(?config, "resolved rope configuration");
        Ok(config)
    }
}

fn load(path: &Path, config: RopeConfig) -> Result<Rope, Report> {
    let text = fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let rope = Rope::from_text_with_config(&text, config);
    info!(path = %path.display(), len = rope.len(), height = rope.height(), "loaded file");
    Ok(rope)
}

fn print_stats(rope: &Rope) {
    println!("length:       {}", rope.len());
    println!("height:       {}", rope.height());
    println!("height bound: {}", rope.config().max_height(rope.len()));
    println!("leaves:       {}", rope.leaf_count());
}

fn stress(config: RopeConfig, count: usize, at: Position) -> Result<(), Report> {
    let mut rope = Rope::with_config(config);
    let mut buf = [0; 4];

    for i in 0..count {
        let c = char::from(b'a' + (i % 26) as u8);
        let index = match at {
            Position::Front => 0,
            Position::Back => rope.len(),
            Position::Middle => rope.len() / 2,
        };
        rope = rope.insert(index, c.encode_utf8(&mut buf))?;
    }

    print_stats(&rope);

    if !rope.is_balanced() {
        return Err(eyre!(
            "height {} exceeds bound {} after {} inserts",
            rope.height(),
            config.max_height(rope.len()),
            count
        ));
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), Report> {
    let config = cli.config()?;

    match cli.command {
        Commands::Stats { file } => print_stats(&load(&file, config)?),
        Commands::Edit { file, ops } => {
            let mut rope = load(&file, config)?;
            for op in &ops {
                rope = op.apply(&rope).wrap_err_with(|| format!("failed to apply {:?}", op))?;
                debug!(?op, len = rope.len(), height = rope.height(), "applied edit");
            }
            print!("{}", rope);
        }
        Commands::Slice { file, start, end } => {
            let rope = load(&file, config)?;
            print!("{}", rope.substring(start, end)?);
        }
        Commands::Stress { count, at } => stress(config, count, at)?,
    }

    Ok(())
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("text_rope=info")))
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
