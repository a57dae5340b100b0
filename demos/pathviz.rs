//! `pathviz`: run, animate and generate A* grid layouts from the terminal.
//!
//! Usage:
//!   pathviz run layouts.json maze --animate --speed fast
//!   pathviz generate layouts.json random --size 20 --density 0.25 --seed 3
//!   pathviz list layouts.json

use std::path::PathBuf;
use std::thread;

use color_eyre::eyre::{Result, WrapErr, eyre};
use log::{Level, info, warn};
use pathviz_core::{Grid, Point};
use pathviz_demos::{GenParams, LayoutBook, Outcome, drive, endpoints, generate, parse_point, render};
use pathviz_paths::{SearchEngine, Speed};
use rand::RngExt;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "pathviz", about = "Weighted-grid A* visualizer")]
struct Opt {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Search a stored layout and print the result.
    #[structopt(name = "run")]
    Run {
        /// Layout book (JSON object of name -> layout).
        #[structopt(parse(from_os_str))]
        book: PathBuf,

        /// Layout name.
        name: String,

        /// Start cell as `row,col`; overrides the stored start.
        #[structopt(long, parse(try_from_str = parse_point))]
        start: Option<Point>,

        /// End cell as `row,col`; overrides the stored end.
        #[structopt(long, parse(try_from_str = parse_point))]
        end: Option<Point>,

        /// Redraw the grid after every step.
        #[structopt(short, long)]
        animate: bool,

        /// Animation pacing: slow, medium or fast.
        #[structopt(long, default_value = "medium")]
        speed: Speed,

        /// Stop after this many steps.
        #[structopt(long)]
        max_steps: Option<usize>,
    },

    /// List the layouts in a book.
    #[structopt(name = "list")]
    List {
        #[structopt(parse(from_os_str))]
        book: PathBuf,
    },

    /// Paint a random layout and store it in a book.
    #[structopt(name = "generate")]
    Generate {
        #[structopt(parse(from_os_str))]
        book: PathBuf,

        name: String,

        /// Side length.
        #[structopt(long, default_value = "20")]
        size: i32,

        /// Chance of each cell being an obstacle.
        #[structopt(long, default_value = "0.25")]
        density: f64,

        /// Largest random weight (1 = unweighted).
        #[structopt(long, default_value = "1")]
        max_weight: i32,

        /// RNG seed; random when omitted.
        #[structopt(long)]
        seed: Option<u64>,

        /// Stored start cell as `row,col` (default: top-left).
        #[structopt(long, parse(try_from_str = parse_point))]
        start: Option<Point>,

        /// Stored end cell as `row,col` (default: bottom-right).
        #[structopt(long, parse(try_from_str = parse_point))]
        end: Option<Point>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    simple_logger::init_with_level(level)?;

    match opt.cmd {
        Command::Run {
            book,
            name,
            start,
            end,
            animate,
            speed,
            max_steps,
        } => {
            let book = LayoutBook::load(&book)?;
            let config = book
                .get(&name)
                .ok_or_else(|| eyre!("no layout named `{name}`"))?;
            let grid = Grid::from_config(config).wrap_err_with(|| format!("layout `{name}`"))?;
            let (start, end) = endpoints(config, start, end)?;
            run(&grid, start, end, animate.then_some(speed), max_steps)
        }
        Command::List { book } => {
            let book = LayoutBook::load(&book)?;
            if book.is_empty() {
                println!("(no layouts)");
            }
            for (name, config) in book.iter() {
                println!(
                    "{name:20} {size:>3}x{size:<3} {nodes:>5} painted",
                    size = config.size,
                    nodes = config.nodes.len()
                );
            }
            Ok(())
        }
        Command::Generate {
            book: path,
            name,
            size,
            density,
            max_weight,
            seed,
            start,
            end,
        } => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let mut grid = generate(GenParams {
                size,
                density,
                max_weight,
                seed,
            })?;
            let start = start.unwrap_or(Point::ZERO);
            let end = end.unwrap_or(Point::from_row_col(size - 1, size - 1));
            // Keep the stored endpoints usable.
            grid.set_obstacle(start, false)?;
            grid.set_obstacle(end, false)?;

            let mut book = LayoutBook::load_or_default(&path)?;
            if book.get(&name).is_some() {
                warn!("replacing existing layout `{name}`");
            }
            book.insert(
                name.as_str(),
                grid.export_config().with_endpoints(Some(start), Some(end)),
            );
            book.save(&path)?;
            println!("stored `{name}` (seed {seed}) in {}", path.display());
            Ok(())
        }
    }
}

fn run(
    grid: &Grid,
    start: Point,
    end: Point,
    animate: Option<Speed>,
    max_steps: Option<usize>,
) -> Result<()> {
    let mut engine = SearchEngine::for_grid(grid);
    engine.set_start_and_end(grid, start, end)?;
    info!("searching {start} -> {end} on a {0}x{0} grid", grid.size());

    let outcome = drive(&mut engine, grid, max_steps, |engine| {
        if let Some(speed) = animate {
            // Clear screen, cursor home.
            print!("\x1b[2J\x1b[H{}", render(grid, engine));
            println!("step {}", engine.steps());
            thread::sleep(speed.delay());
        }
    })?;

    println!("{}", render(grid, &engine));
    let opened = engine.open_set().count() + engine.closed_set().count();
    match outcome {
        Outcome::Found { cost } => {
            println!(
                "path: {} cells, cost {cost}, {} steps, {opened} cells visited",
                engine.path().len(),
                engine.steps()
            );
            Ok(())
        }
        Outcome::NoPath => Err(eyre!(
            "destination unreachable after {} steps",
            engine.steps()
        )),
        Outcome::BudgetExceeded { steps } => {
            println!("no path within budget of {steps} steps");
            Ok(())
        }
    }
}
