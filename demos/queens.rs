use clap::Parser;

use fdset::constraint::Constraint;
use fdset::render::RenderConfig;
use fdset::set::Set;
use fdset::types::Var;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of queens.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Stop after this many solutions.
    #[clap(long, value_name = "INT")]
    limit: Option<usize>,

    /// Print every board.
    #[clap(long)]
    boards: bool,

    /// Print the declarations before solving.
    #[clap(long)]
    declarations: bool,
}

/// `v != e`, as the union of the two open sides.
fn not_equal(e: fdset::expr::LinearExpr) -> Constraint {
    Constraint::less_than(e.clone()) | Constraint::greater_than(e)
}

fn render_board(columns: &[i64]) -> String {
    let n = columns.len() as i64;
    let mut board = String::new();
    for &c in columns {
        for j in 0..n {
            board.push(if j == c { 'Q' } else { '.' });
        }
        board.push('\n');
    }
    board
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    // One variable per row, holding the column of its queen:
    // - every column in [0, n)
    // - no two queens in the same column
    // - no two queens on the same diagonal
    let n = args.n;
    let mut queens = Set::new(|v: &[i64]| v.to_vec());
    let mut rows: Vec<Var> = Vec::with_capacity(n);
    for i in 0..n {
        let mut clauses = vec![Constraint::between(0, n as i64 - 1)];
        for (j, &row) in rows.iter().enumerate() {
            let distance = (i - j) as i64;
            clauses.push(not_equal(row.into()));
            clauses.push(not_equal(row + distance));
            clauses.push(not_equal(row - distance));
        }
        rows.push(queens.declare(Constraint::and(clauses)));
    }

    if args.declarations {
        let config = RenderConfig {
            names: (0..n).map(|i| format!("row{}", i)).collect(),
            ..Default::default()
        };
        print!("{}", queens.registry().to_text_with_config(&config)?);
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut count = 0;
    for columns in queens.iter()?.take(limit) {
        count += 1;
        if args.boards {
            println!("Solution #{}: {:?}", count, columns);
            println!("{}", render_board(&columns));
        }
    }
    println!("Found {} solutions for n = {}", count, n);

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
