//! Calctex CLI - evaluate LaTeX math expressions from the command line

#[cfg(feature = "cli")]
use calctex::{convert, BracketStyle, CalcError, ConvertOptions};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "calctex")]
#[command(version)]
#[command(about = "Calctex - LaTeX math calculator", long_about = None)]
struct Cli {
    /// LaTeX math expression (reads from stdin if not provided)
    latex_expr: Option<String>,

    /// Print "input = output" instead of just "output"
    #[arg(short, long)]
    equation_form: bool,

    /// Output matrices are [] enclosed instead of the default ()
    #[arg(short, long)]
    bmatrix: bool,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let input = match cli.latex_expr {
        Some(expr) => expr,
        None => {
            let mut buffer = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("{}", CalcError::from(err));
                std::process::exit(1);
            }
            buffer.trim_end().to_string()
        }
    };

    let options = ConvertOptions {
        equation_form: cli.equation_form,
        bracket_style: if cli.bmatrix {
            BracketStyle::Square
        } else {
            BracketStyle::Round
        },
    };

    match convert(&input, &options) {
        Ok(output) => {
            // no trailing newline
            print!("{}", output);
            let _ = io::stdout().flush();
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
}
