//! CLI for mathdown - markdown with LaTeX to MathJax-ready HTML

use clap::Parser;
use mathdown::{style, MathEscaping, Page, PageOptions, RenderOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input markdown file path
    input: PathBuf,

    /// Output HTML file path (optional, prints to stdout if not specified)
    output: Option<PathBuf>,

    /// Write a complete HTML page with MathJax setup instead of a fragment
    #[arg(long)]
    standalone: bool,

    /// Custom stylesheet for standalone pages
    #[arg(long)]
    css: Option<PathBuf>,

    /// Page title for standalone pages (default: first `# ` heading)
    #[arg(long)]
    title: Option<String>,

    /// Restore math without doubling backslashes
    #[arg(long)]
    verbatim_math: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "mathdown=debug"
    } else {
        "mathdown=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn convert(args: &Args) -> mathdown::Result<String> {
    let source = std::fs::read(&args.input)?;
    let markup = String::from_utf8(source)
        .map_err(|e| mathdown::Error::Input(format!("{:?} is not UTF-8: {}", args.input, e)))?;

    if args.standalone {
        let options = PageOptions {
            title: args.title.clone(),
            css: style::load_css(args.css.as_deref())?,
            ..Default::default()
        };
        let mut page = Page::new(options);
        page.push_markdown(markup);
        return Ok(page.render());
    }

    let options = RenderOptions {
        math_escaping: if args.verbatim_math {
            MathEscaping::Verbatim
        } else {
            MathEscaping::StringLiteral
        },
    };
    Ok(mathdown::render_with_options(&markup, &options))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match convert(&args) {
        Ok(html) => {
            if let Some(output) = &args.output {
                if let Err(e) = std::fs::write(output, &html) {
                    eprintln!("Error writing output: {}", e);
                    std::process::exit(1);
                }
                tracing::info!(output = %output.display(), "wrote HTML");
            } else {
                println!("{}", html);
            }
        }
        Err(e) => {
            eprintln!("Error converting markdown: {}", e);
            std::process::exit(1);
        }
    }
}
