//! deckview CLI - PPTX presentation preview tool
//!
//! A command-line tool for rendering PowerPoint presentations to HTML,
//! plain text, or JSON, from local files or URLs.

use clap::{Parser, Subcommand};
use colored::*;
use deckview::render::{self, RenderOptions};
use deckview::{FetchPolicy, HostedViewer, Presentation, Preview, PreviewSession, Shape};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use url::Url;

/// PPTX presentation preview rendering
#[derive(Parser)]
#[command(
    name = "deckview",
    version,
    about = "Preview PowerPoint presentations as HTML",
    long_about = "deckview - client-side PPTX preview rendering.\n\n\
                  Parses a presentation from a file or URL and renders scaled HTML,\n\
                  plain text, or structured JSON."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a presentation to HTML
    Render {
        /// Input file path or http(s) URL
        input: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Container width in CSS pixels
        #[arg(long, default_value_t = 960.0)]
        width: f64,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Hosted viewer embed endpoint, used for publicly reachable URLs
        #[arg(long)]
        viewer: Option<Url>,

        /// Relay proxy endpoint, used when a direct download fails
        #[arg(long)]
        proxy: Option<Url>,

        /// Emit an HTML fragment instead of a standalone page
        #[arg(long)]
        fragment: bool,
    },

    /// Convert a presentation to plain text
    Text {
        /// Input file path or http(s) URL
        input: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a presentation to JSON
    Json {
        /// Input file path or http(s) URL
        input: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show presentation information and metadata
    Info {
        /// Input file path or http(s) URL
        input: String,
    },

    /// Extract embedded media from a presentation
    Extract {
        /// Input file path or http(s) URL
        input: String,

        /// Output directory for media files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "off"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            input,
            output,
            width,
            title,
            viewer,
            proxy,
            fragment,
        } => {
            let pb = create_spinner("Rendering presentation...");

            let mut options = RenderOptions::new().with_container_width(width);
            if let Some(title) = title {
                options = options.with_title(title);
            }

            let mut policy = FetchPolicy::new();
            if let Some(proxy) = proxy {
                policy = policy.with_proxy(proxy);
            }
            let viewer = viewer.map(HostedViewer::new);

            let session = PreviewSession::new();
            let token = session.begin();

            let preview =
                block_on(deckview::preview(&input, &policy, viewer.as_ref(), &token))??;

            let html = match preview {
                Preview::Hosted { embed_url } => {
                    render::to_embed_page(embed_url.as_str(), &options)
                }
                Preview::Local(presentation) => {
                    if fragment {
                        render::to_html(&presentation, &options)
                    } else {
                        render::to_html_page(&presentation, &options)
                    }
                }
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &html)?;

            if let Some(path) = output {
                println!("{} Rendered HTML: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Text { input, output } => {
            let pb = create_spinner("Parsing presentation...");

            let presentation = load_presentation(&input)?;
            let text = presentation.plain_text();

            pb.finish_and_clear();
            write_output(output.as_ref(), &text)?;

            if let Some(path) = output {
                println!("{} Converted to text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Parsing presentation...");

            let presentation = load_presentation(&input)?;
            let json = if compact {
                presentation.to_json_compact()?
            } else {
                presentation.to_json()?
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!("{} Converted to JSON: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing presentation...");

            let presentation = load_presentation(&input)?;

            pb.finish_and_clear();

            let mut text_shapes = 0;
            let mut image_shapes = 0;
            for slide in &presentation.slides {
                for shape in &slide.shapes {
                    match shape {
                        Shape::Text(_) => text_shapes += 1,
                        Shape::Image(_) => image_shapes += 1,
                    }
                }
            }

            println!("{}", "Presentation Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Source".bold(), input);
            println!(
                "{}: {} x {} EMU ({} x {} px)",
                "Slide size".bold(),
                presentation.size.width_emu,
                presentation.size.height_emu,
                presentation.size.width_px(),
                presentation.size.height_px()
            );
            println!("{}: {}", "Slides".bold(), presentation.slides.len());
            println!("{}: {}", "Text shapes".bold(), text_shapes);
            println!("{}: {}", "Image shapes".bold(), image_shapes);

            if let Some(ref title) = presentation.metadata.title {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(ref author) = presentation.metadata.author {
                println!("{}: {}", "Author".bold(), author);
            }
            if let Some(ref created) = presentation.metadata.created {
                println!("{}: {}", "Created".bold(), created);
            }
            if let Some(ref modified) = presentation.metadata.modified {
                println!("{}: {}", "Modified".bold(), modified);
            }

            let text = presentation.plain_text();
            println!("\n{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Words".bold(), text.split_whitespace().count());
            println!("{}: {}", "Characters".bold(), text.len());
        }

        Commands::Extract { input, output } => {
            let pb = create_spinner("Extracting media...");

            let parser = match Url::parse(&input) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                    let bytes = block_on(deckview::fetch_bytes(&url, &FetchPolicy::new()))??;
                    deckview::PptxParser::from_bytes(bytes)?
                }
                _ => deckview::PptxParser::open(&input)?,
            };

            fs::create_dir_all(&output)?;

            let mut count = 0;
            for part in parser.container().list_parts_with_prefix("ppt/media/") {
                let data = parser.container().read_binary(&part)?;
                let filename = part.rsplit('/').next().unwrap_or(&part);
                fs::write(output.join(filename), &data)?;
                count += 1;
            }

            pb.finish_and_clear();

            if count > 0 {
                println!(
                    "{} Extracted {} media files to {}",
                    "✓".green().bold(),
                    count,
                    output.display()
                );
            } else {
                println!("{} No media found in presentation", "!".yellow().bold());
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Parse the input as a deck, downloading it first when it is a URL.
fn load_presentation(input: &str) -> Result<Presentation, Box<dyn std::error::Error>> {
    match Url::parse(input) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            let bytes = block_on(deckview::fetch_bytes(&url, &FetchPolicy::new()))??;
            Ok(deckview::parse_bytes(&bytes)?)
        }
        _ => Ok(deckview::parse_file(input)?),
    }
}

fn block_on<F>(future: F) -> Result<F::Output, Box<dyn std::error::Error>>
where
    F: std::future::Future,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn print_version() {
    println!("{} {}", "deckview".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Client-side PPTX presentation preview rendering");
    println!();
    println!("Supported format: PPTX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
