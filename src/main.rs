use clap::{Parser, Subcommand};
use gallery_lightbox::{config, output, page, resolver};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-lightbox")]
#[command(about = "Authoring companion for the gallery lightbox page")]
#[command(long_about = "\
Authoring companion for the gallery lightbox page

The page itself is static markup plus a wasm behavior layer that, on load,
finds each card's preview by project number and enlarges cards into a
lightbox on click. This tool renders that markup from config.toml and checks
offline which asset each card would resolve to.

Site structure:

  site/
  ├── config.toml              # Catalog and settings (optional)
  ├── index.html               # Written by 'render'
  ├── pkg/                     # wasm-pack output (gallery_lightbox.js + .wasm)
  └── images/
      ├── project-07.jpg       # Card 'No. 07' (first existing extension wins)
      ├── project-12.pdf       # Documents are embedded
      └── project-23.png

Asset resolution (first loadable wins, in configured order):
  jpg → jpeg → png → webp → pdf

Run 'gallery-lightbox gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory (holds config.toml and the asset directory)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the gallery page scaffold
    Render {
        /// Output directory for index.html
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Resolve every catalog card against the asset directory
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { output: out_dir } => {
            let config = config::load_config(&cli.source)?;
            let page_path = page::write_page(&config, &out_dir)?;
            output::print_render_output(&config, &page_path);
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let loader = resolver::FsLoader::new(&cli.source);
            let reports = resolver::resolve_catalog(&config, &loader);
            output::print_check_output(&reports);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
