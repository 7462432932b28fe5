use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use zxart_palette::cli::Args;
use zxart_palette::image_io::{default_output_path, load_image, save_image};
use zxart_palette::tui::{self, TuiApp};
use zxart_palette::{PaletteStore, Recolorer};

fn main() -> Result<()> {
    let args = Args::parse();
    // Log lines would tear the alternate screen.
    if !args.tui {
        init_logging(args.verbose);
    }

    let store = match &args.palettes {
        Some(path) => PaletteStore::from_path(path)?,
        None => PaletteStore::builtin().context("built-in palette definitions are invalid")?,
    };

    if args.list {
        for name in store.list_palette_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let recolorer = Recolorer::new(store.source_palette()?);

    if args.tui {
        let app = TuiApp::new(store, recolorer, args.input, args.output, &args.palette);
        return tui::run(app);
    }

    let input = args.input.context("an input image is required")?;

    let target = store.load_palette(&args.palette)?;
    let image = load_image(&input)?;
    let result = recolorer.colorize_image(&image, &target)?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&input, &args.palette));
    save_image(&result, &output)?;
    info!(palette = args.palette.as_str(), path = %output.display(), "saved colorized image");
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
