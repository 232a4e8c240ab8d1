use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    cursor::Hide,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{Clear, ClearType, enable_raw_mode},
};
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use pagescroll::backend::pdf::MupdfLibrary;
use pagescroll::keyboard::KeyboardHub;
use pagescroll::panic_handler::{initialize_panic_handler, restore_terminal};
use pagescroll::script::parse_script;
use pagescroll::settings;
use pagescroll::surface::export_pages;
use pagescroll::{FetchResponse, Viewer, ViewerEvent};

/// Continuous-scroll PDF viewer
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// PDF file to open
    file: PathBuf,

    /// Location URL whose `book` parameter names the document
    #[arg(long)]
    book_url: Option<String>,

    /// Container width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Container height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Commands to run after loading, e.g. "goto 3; scale 1.5; font large"
    #[arg(long)]
    script: Option<String>,

    /// Write rendered pages as PNG files into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Read navigation keys from the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "pagescroll.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), File::create(&cli.log_file)?)?;
    info!("Starting pagescroll for {:?}", cli.file);

    match &cli.config {
        Some(path) => {
            if !settings::load_settings_from_path(path) {
                bail!("could not load settings from {}", path.display());
            }
        }
        None => settings::load_settings(),
    }

    let commands = match &cli.script {
        Some(script) => parse_script(script)?,
        None => Vec::new(),
    };

    let mut viewer = Viewer::new(MupdfLibrary, cli.width, cli.height);
    if let Some(url) = &cli.book_url {
        viewer = viewer.with_location(url.clone());
    }

    let last_event: Rc<RefCell<Option<ViewerEvent>>> = Rc::new(RefCell::new(None));
    let interactive = cli.interactive;
    let sink = Rc::clone(&last_event);
    viewer.subscribe(move |event| {
        if !interactive {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Could not serialize {}: {e}", event.name()),
            }
        }
        *sink.borrow_mut() = Some(event.clone());
    });

    let response = FetchResponse::from_path(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    viewer.load(response)?;

    for command in &commands {
        command.execute(&mut viewer);
    }

    if let Some(dir) = &cli.export {
        let written = export_pages(viewer.pages(), dir)?;
        info!("Exported {} pages to {}", written.len(), dir.display());
    }

    if cli.interactive {
        initialize_panic_handler();
        enable_raw_mode()?;
        execute!(io::stderr(), Hide)?;
        let res = run_interactive(&mut viewer, &last_event);
        restore_terminal();
        res?;
    }

    viewer.cleanup();
    info!("Shutting down pagescroll");
    Ok(())
}

fn run_interactive(
    viewer: &mut Viewer<MupdfLibrary>,
    last_event: &Rc<RefCell<Option<ViewerEvent>>>,
) -> Result<()> {
    let frame = Duration::from_millis(16);
    let hub = KeyboardHub::document();

    loop {
        draw_status(viewer, last_event)?;

        if event::poll(frame)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('+') => {
                        let _ = viewer.set_scale(viewer.scale() + 0.25);
                    }
                    KeyCode::Char('-') => {
                        let _ = viewer.set_scale(viewer.scale() - 0.25);
                    }
                    KeyCode::Char('n') => viewer.next(),
                    KeyCode::Char('p') => viewer.prev(),
                    KeyCode::Char('d') => {
                        let _ = viewer.handle_double_tap();
                    }
                    code => {
                        hub.dispatch(code);
                    }
                }
            }
        }

        viewer.tick();
    }
}

fn draw_status(
    viewer: &Viewer<MupdfLibrary>,
    last_event: &Rc<RefCell<Option<ViewerEvent>>>,
) -> Result<()> {
    let mut err = io::stderr();
    let detail = match (viewer.status().current(), last_event.borrow().as_ref()) {
        (Some(message), _) => message.text.clone(),
        (None, Some(event)) => event.name().to_string(),
        (None, None) => String::new(),
    };
    execute!(err, Clear(ClearType::CurrentLine))?;
    write!(
        err,
        "\rpage {}/{}  scale {:.2}  offset {:.0}/{:.0}  {detail}",
        viewer.current_page(),
        viewer.total_pages(),
        viewer.scale(),
        viewer.container().scroll_top(),
        viewer.container().max_scroll(),
    )?;
    err.flush()?;
    Ok(())
}
