//! Star Field entry point
//!
//! On the web this mounts the field into the page's `.stars` container. Natively
//! it runs the simulation headlessly and reports what would have been drawn.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use star_field::platform::web::mount;
    use star_field::{Settings, StopHandle};

    thread_local! {
        /// Keeps the running field alive; taking it out stops everything
        static RUNNING: RefCell<Option<StopHandle>> = const { RefCell::new(None) };
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Star Field starting...");

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let Some(container) = document.query_selector(".stars")? else {
            log::warn!("No .stars container on the page; nothing to mount");
            return Ok(());
        };

        let handle = mount(container, Settings::load())?;
        RUNNING.with(|slot| *slot.borrow_mut() = Some(handle));
        Ok(())
    }

    /// Stop the animation and remove its listeners
    #[wasm_bindgen]
    pub fn stop_star_field() {
        let handle = RUNNING.with(|slot| slot.borrow_mut().take());
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_host::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use star_field::{FrameScheduler, LineBuffer, Settings, StarField, Viewport};

    /// Frames between progress reports
    const REPORT_EVERY: u64 = 60;

    #[derive(Parser, Debug)]
    #[command(name = "star-field")]
    #[command(about = "Run the star field headlessly and report the lines it draws")]
    pub struct Cli {
        /// Settings JSON file; defaults are used when omitted
        pub settings: Option<PathBuf>,

        /// Frames to run (ten seconds at 60 Hz by default)
        #[arg(short, long, default_value_t = 600)]
        pub frames: u64,

        /// Surface size as WIDTHxHEIGHT
        #[arg(long, default_value = "1920x1080", value_parser = parse_viewport)]
        pub viewport: Viewport,
    }

    pub fn run(cli: Cli) {
        let settings = match &cli.settings {
            Some(path) => load_settings(path),
            None => Settings::load(),
        };
        let viewport = cli.viewport;

        let seed = settings.seed.unwrap_or_else(clock_seed);
        let mut field = StarField::new(settings, viewport, seed);
        log::info!(
            "Field ready: {} stars, {}x{}, seed {}",
            field.particles().len(),
            viewport.width,
            viewport.height,
            seed
        );

        let scheduler = FrameScheduler::new();
        let handle = scheduler.start();
        let mut surface = LineBuffer::new();

        let mut remaining = cli.frames;
        while remaining > 0 {
            let batch = remaining.min(REPORT_EVERY);
            scheduler.run_headless(&mut field, &mut surface, batch);
            remaining -= batch;

            let lines = field.lines();
            log::info!(
                "frame {:>6}: {:>4} star lines, {} pointer lines",
                field.ticks(),
                lines.stars.len(),
                lines.pointer.len()
            );
        }
        handle.stop();

        println!(
            "Ran {} frames over {} stars; drew {} lines in total",
            scheduler.frames(),
            field.particles().len(),
            surface.stroked
        );
    }

    fn load_settings(path: &Path) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}; using defaults", path.display(), e);
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}; using defaults", path.display(), e);
                Settings::default()
            }
        }
    }

    fn parse_viewport(s: &str) -> Result<Viewport, String> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let dim = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("bad dimension `{v}` in `{s}`: {e}"))
        };
        Ok(Viewport::new(dim(w)?, dim(h)?))
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_is_well_formed() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_parse_viewport() {
            assert_eq!(parse_viewport("800x600"), Ok(Viewport::new(800, 600)));
            assert!(parse_viewport("800").is_err());
            assert!(parse_viewport("ax600").is_err());
            assert!(parse_viewport("640by480").is_err());
        }

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["star-field"]).unwrap();
            assert_eq!(cli.settings, None);
            assert_eq!(cli.frames, 600);
            assert_eq!(cli.viewport, Viewport::new(1920, 1080));
        }

        #[test]
        fn test_flags_parse() {
            let cli = Cli::try_parse_from([
                "star-field",
                "field.json",
                "--frames",
                "30",
                "--viewport",
                "640x480",
            ])
            .unwrap();
            assert_eq!(cli.settings, Some(PathBuf::from("field.json")));
            assert_eq!(cli.frames, 30);
            assert_eq!(cli.viewport, Viewport::new(640, 480));
        }

        #[test]
        fn test_bad_input_is_rejected() {
            assert!(Cli::try_parse_from(["star-field", "--frames", "10frames"]).is_err());
            assert!(Cli::try_parse_from(["star-field", "--viewport", "640by480"]).is_err());
            assert!(Cli::try_parse_from(["star-field", "a.json", "b.json"]).is_err());
        }

        #[test]
        fn test_help_is_not_a_settings_path() {
            let err = Cli::try_parse_from(["star-field", "--help"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = headless::Cli::parse();
    env_logger::init();
    log::info!("Star Field (native) starting...");

    headless::run(cli);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
