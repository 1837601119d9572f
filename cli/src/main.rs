
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use plan_canvas::camera::Point;
use plan_canvas::config::{CanvasConfig, ConfigError};
use plan_canvas::doc::Shape;
use plan_canvas::engine::{Action, Engine, MeasurementCounts, ToastLevel};
use plan_canvas::geometry::{format_area_label, format_distance, pixel_area_to_m2, polygon_area, volume_m3};
use plan_canvas::input::{Button, Key, Modifiers, PointerEvent, PointerKind, WheelDelta};
use plan_canvas::mode::{Mode, Placeable};
use plan_canvas::raster::RasterError;
use plan_canvas::scene::{Scene, SceneError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("background image: {0}")]
    Raster(#[from] RasterError),
    #[error("scene snapshot: {0}")]
    Scene(#[from] SceneError),
    #[error("invalid point {0:?}, expected x,y")]
    InvalidPoint(String),
    #[error("scale must be a positive number of px per mm")]
    InvalidScale,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CliError + '_ {
    move |source| CliError::Io { path: path.to_owned(), source }
}

#[derive(Parser, Debug)]
#[command(name = "planmark", about = "Headless floor-plan markup and measurement")]
struct Cli {
    /// JSON config file. Without it, PLAN_* environment variables apply.
    #[arg(long, env = "PLANMARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSONL session script through the engine.
    Replay(ReplayArgs),
    /// Area (and optional volume) of a polygon given in pixels.
    Area(AreaArgs),
    /// Real-world length of a pixel segment.
    Distance(DistanceArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Floor-plan raster to load as the background.
    #[arg(long)]
    background: Option<PathBuf>,

    /// World pixels per native background pixel.
    #[arg(long, default_value_t = 1.0)]
    background_scale: f64,

    #[arg(long, default_value = "-", help = "Script path, or - for stdin")]
    script: String,

    /// Directory for background.png, crop-N.png and scene.json.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f64,

    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,

    /// Fit the background into the viewport before replaying.
    #[arg(long, default_value_t = false)]
    fit: bool,
}

#[derive(Args, Debug)]
struct AreaArgs {
    #[arg(long)]
    px_per_mm: f64,

    #[arg(long)]
    height_mm: Option<f64>,

    /// Vertices as x,y pairs.
    #[arg(required = true, num_args = 3.., allow_hyphen_values = true)]
    points: Vec<String>,
}

#[derive(Args, Debug)]
struct DistanceArgs {
    #[arg(long)]
    px_per_mm: f64,

    #[arg(allow_hyphen_values = true)]
    from: String,

    #[arg(allow_hyphen_values = true)]
    to: String,
}

/// One line of a session script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Mode { mode: Mode },
    /// Select an entity key (`"door"`, `"text"`, `"line"`...), or `null` to deselect.
    Placeable { key: Option<String> },
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    /// Down then up at the same point.
    Click(PointerStep),
    /// Key press. Space stays held until a matching `key_up`.
    #[serde(alias = "key_down")]
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        dy: f64,
    },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
    Undo,
    Redo,
    Scale { px_per_mm: Option<f64> },
    Grid { visible: bool, size_mm: f64 },
    Color { color: String },
    /// Replace the text of the selected label.
    Text { text: String },
    TitleBlock { left: f64, top: f64, width: f64, height: f64 },
    Delete,
    FitBackground,
    ResetView,
    AnswerCrop { confirm: bool },
    AnswerDistance { value: Option<String> },
    AnswerHeight { value: Option<String> },
}

#[derive(Debug, Deserialize)]
struct PointerStep {
    x: f64,
    y: f64,
    #[serde(default)]
    button: Button,
    #[serde(default)]
    modifiers: Modifiers,
    #[serde(default)]
    kind: PointerKind,
}

impl PointerStep {
    fn event(&self) -> PointerEvent {
        PointerEvent::at(self.x, self.y)
            .with_button(self.button)
            .with_modifiers(self.modifiers)
            .with_kind(self.kind)
    }
}

#[derive(Debug, Serialize)]
struct Toast {
    level: ToastLevel,
    message: String,
}

#[derive(Debug, Default)]
struct Collected {
    toasts: Vec<Toast>,
    crops: Vec<Vec<u8>>,
    edit_requests: usize,
}

impl Collected {
    fn absorb(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Toast { level, message } => {
                    warn!(?level, %message, "toast");
                    self.toasts.push(Toast { level, message });
                }
                Action::CropExtracted { region, image } => {
                    info!(?region, width = image.width, height = image.height, "crop extracted");
                    self.crops.push(image.png);
                }
                Action::EditTextRequested { id } => {
                    debug!(%id, "text edit requested");
                    self.edit_requests += 1;
                }
                other => debug!(action = ?other, "action"),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    mode: Mode,
    scale_px_per_mm: Option<f64>,
    zoom: f64,
    counts: MeasurementCounts,
    measurements: Vec<Value>,
    undo_depth: usize,
    redo_depth: usize,
    colors: Vec<String>,
    toasts: Vec<Toast>,
    crops: usize,
    edit_requests: usize,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay(args) => run_replay(config, args),
        Command::Area(args) => run_area(&args),
        Command::Distance(args) => run_distance(&args),
    }
}

fn load_config(path: Option<&Path>) -> Result<CanvasConfig, CliError> {
    let Some(path) = path else {
        return Ok(CanvasConfig::from_env()?);
    };
    let raw = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(CanvasConfig::from_json_str(&raw)?)
}

fn run_replay(config: CanvasConfig, args: ReplayArgs) -> Result<(), CliError> {
    let mut engine = Engine::headless(config);
    engine.set_viewport(args.viewport_width, args.viewport_height, 1.0);
    let mut collected = Collected::default();

    if let Some(path) = &args.background {
        let bytes = fs::read(path).map_err(io_error(path))?;
        collected.absorb(engine.load_background(&bytes, 0.0, 0.0, args.background_scale)?);
        if args.fit {
            collected.absorb(engine.fit_background());
        }
    }

    let reader: Box<dyn BufRead> = if args.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let path = Path::new(&args.script);
        Box::new(BufReader::new(File::open(path).map_err(io_error(path))?))
    };

    let mut steps = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error(Path::new(&args.script)))?;
        let Some(step) = parse_step_line(&line).map_err(|source| CliError::Script { line: index + 1, source })? else {
            continue;
        };
        collected.absorb(apply_step(&mut engine, step));
        steps += 1;
    }
    info!(steps, mode = %engine.mode(), "replay finished");

    if let Some(dir) = &args.out_dir {
        write_outputs(&engine, &collected, dir)?;
    }
    print_json(&serde_json::to_value(summarize(&engine, collected)?)?)
}

/// Blank lines and `#` comments are skipped.
fn parse_step_line(line: &str) -> Result<Option<Step>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

fn apply_step(engine: &mut Engine, step: Step) -> Vec<Action> {
    match step {
        Step::Mode { mode } => engine.set_mode(mode),
        Step::Placeable { key } => engine.select_placeable(key.as_deref().map(Placeable::from_key)),
        Step::Down(p) => engine.on_pointer_down(p.event()),
        Step::Move(p) => engine.on_pointer_move(p.event()),
        Step::Up(p) => engine.on_pointer_up(p.event()),
        Step::Click(p) => {
            let mut actions = engine.on_pointer_down(p.event());
            actions.extend(engine.on_pointer_up(p.event()));
            actions
        }
        Step::Key { key, modifiers } => engine.on_key_down(&Key(key), modifiers),
        Step::KeyUp { key, modifiers } => engine.on_key_up(&Key(key), modifiers),
        Step::Wheel { x, y, dx, dy } => engine.on_wheel(Point::new(x, y), WheelDelta { dx, dy }),
        Step::TouchStart { touches } => engine.on_touch_start(&touches),
        Step::TouchMove { touches } => engine.on_touch_move(&touches),
        Step::TouchEnd => engine.on_touch_end(),
        Step::Undo => engine.undo(),
        Step::Redo => engine.redo(),
        Step::Scale { px_per_mm } => engine.set_scale(px_per_mm),
        Step::Grid { visible, size_mm } => engine.set_grid(visible, size_mm),
        Step::Color { color } => engine.set_stroke_color(&color),
        Step::Text { text } => match engine.scene().active() {
            Some(id) => engine.set_text(id, &text),
            None => {
                warn!("no active label to edit");
                Vec::new()
            }
        },
        Step::TitleBlock { left, top, width, height } => engine.set_title_block(left, top, width, height),
        Step::Delete => engine.delete_active(),
        Step::FitBackground => engine.fit_background(),
        Step::ResetView => engine.reset_view(),
        Step::AnswerCrop { confirm } => {
            engine.prompts_mut().answer_crop(confirm);
            Vec::new()
        }
        Step::AnswerDistance { value } => {
            engine.prompts_mut().answer_distance(value.as_deref());
            Vec::new()
        }
        Step::AnswerHeight { value } => {
            engine.prompts_mut().answer_height(value.as_deref());
            Vec::new()
        }
    }
}

fn summarize(engine: &Engine, collected: Collected) -> Result<Summary, CliError> {
    // one entry per polygon or distance group; area labels repeat the polygon's tag
    let measurements = engine
        .scene()
        .objects()
        .iter()
        .filter(|d| !d.preview && !matches!(d.shape, Shape::Text { .. }))
        .filter_map(|d| d.tag.as_ref())
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Summary {
        mode: engine.mode(),
        scale_px_per_mm: engine.scale(),
        zoom: engine.zoom(),
        counts: engine.counts(),
        measurements,
        undo_depth: engine.history().undo_depth(),
        redo_depth: engine.history().redo_depth(),
        colors: engine.color_history().to_vec(),
        toasts: collected.toasts,
        crops: collected.crops.len(),
        edit_requests: collected.edit_requests,
    })
}

fn write_outputs(engine: &Engine, collected: &Collected, dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    if let Some(Shape::Background { image }) = engine.scene().background().map(|d| &d.shape) {
        let path = dir.join("background.png");
        fs::write(&path, &image.png).map_err(io_error(&path))?;
    }
    for (n, png) in collected.crops.iter().enumerate() {
        let path = dir.join(format!("crop-{}.png", n + 1));
        fs::write(&path, png).map_err(io_error(&path))?;
    }
    let path = dir.join("scene.json");
    fs::write(&path, engine.scene().serialize()?).map_err(io_error(&path))?;
    info!(dir = %dir.display(), crops = collected.crops.len(), "outputs written");
    Ok(())
}

fn run_area(args: &AreaArgs) -> Result<(), CliError> {
    let scale = positive_scale(args.px_per_mm)?;
    let points = args.points.iter().map(|raw| parse_point(raw)).collect::<Result<Vec<_>, _>>()?;
    let area_m2 = pixel_area_to_m2(polygon_area(&points), scale);
    let volume = args.height_mm.filter(|h| h.is_finite() && *h > 0.0).map(|h| volume_m3(area_m2, h));
    print_json(&serde_json::json!({
        "area_m2": area_m2,
        "volume_m3": volume,
        "label": format_area_label(area_m2, volume),
    }))
}

fn run_distance(args: &DistanceArgs) -> Result<(), CliError> {
    let scale = positive_scale(args.px_per_mm)?;
    let (a, b) = (parse_point(&args.from)?, parse_point(&args.to)?);
    let pixels = a.distance_to(b);
    print_json(&serde_json::json!({
        "pixels": pixels,
        "mm": pixels / scale,
        "label": format_distance(pixels, scale),
    }))
}

fn positive_scale(px_per_mm: f64) -> Result<f64, CliError> {
    if px_per_mm.is_finite() && px_per_mm > 0.0 { Ok(px_per_mm) } else { Err(CliError::InvalidScale) }
}

fn parse_point(raw: &str) -> Result<Point, CliError> {
    let invalid = || CliError::InvalidPoint(raw.to_owned());
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(Point::new(x, y))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
