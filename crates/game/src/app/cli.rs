use std::time::Duration;

use engine::{ContentSize, Vec2};

pub(crate) const DEFAULT_TICK_MS: u64 = 16;
pub(crate) const DEFAULT_MAX_SIM_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScriptedTap {
    pub(crate) pixel: Vec2,
    /// Simulated time to wait after the previous tap before this one lands.
    pub(crate) delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunOptions {
    pub(crate) map_id: Option<String>,
    pub(crate) taps: Vec<ScriptedTap>,
    pub(crate) content: Option<ContentSize>,
    pub(crate) tick: Duration,
    pub(crate) max_sim_time: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            map_id: None,
            taps: Vec::new(),
            content: None,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            max_sim_time: Duration::from_millis(DEFAULT_MAX_SIM_MS),
        }
    }
}

pub(crate) fn usage_text() -> String {
    [
        "Usage: game [options]",
        "",
        "Replays scripted taps against an overworld map and logs movement.",
        "",
        "Options:",
        "  --map <id>              map to enter (default: first catalog map)",
        "  --tap <x>,<y>[@<ms>]    tap at content pixel x,y, optionally <ms> after the previous tap",
        "  --content <w>x<h>       measured content size in pixels (default: 48px per tile)",
        "  --tick-ms <n>           fixed simulation step in milliseconds (default: 16)",
        "  --max-sim-ms <n>        stop after this much simulated time (default: 60000)",
        "  -h, --help              show this help",
        "",
        "Environment:",
        "  OVERWORLD_ROOT           asset root containing assets/catalog.json",
        "  OVERWORLD_MISSING_FLAGS  open | solid | <flag> for tile ids without a tileset flag",
        "  RUST_LOG                 log filter (default: info)",
    ]
    .join("\n")
}

/// `Ok(None)` means help was requested.
pub(crate) fn parse_args<I>(args: I) -> Result<Option<RunOptions>, String>
where
    I: IntoIterator<Item = String>,
{
    let args = args.into_iter().collect::<Vec<_>>();
    let mut options = RunOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(None),
            "--map" => {
                let value = value_for(&args, index, "--map")?;
                if value.trim().is_empty() {
                    return Err("empty value for --map".to_string());
                }
                options.map_id = Some(value.trim().to_string());
                index += 2;
            }
            "--tap" => {
                let value = value_for(&args, index, "--tap")?;
                options.taps.push(parse_tap(value)?);
                index += 2;
            }
            "--content" => {
                let value = value_for(&args, index, "--content")?;
                options.content = Some(parse_content(value)?);
                index += 2;
            }
            "--tick-ms" => {
                let value = value_for(&args, index, "--tick-ms")?;
                let millis = parse_millis(value, "--tick-ms")?;
                if millis == 0 {
                    return Err("--tick-ms must be greater than zero".to_string());
                }
                options.tick = Duration::from_millis(millis);
                index += 2;
            }
            "--max-sim-ms" => {
                let value = value_for(&args, index, "--max-sim-ms")?;
                options.max_sim_time = Duration::from_millis(parse_millis(value, "--max-sim-ms")?);
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(Some(options))
}

fn value_for<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_millis(value: &str, flag: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid {flag} value '{value}' (expected u64)"))
}

fn parse_tap(value: &str) -> Result<ScriptedTap, String> {
    let (point, delay) = match value.split_once('@') {
        Some((point, delay)) => (point, parse_millis(delay, "--tap delay")?),
        None => (value, 0),
    };
    let (x, y) = point
        .split_once(',')
        .ok_or_else(|| format!("invalid --tap value '{value}' (expected x,y[@ms])"))?;
    let x = parse_coordinate(x, value)?;
    let y = parse_coordinate(y, value)?;
    Ok(ScriptedTap {
        pixel: Vec2::new(x, y),
        delay: Duration::from_millis(delay),
    })
}

fn parse_coordinate(raw: &str, whole: &str) -> Result<f32, String> {
    let parsed = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid --tap coordinate '{raw}' in '{whole}'"))?;
    if !parsed.is_finite() {
        return Err(format!("non-finite --tap coordinate in '{whole}'"));
    }
    Ok(parsed)
}

fn parse_content(value: &str) -> Result<ContentSize, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("invalid --content value '{value}' (expected <w>x<h>)"))?;
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f32>()
            .ok()
            .filter(|size| size.is_finite() && *size > 0.0)
            .ok_or_else(|| format!("invalid --content dimension '{raw}' in '{value}'"))
    };
    Ok(ContentSize::new(parse(width)?, parse(height)?))
}
