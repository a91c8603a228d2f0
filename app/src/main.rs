use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use newengine_assert::{
    assert_condition, assert_forced, assert_message, AssertConfig, AssertionManager,
    DefaultAssertHandler,
};
use newengine_modules_logging::ConsoleLogger;

const CONFIG_PATH: &str = "demo.toml";

#[derive(Debug, Clone, Deserialize)]
struct DemoConfig {
    #[serde(default = "default_ticks")]
    ticks: u32,
    #[serde(default = "default_hero_speed")]
    hero_speed: i32,
    #[serde(default = "default_display_width")]
    display_width: i32,
}

fn default_ticks() -> u32 { 300 }
fn default_hero_speed() -> i32 { 2 }
fn default_display_width() -> i32 { 480 }

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            hero_speed: default_hero_speed(),
            display_width: default_display_width(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RootToml {
    #[serde(default)]
    demo: DemoConfig,
}

fn load_configs(path: &Path) -> Result<(DemoConfig, AssertConfig)> {
    if !path.exists() {
        log::info!("{} not found, using defaults", path.display());
        return Ok((DemoConfig::default(), AssertConfig::from_env()));
    }

    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let root: RootToml = toml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;

    let mut assert_cfg = AssertConfig::parse_toml(&text)?;
    for err in assert_cfg.apply_env() {
        log::warn!("ignoring env override: {err}");
    }
    Ok((root.demo, assert_cfg))
}

struct Hero {
    x: i32,
}

fn main() -> Result<()> {
    ConsoleLogger::default().init()?;

    let (demo, assert_cfg) = load_configs(Path::new(CONFIG_PATH))?;
    log::info!("assert config: {assert_cfg:?}");
    AssertionManager::instance().set_handler(DefaultAssertHandler::from_config(&assert_cfg));

    assert_message!(demo.display_width > 0, "display width must be positive: {}", demo.display_width);

    let mut hero = Hero { x: 0 };
    for tick in 0..demo.ticks {
        hero.x += demo.hero_speed;
        assert_condition!(hero.x >= 0);
        assert_message!(
            hero.x <= demo.display_width,
            "hero left the screen at tick {tick}: x={}",
            hero.x
        );
        if hero.x > demo.display_width {
            hero.x = 0;
        }
    }

    if demo.ticks == 0 {
        assert_forced!("demo ran zero ticks");
    }

    log::info!("demo finished, hero.x={}", hero.x);
    Ok(())
}
