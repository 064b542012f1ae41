use std::fmt;

use anyhow::{bail, Context, Result};
use lcdboy_gpu::{
    Display, GameBoyModel, Gpu, GpuConfig, InterruptKind, InterruptSink, LcdControl, NoDma,
    StatSelect, TimingState, FRAME_TICKS,
};

pub const DEFAULT_FRAMES: u32 = 3;
/// 40 OAM entries.
pub const MAX_SPRITES: u8 = 40;

pub const USAGE: &str = "Usage: lcdboy [dmg|cgb] [frames] [lyc]\n\
     Environment: LCDBOY_STAT=<hex STAT enable bits>, LCDBOY_SPRITES=<0-40>";

const STAT_ADDRESS: u16 = 0xFF41;

/// What to run and how the LCD is set up before the first frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RunConfig {
    pub model: GameBoyModel,
    pub frames: u32,
    pub lyc: u8,
    /// STAT interrupt enable bits written before the run.
    pub stat: StatSelect,
    /// Sprites placed on lines 0-7.
    pub sprites: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: GameBoyModel::Dmg,
            frames: DEFAULT_FRAMES,
            lyc: 0,
            stat: StatSelect::empty(),
            sprites: 0,
        }
    }
}

impl RunConfig {
    /// Read the process arguments and `LCDBOY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Parse positional arguments `[model] [frames] [lyc]`, with `var` looking
    /// up environment overrides.
    pub fn from_args<A, S>(args: A, var: impl Fn(&str) -> Option<String>) -> Result<Self>
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = RunConfig::default();
        let mut args = args.into_iter();

        if let Some(model) = args.next() {
            config.model = parse_model(model.as_ref())?;
        }
        if let Some(frames) = args.next() {
            let frames = frames.as_ref();
            config.frames = frames
                .parse()
                .with_context(|| format!("invalid frame count '{frames}'"))?;
            if config.frames == 0 {
                bail!("frame count must be at least 1");
            }
        }
        if let Some(lyc) = args.next() {
            let lyc = lyc.as_ref();
            config.lyc = lyc
                .parse()
                .with_context(|| format!("invalid LYC '{lyc}', expected 0-255"))?;
        }
        if let Some(extra) = args.next() {
            bail!("unexpected argument '{}'\n{USAGE}", extra.as_ref());
        }

        if let Some(stat) = var("LCDBOY_STAT") {
            let digits = stat.trim_start_matches("0x").trim_start_matches("0X");
            let bits = u8::from_str_radix(digits, 16)
                .with_context(|| format!("LCDBOY_STAT '{stat}' is not a hex byte"))?;
            config.stat = StatSelect::from_bits(bits).with_context(|| {
                format!("LCDBOY_STAT {bits:#04X} sets bits outside 0x78")
            })?;
        }
        if let Some(sprites) = var("LCDBOY_SPRITES") {
            config.sprites = sprites
                .parse()
                .with_context(|| format!("invalid LCDBOY_SPRITES '{sprites}'"))?;
            if config.sprites > MAX_SPRITES {
                bail!("LCDBOY_SPRITES must be at most {MAX_SPRITES}");
            }
        }
        Ok(config)
    }
}

pub fn parse_model(name: &str) -> Result<GameBoyModel> {
    match name.to_ascii_lowercase().as_str() {
        "dmg" | "gb" => Ok(GameBoyModel::Dmg),
        "cgb" | "gbc" => Ok(GameBoyModel::Cgb),
        other => bail!("unknown model '{other}', expected dmg or cgb\n{USAGE}"),
    }
}

/// Interrupt sink that counts requests by kind.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct InterruptCounter {
    pub vblank: u32,
    pub lcd_stat: u32,
}

impl InterruptSink for InterruptCounter {
    fn request_interrupt(&mut self, kind: InterruptKind) {
        match kind {
            InterruptKind::VBlank => self.vblank += 1,
            InterruptKind::LcdStat => self.lcd_stat += 1,
        }
    }

    fn clear_interrupt(&mut self, _kind: InterruptKind) {}
}

/// Display sink that only logs power transitions.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoggingDisplay;

impl Display for LoggingDisplay {
    fn enable_lcd(&mut self) {
        log::info!("display on");
    }

    fn disable_lcd(&mut self) {
        log::info!("display off");
    }
}

/// Timing summary of one frame, measured from the first dot of line 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FrameReport {
    pub index: u32,
    pub ticks: u32,
    pub vblank_interrupts: u32,
    pub stat_interrupts: u32,
    pub line0_mode3_ticks: u32,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>3}: {} ticks, {} vblank, {} stat, line 0 mode 3 = {} ticks",
            self.index,
            self.ticks,
            self.vblank_interrupts,
            self.stat_interrupts,
            self.line0_mode3_ticks
        )
    }
}

type Runner = Gpu<LoggingDisplay, InterruptCounter, NoDma>;

pub fn run(config: &RunConfig) -> Result<Vec<FrameReport>> {
    let lcdc = LcdControl::LCD_AND_PPU_ENABLE
        | LcdControl::BG_AND_WINDOW_TILES
        | LcdControl::OBJ_ENABLE
        | LcdControl::BG_WINDOW_ENABLE_PRIORITY;
    let gpu_config = GpuConfig::builder()
        .model(config.model)
        .lcdc(lcdc.bits())
        .lyc(config.lyc)
        .build();
    let mut gpu = Gpu::new(gpu_config, LoggingDisplay, InterruptCounter::default(), NoDma);
    gpu.write(STAT_ADDRESS, config.stat.bits());
    place_sprites(&mut gpu, config.sprites);

    let skipped = loop_frame(&mut gpu, |_| {}).context("controller never reached line 0")?;
    log::debug!("skipped {skipped} ticks of the power-on frame");

    let mut reports = Vec::with_capacity(config.frames as usize);
    for index in 0..config.frames {
        reports.push(run_frame(&mut gpu, index)?);
    }
    Ok(reports)
}

/// Sprites at Y=16, spaced 16 pixels apart, covering lines 0-7.
fn place_sprites(gpu: &mut Runner, count: u8) {
    let oam = gpu.oam_mut();
    for i in 0..count as u16 {
        let base = oam.base() + i * 4;
        oam.write(base, 16);
        oam.write(base + 1, 8 + ((i * 16) % 160) as u8);
        oam.write(base + 2, i as u8);
        oam.write(base + 3, 0);
    }
}

fn run_frame(gpu: &mut Runner, index: u32) -> Result<FrameReport> {
    let start = *gpu.interrupts();
    let mut mode3 = 0;
    let ticks = loop_frame(gpu, |gpu| {
        if gpu.ly() == 0 && gpu.timing_state() == TimingState::LyxxM3 {
            mode3 += 1;
        }
    })
    .with_context(|| format!("frame {index} did not wrap around"))?;

    let end = *gpu.interrupts();
    Ok(FrameReport {
        index,
        ticks,
        vblank_interrupts: end.vblank - start.vblank,
        stat_interrupts: end.lcd_stat - start.lcd_stat,
        line0_mode3_ticks: mode3,
    })
}

/// Tick until the first OAM search of the next frame is entered, calling
/// `observe` after every dot. Returns the dots taken.
fn loop_frame(gpu: &mut Runner, mut observe: impl FnMut(&Runner)) -> Option<u32> {
    for n in 1..=2 * FRAME_TICKS {
        let before = gpu.timing_state();
        if let Some(mode) = gpu.tick() {
            log::trace!("LY={} mode {:?}", gpu.ly(), mode);
        }
        observe(gpu);
        if before != TimingState::Ly00M2 && gpu.timing_state() == TimingState::Ly00M2 {
            return Some(n);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<RunConfig> {
        RunConfig::from_args(args.iter().copied(), |key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn defaults_without_arguments() {
        let config = parse(&[], &[]).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.frames, DEFAULT_FRAMES);
    }

    #[test]
    fn positional_arguments() {
        let config = parse(&["CGB", "10", "144"], &[]).unwrap();
        assert_eq!(config.model, GameBoyModel::Cgb);
        assert_eq!(config.frames, 10);
        assert_eq!(config.lyc, 144);
    }

    #[test]
    fn bad_arguments_are_reported() {
        let err = parse(&["snes"], &[]).unwrap_err();
        assert!(err.to_string().contains("unknown model 'snes'"));

        let err = parse(&["dmg", "many"], &[]).unwrap_err();
        assert!(err.to_string().contains("invalid frame count 'many'"));

        assert!(parse(&["dmg", "0"], &[]).is_err());
        assert!(parse(&["dmg", "1", "300"], &[]).is_err());
        assert!(parse(&["dmg", "1", "2", "3"], &[]).is_err());
    }

    #[test]
    fn environment_overrides() {
        let config = parse(&[], &[("LCDBOY_STAT", "0x48"), ("LCDBOY_SPRITES", "10")]).unwrap();
        assert_eq!(config.stat, StatSelect::LYC | StatSelect::HBLANK);
        assert_eq!(config.sprites, 10);

        assert!(parse(&[], &[("LCDBOY_STAT", "0x01")]).is_err());
        assert!(parse(&[], &[("LCDBOY_STAT", "zz")]).is_err());
        assert!(parse(&[], &[("LCDBOY_SPRITES", "41")]).is_err());
    }

    #[test]
    fn plain_frames_report_base_timing() {
        let reports = run(&RunConfig {
            frames: 2,
            ..RunConfig::default()
        })
        .unwrap();
        assert_eq!(reports.len(), 2);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.index, i as u32);
            assert_eq!(report.ticks, FRAME_TICKS);
            assert_eq!(report.vblank_interrupts, 1);
            assert_eq!(report.stat_interrupts, 0);
            assert_eq!(report.line0_mode3_ticks, 169);
        }
    }

    #[test]
    fn sprites_lengthen_mode_3_only() {
        let reports = run(&RunConfig {
            frames: 1,
            sprites: 10,
            ..RunConfig::default()
        })
        .unwrap();
        // Ten sprites at X mod 8 == 0 stall 11 dots each.
        assert_eq!(reports[0].line0_mode3_ticks, 169 + 110);
        assert_eq!(reports[0].ticks, FRAME_TICKS);
    }

    #[test]
    fn stat_sources_are_counted() {
        let hblank = run(&RunConfig {
            frames: 1,
            lyc: 200,
            stat: StatSelect::HBLANK,
            ..RunConfig::default()
        })
        .unwrap();
        assert_eq!(hblank[0].stat_interrupts, 144);

        let lyc = run(&RunConfig {
            frames: 1,
            lyc: 0,
            stat: StatSelect::LYC,
            ..RunConfig::default()
        })
        .unwrap();
        assert_eq!(lyc[0].stat_interrupts, 1);
    }

    #[test]
    fn report_line_format() {
        let report = FrameReport {
            index: 1,
            ticks: FRAME_TICKS,
            vblank_interrupts: 1,
            stat_interrupts: 0,
            line0_mode3_ticks: 169,
        };
        assert_eq!(
            report.to_string(),
            "frame   1: 70224 ticks, 1 vblank, 0 stat, line 0 mode 3 = 169 ticks"
        );
    }
}
