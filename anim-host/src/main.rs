//! # animctl
//!
//! 窗口动画的无头模拟与设置文件工具。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p anim-host -- simulate --effect bounce --event open
//! cargo run -p anim-host -- simulate --effect magiclamp --event minimize --frames 20 --frame-ms 16
//! cargo run -p anim-host -- simulate --effect wobbly --event move --verbose
//! cargo run -p anim-host -- defaults --output settings.json
//! cargo run -p anim-host -- check settings.json
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anim_host::{
    AnimationSettings, EffectKind, GrabOp, Orchestrator, SettingsStore, WindowId,
    WindowManagerCompletion, WindowManagerEvents,
};
use anim_runtime::{
    AnimBox, EffectEvent, EffectTarget, EventDetail, PaintState, SimpleActor, SimpleWindow,
    Vector, WindowFrame,
};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info};

/// 未指定帧数时的最大模拟帧数
const MAX_FRAMES: u32 = 100_000;

/// 未指定帧数时 move 事件的拖动帧数
const DRAG_FRAMES: u32 = 30;

/// 模拟窗口
const WINDOW: WindowId = 1;

#[derive(Parser)]
#[command(name = "animctl")]
#[command(about = "窗口动画工具 - 无头模拟效果并检查设置文件")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 对内存中的窗口模拟一次动画
    Simulate {
        /// 效果名称（zoom / bounce / glide / magiclamp / wobbly）
        #[arg(long)]
        effect: String,

        /// 事件名称（open / close / minimize / unminimize / move）
        #[arg(long)]
        event: String,

        /// 模拟帧数（默认：播放到结束）
        #[arg(long)]
        frames: Option<u32>,

        /// 每帧时长（默认：16）
        #[arg(long, default_value = "16")]
        frame_ms: i64,

        /// 设置文件
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 输出默认设置
    Defaults {
        /// 写入文件（默认：打印到标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 检查设置文件
    Check {
        /// 设置文件路径
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match cli.command {
        Commands::Simulate {
            effect,
            event,
            frames,
            frame_ms,
            config,
        } => simulate(&effect, &event, frames, frame_ms, config),
        Commands::Defaults { output } => write_defaults(output),
        Commands::Check { path } => check(path),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// 打印完成通知
struct PrintingSink {
    finished: Cell<bool>,
}

impl PrintingSink {
    fn report(&self, what: &str, window: WindowId) {
        println!("✅ {} (window {})", what, window);
        self.finished.set(true);
    }
}

impl WindowManagerCompletion for PrintingSink {
    fn completed_map(&self, window: WindowId) {
        self.report("completed_map", window);
    }

    fn completed_destroy(&self, window: WindowId) {
        self.report("completed_destroy", window);
    }

    fn completed_minimize(&self, window: WindowId) {
        self.report("completed_minimize", window);
    }

    fn completed_unminimize(&self, window: WindowId) {
        self.report("completed_unminimize", window);
    }
}

fn simulate(
    effect: &str,
    event: &str,
    frames: Option<u32>,
    frame_ms: i64,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    if frame_ms <= 0 {
        bail!("每帧时长必须为正数: {}", frame_ms);
    }
    let kind: EffectKind = effect.parse()?;
    let event: EffectEvent = event.parse()?;
    if !kind.supports(event) {
        bail!("效果 '{}' 不支持事件 '{}'", kind, event);
    }

    let settings = match config {
        Some(path) => AnimationSettings::load(path),
        None => AnimationSettings::default(),
    };
    let settings = Rc::new(SettingsStore::new(settings));
    settings.set_effect_name(event, kind.name());

    // 1920×1080 舞台上带 10px 阴影的 640×480 窗口
    let stage = Rc::new(SimpleActor::new(Vector::ZERO, Vector::new(1920.0, 1080.0)));
    let actor = Rc::new(SimpleActor::new(
        Vector::new(190.0, 140.0),
        Vector::new(660.0, 500.0),
    ));
    let frame = Rc::new(SimpleWindow::new(AnimBox::from_coords(
        200.0, 150.0, 840.0, 630.0,
    )));
    let target = EffectTarget::new(actor.clone())
        .with_window(frame.clone())
        .with_stage(stage);

    let sink = Rc::new(PrintingSink {
        finished: Cell::new(false),
    });
    let events = WindowManagerEvents::new();
    let orchestrator = Orchestrator::new(settings, sink.clone());
    orchestrator.attach(&events);
    orchestrator.manage(WINDOW, target);

    let pointer = Vector::new(400.0, 300.0);
    let detail = EventDetail::default()
        .with_pointer(pointer)
        .with_icon(AnimBox::from_coords(100.0, 1040.0, 148.0, 1080.0));

    info!(effect = kind.name(), event = %event, "开始模拟");

    let handled = if event == EffectEvent::Move {
        orchestrator.grab_begin(WINDOW, GrabOp::Moving, pointer)?
    } else {
        orchestrator.dispatch(WINDOW, event, &detail)?
    };
    if !handled {
        println!("事件未产生动画");
        return Ok(());
    }

    let limit = frames.unwrap_or(MAX_FRAMES);
    let release_at = frames.map_or(DRAG_FRAMES, |n| n / 2);
    let mut released = event != EffectEvent::Move;

    for index in 1..=limit {
        if !released {
            if index > release_at {
                orchestrator.grab_end(WINDOW, GrabOp::Moving, pointer)?;
                released = true;
            } else {
                let delta = Vector::new(6.0, 3.0);
                actor.move_by(delta);
                let moved = frame.frame_rect().translate(delta);
                frame.set_frame_rect(moved);
            }
        }

        orchestrator.tick(frame_ms);
        print_frame(&orchestrator, index)?;

        if released && !orchestrator.is_animating() {
            break;
        }
    }

    if !sink.finished.get() && orchestrator.is_animating() {
        println!("⏸ 模拟在动画结束前停止");
    }
    orchestrator.detach();
    Ok(())
}

fn print_frame(orchestrator: &Orchestrator, index: u32) -> anyhow::Result<()> {
    let states = orchestrator.paint_states(WINDOW).unwrap_or_default();
    if states.is_empty() {
        println!("[{:>4}] idle", index);
        return Ok(());
    }

    for (kind, state) in states {
        let kind = kind.name();
        match state {
            PaintState::Identity => println!("[{:>4}] {:<9} identity", index, kind),
            PaintState::Affine { matrix, opacity } => {
                let translation = matrix.w_axis;
                println!(
                    "[{:>4}] {:<9} progress {:.3}  scale ({:.3}, {:.3})  translate ({:.1}, {:.1}, {:.1})",
                    index,
                    kind,
                    opacity as f64 / 255.0,
                    matrix.x_axis.x,
                    matrix.y_axis.y,
                    translation.x,
                    translation.y,
                    translation.z,
                );
            }
            PaintState::Mesh(mesh) => {
                let corner = |c, r| {
                    mesh.vertex(c, r)
                        .with_context(|| format!("网格缺少顶点 ({}, {})", c, r))
                };
                let tl = corner(0, 0)?;
                let br = corner(mesh.columns - 1, mesh.rows - 1)?;
                println!(
                    "[{:>4}] {:<9} mesh {}x{}  ({:.1}, {:.1}) - ({:.1}, {:.1})",
                    index, kind, mesh.columns, mesh.rows, tl.x, tl.y, br.x, br.y,
                );
            }
        }
    }
    Ok(())
}

fn write_defaults(output: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = AnimationSettings::default();
    match output {
        Some(path) => {
            settings
                .save(&path)
                .with_context(|| format!("无法写入 {:?}", path))?;
            println!("✅ 默认设置已写入 {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&settings)?),
    }
    Ok(())
}

fn check(path: PathBuf) -> anyhow::Result<()> {
    let settings = AnimationSettings::try_load(&path)
        .with_context(|| format!("设置文件 {:?} 无效", path))?;

    println!("✅ 设置文件有效: {:?}", path);
    for event in EffectEvent::ALL {
        let name = settings.effect_name(event);
        println!("   {:<10} → {}", event.as_str(), name);
    }
    Ok(())
}
