//! 脱离 GUI 宿主的命令行运行器.
//!
//! 用法: `headless <CT.nii.gz 路径> [fast|full]`
//!
//! 对给定 CT 文件运行与插件完全相同的分割流水线 (生产推理后端),
//! 结束后在标准输出列出得到的 segment.

use std::process::ExitCode;

use ovseg_module::prelude::*;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("Logger init error");

    let mut args = std::env::args().skip(1);
    let Some(ct_path) = args.next() else {
        eprintln!("usage: headless <CT.nii.gz> [fast|full]");
        return ExitCode::FAILURE;
    };
    let fast = match args.next().as_deref() {
        None | Some("fast") => true,
        Some("full") => false,
        Some(other) => {
            eprintln!("unknown mode `{other}`, expected `fast` or `full`");
            return ExitCode::FAILURE;
        }
    };

    let info = ModuleInfo::ovseg();
    println!("{} ({})", info.title, info.category);

    let ct = match CtVolume::open(&ct_path) {
        Ok(ct) => ct,
        Err(e) => {
            eprintln!("cannot open `{ct_path}`: {e}");
            return ExitCode::FAILURE;
        }
    };
    let (z, h, w) = ct.shape();
    log::info!("loaded CT `{ct_path}`, shape [z, H, W] = [{z}, {h}, {w}]");

    let mut seg = SegmentationNode::with_default_name();
    let opts = RunOptions {
        fast,
        ..RunOptions::default()
    };

    if let Err(e) = pipeline::run(&ct, &mut seg, &PyInference::new(), &opts) {
        eprintln!("segmentation failed: {e}");
        return ExitCode::FAILURE;
    }

    println!("segmentation `{}`:", seg.name());
    for s in seg.segments() {
        println!("  label {:>3}  {}", s.value(), s.name());
    }
    ExitCode::SUCCESS
}
