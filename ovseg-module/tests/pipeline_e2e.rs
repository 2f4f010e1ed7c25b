//! 流水线落盘契约的端到端测试.
//!
//! 推理用桩替换: 一个把输入文件原样拷贝到约定输出路径的实现,
//! 以及一个总是失败的实现.

use std::fs;
use std::path::Path;

use ndarray::Array3;
use tempfile::TempDir;

use ovseg_module::infer::{prediction_path, InferError, InferResult, Inference};
use ovseg_module::pipeline::{self, RunError, RunOptions};
use ovseg_module::{CtVolume, NiftiGeometry, SegmentationNode};

/// 把输入文件原样拷贝到约定输出路径的推理桩.
struct CopyBackend;

impl Inference for CopyBackend {
    fn infer(&self, ct_path: &Path, _fast: bool) -> InferResult<()> {
        let pred = prediction_path(ct_path);
        fs::create_dir_all(pred.parent().unwrap())?;
        fs::copy(ct_path, &pred)?;
        Ok(())
    }
}

/// 总是异常退出的推理桩.
struct FailingBackend;

impl Inference for FailingBackend {
    fn infer(&self, _ct_path: &Path, _fast: bool) -> InferResult<()> {
        Err(InferError::Failed("injected inference failure".into()))
    }
}

/// 体素值为 {0, 1, 3, 9} 的合成 CT, 形状 [w, h, z] = (6, 5, 4).
fn synthetic_ct() -> CtVolume {
    let mut data = Array3::<f32>::zeros((6, 5, 4));
    data[(0, 0, 0)] = 1.0;
    data[(1, 2, 3)] = 1.0;
    data[(2, 2, 2)] = 3.0;
    data[(5, 4, 3)] = 9.0;
    CtVolume::fake(data, [0.8, 0.8, 2.0])
}

fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn init_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init();
}

fn dir_is_empty(p: &Path) -> bool {
    fs::read_dir(p).unwrap().next().is_none()
}

#[test]
fn test_export_roundtrip_preserves_voxels_and_geometry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip.nii.gz");

    let ct = synthetic_ct();
    ct.save(&path).unwrap();

    let back = CtVolume::open(&path).unwrap();
    assert_eq!(back.shape(), ct.shape());
    assert_eq!(back.data(), ct.data());

    let [z, h, w] = back.pix_dim();
    assert!(float_eq(z, 2.0));
    assert!(float_eq(h, 0.8));
    assert!(float_eq(w, 0.8));
}

#[test]
fn test_pipeline_with_copy_stub() {
    init_logger();
    let temp_root = TempDir::new().unwrap();
    let opts = RunOptions {
        fast: true,
        temp_root: temp_root.path().to_owned(),
    };

    let ct = synthetic_ct();
    let mut seg = SegmentationNode::with_default_name();
    pipeline::run(&ct, &mut seg, &CopyBackend, &opts).unwrap();

    // 标签 {1, 3, 9}: 两个命中重命名表, Label_3 保持原名.
    let names: Vec<&str> = seg.segments().map(|s| s.name()).collect();
    assert_eq!(names, ["Omentum", "Label_3", "Main disease"]);
    assert!(seg.segments().all(|s| s.has_surface()));

    // 运行的独占临时目录不得残留.
    assert!(dir_is_empty(temp_root.path()));
}

#[test]
fn test_pipeline_failure_cleans_temp_and_leaves_container_untouched() {
    init_logger();
    let temp_root = TempDir::new().unwrap();
    let opts = RunOptions {
        fast: true,
        temp_root: temp_root.path().to_owned(),
    };

    let ct = synthetic_ct();
    let mut seg = SegmentationNode::with_default_name();
    let err = pipeline::run(&ct, &mut seg, &FailingBackend, &opts).unwrap_err();

    assert!(matches!(err, RunError::Infer(InferError::Failed(_))));
    assert!(seg.is_empty());
    assert!(dir_is_empty(temp_root.path()));
}

#[test]
fn test_pipeline_missing_prediction_file() {
    // 推理 "成功" 但没有按约定写输出文件: 错误上抛, 临时目录仍被清理.
    struct SilentBackend;
    impl Inference for SilentBackend {
        fn infer(&self, _ct_path: &Path, _fast: bool) -> InferResult<()> {
            Ok(())
        }
    }

    let temp_root = TempDir::new().unwrap();
    let opts = RunOptions {
        fast: false,
        temp_root: temp_root.path().to_owned(),
    };

    let ct = synthetic_ct();
    let mut seg = SegmentationNode::with_default_name();
    let err = pipeline::run(&ct, &mut seg, &SilentBackend, &opts).unwrap_err();

    assert!(matches!(err, RunError::Nifti(_)));
    assert!(seg.is_empty());
    assert!(dir_is_empty(temp_root.path()));
}
