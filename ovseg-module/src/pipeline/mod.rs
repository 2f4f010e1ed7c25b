//! 分割流水线: 导出 -> 推理 -> 导入 -> 重命名.
//!
//! 整条流水线严格串行, 无后台执行, 无进度上报, 无取消;
//! 推理步骤会阻塞调用方, 可能长达数分钟.

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::consts::CT_BASENAME;
use crate::infer::{prediction_path, InferError, Inference};
use crate::segment::rename;
use crate::{CtVolume, LabelMap, SegmentationNode};

/// 流水线运行时错误.
#[derive(Debug)]
pub enum RunError {
    /// 表单选择不完整 (输入 CT 或输出容器为空).
    SelectionMissing,

    /// 临时目录创建 / 删除等底层 I/O 错误.
    Io(std::io::Error),

    /// nii 文件读写错误.
    Nifti(nifti::NiftiError),

    /// 外部推理调用错误.
    Infer(InferError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectionMissing => write!(f, "both an input CT and an output segmentation must be selected"),
            Self::Io(e) => write!(f, "temporary directory error: {e}"),
            Self::Nifti(e) => write!(f, "nifti i/o error: {e}"),
            Self::Infer(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<nifti::NiftiError> for RunError {
    fn from(e: nifti::NiftiError) -> Self {
        Self::Nifti(e)
    }
}

impl From<InferError> for RunError {
    fn from(e: InferError) -> Self {
        Self::Infer(e)
    }
}

/// 流水线运行结果.
pub type RunResult<T> = Result<T, RunError>;

/// 流水线运行选项.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 是否请求更快但质量更低的推理变体. 缺省为 `true`.
    pub fast: bool,

    /// 独占临时目录的父目录. 缺省为系统临时目录.
    pub temp_root: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fast: true,
            temp_root: env::temp_dir(),
        }
    }
}

/// 对 `ct` 运行一次完整分割, 结果追加进 `seg`.
///
/// 步骤: 把 CT 以 `f32` 写入独占临时目录下的 `CT.nii.gz`; 以该路径
/// 调用 `infer`; 从约定路径读回预测 label map; 每个非零标签值生成
/// 一个 segment 并请求表面表示; 最后按固定映射表重命名.
///
/// # 注意
///
/// 1. 无论成功失败, 临时目录在返回前都会被删除.
/// 2. 任何错误返回时 `seg` 都未被修改: 容器变更只发生在预测读取成功之后.
pub fn run<I>(
    ct: &CtVolume,
    seg: &mut SegmentationNode,
    infer: &I,
    opts: &RunOptions,
) -> RunResult<()>
where
    I: Inference + ?Sized,
{
    // 独占临时目录. 错误路径上由 Drop 删除.
    let tmp = tempfile::Builder::new()
        .prefix("ovseg-")
        .tempdir_in(&opts.temp_root)?;

    let label = run_in(ct, infer, opts.fast, &tmp)?;

    // 成功路径上显式删除, 以便上抛删除错误.
    tmp.close()?;

    let added = seg.import_label_map(&label);
    seg.create_closed_surface_representation();
    let renamed = rename::apply(seg);
    log::info!("imported {added} segment(s), renamed {renamed}");
    Ok(())
}

/// 临时目录内的导出 / 推理 / 读回部分.
fn run_in<I>(ct: &CtVolume, infer: &I, fast: bool, tmp: &TempDir) -> RunResult<LabelMap>
where
    I: Inference + ?Sized,
{
    let ct_path = tmp.path().join(CT_BASENAME);
    log::info!("exporting CT volume to {}", ct_path.display());
    ct.save(&ct_path)?;

    log::info!("running ovseg inference (fast = {fast}), this can take minutes");
    infer.infer(&ct_path, fast)?;

    let pred = prediction_path(&ct_path);
    log::info!("importing prediction from {}", pred.display());
    Ok(LabelMap::open(&pred)?)
}
