//! 外部推理例程的调用边界.
//!
//! 推理本体 (网络结构, 权重, 运行时) 完全不透明, 交互只靠文件路径
//! 约定: 给它一个 CT 文件路径, 它阻塞运行后把预测写到同目录下的
//! [`PREDICTION_SUBDIR`](crate::consts::PREDICTION_SUBDIR) 子目录中,
//! 文件名与输入相同. 这里把该能力建模为可注入的 [`Inference`]
//! strategy, 以便测试时用桩替换.

mod python;

pub use python::{ov_data_base_from_env_or_home, PyInference};

use std::path::{Path, PathBuf};

/// 推理调用错误.
#[derive(Debug)]
pub enum InferError {
    /// 外部 ovseg 包缺失 (安装重试后仍不可用时对外可见).
    PackageMissing,

    /// 安装 ovseg 包失败. 附带安装器输出.
    InstallFailed(String),

    /// 推理例程异常退出. 附带其标准错误输出.
    Failed(String),

    /// 启动外部进程时的底层 I/O 错误.
    Io(std::io::Error),
}

impl std::fmt::Display for InferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PackageMissing => write!(f, "ovseg package is not importable"),
            Self::InstallFailed(out) => write!(f, "ovseg installation failed: {out}"),
            Self::Failed(stderr) => write!(f, "ovseg inference failed: {stderr}"),
            Self::Io(e) => write!(f, "failed to spawn inference process: {e}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// 推理调用结果.
pub type InferResult<T> = Result<T, InferError>;

/// 黑盒推理能力: `(CT 文件路径, fast) -> 约定路径下的预测文件`.
///
/// 实现方必须保证: (a) 同步阻塞直到推理完成; (b) 成功返回后,
/// [`prediction_path`] 给出的文件已存在.
pub trait Inference {
    /// 对 `ct_path` 指向的 CT 文件运行推理.
    /// `fast` 请求更快但质量更低的推理变体.
    fn infer(&self, ct_path: &Path, fast: bool) -> InferResult<()>;
}

/// 推理例程输出文件的约定路径:
/// `<ct_path 所在目录>/ovseg_predictions_pod_om/<ct_path 文件名>`.
pub fn prediction_path(ct_path: &Path) -> PathBuf {
    let mut ans = ct_path.parent().unwrap_or(Path::new("")).to_owned();
    ans.push(crate::consts::PREDICTION_SUBDIR);
    if let Some(name) = ct_path.file_name() {
        ans.push(name);
    }
    ans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_path_convention() {
        let p = prediction_path(Path::new("/tmp/run0/CT.nii.gz"));
        assert_eq!(
            p,
            Path::new("/tmp/run0/ovseg_predictions_pod_om/CT.nii.gz")
        );
    }

    #[test]
    fn test_prediction_path_relative() {
        let p = prediction_path(Path::new("CT.nii.gz"));
        assert_eq!(p, Path::new("ovseg_predictions_pod_om/CT.nii.gz"));
    }
}
