//! 基于 Python 子进程的生产推理后端.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::consts::OVSEG_ARCHIVE_URL;

use super::{InferError, InferResult, Inference};

/// 在子进程中执行的入口片段. 参数依次为 CT 文件路径与 fast 标志.
const RUN_SNIPPET: &str = "\
import sys
from ovseg.run.run_inference import run_inference
run_inference(sys.argv[1], fast=(sys.argv[2] == 'fast'))
";

/// 获取 ovseg 模型权重根目录.
///
/// 1. 若环境变量 `$OV_DATA_BASE` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/ovseg_data`.
pub fn ov_data_base_from_env_or_home() -> PathBuf {
    if let Ok(d) = env::var("OV_DATA_BASE") {
        PathBuf::from(d)
    } else {
        let mut ans = dirs::home_dir().unwrap_or_else(env::temp_dir);
        ans.push("ovseg_data");
        ans
    }
}

/// 通过 Python 解释器调用外部 ovseg 包的推理 strategy.
///
/// 首次调用时目标机器上可能尚未安装 ovseg: 此时会从固定归档地址
/// 用 pip 安装一次并重试, 不做进一步回退 (安装可能耗时很久).
#[derive(Debug, Clone)]
pub struct PyInference {
    python: PathBuf,
    data_base: PathBuf,
}

impl Default for PyInference {
    fn default() -> Self {
        Self::new()
    }
}

impl PyInference {
    /// 以默认解释器与权重目录构建.
    ///
    /// 解释器取 `$OVSEG_PYTHON`, 缺省为 `python3`;
    /// 权重根目录由 [`ov_data_base_from_env_or_home`] 决定.
    pub fn new() -> Self {
        let python = env::var("OVSEG_PYTHON").unwrap_or_else(|_| "python3".into());
        Self {
            python: PathBuf::from(python),
            data_base: ov_data_base_from_env_or_home(),
        }
    }

    /// 指定解释器路径与权重根目录构建.
    pub fn with_paths<P: Into<PathBuf>, Q: Into<PathBuf>>(python: P, data_base: Q) -> Self {
        Self {
            python: python.into(),
            data_base: data_base.into(),
        }
    }

    /// 实际跑一次推理子进程, 不含安装重试.
    fn try_run(&self, ct_path: &Path, fast: bool) -> InferResult<()> {
        std::fs::create_dir_all(&self.data_base)?;
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(RUN_SNIPPET)
            .arg(ct_path)
            .arg(if fast { "fast" } else { "full" })
            .env("OV_DATA_BASE", &self.data_base)
            .output()?;
        Self::interpret(output)
    }

    /// 从固定归档地址安装 ovseg 包.
    fn install(&self) -> InferResult<()> {
        log::warn!(
            "ovseg package not found, installing from {OVSEG_ARCHIVE_URL} (this can take a while)"
        );
        let output = Command::new(&self.python)
            .args(["-m", "pip", "install", OVSEG_ARCHIVE_URL])
            .output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(InferError::InstallFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }

    /// 把子进程退出状态翻译为 [`InferResult`].
    ///
    /// `ModuleNotFoundError` 被识别为包缺失, 其余异常原样上抛.
    fn interpret(output: Output) -> InferResult<()> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if stderr.contains("ModuleNotFoundError") {
            Err(InferError::PackageMissing)
        } else {
            Err(InferError::Failed(stderr))
        }
    }
}

impl Inference for PyInference {
    fn infer(&self, ct_path: &Path, fast: bool) -> InferResult<()> {
        match self.try_run(ct_path, fast) {
            Err(InferError::PackageMissing) => {
                self.install()?;
                self.try_run(ct_path, fast)
            }
            other => other,
        }
    }
}
