//! 表单 view-model.
//!
//! 宿主 GUI 中该表单由两个节点选择器和一个 Apply 按钮组成.
//! 这里只保留其数据语义: 两个可空引用和一个派生的 "可运行" 布尔量,
//! 不含任何控件逻辑.

use crate::infer::Inference;
use crate::pipeline::{self, RunError, RunOptions, RunResult};
use crate::{CtVolume, SegmentationNode};

/// 分割表单: 输入 CT 选择器 + 输出分割容器选择器.
#[derive(Debug, Default)]
pub struct OvsegForm {
    /// 被选中的输入 CT. 对应 scalar volume 选择器.
    pub input: Option<CtVolume>,

    /// 被选中 (或新建) 的输出分割容器.
    pub output: Option<SegmentationNode>,
}

impl OvsegForm {
    /// 创建两个选择器均为空的表单.
    pub fn new() -> Self {
        Self::default()
    }

    /// 两个选择器都非空时才允许运行. Apply 按钮的使能条件.
    #[inline]
    pub fn can_run(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }

    /// Apply 动作: 对当前选择运行分割流水线.
    ///
    /// 任一选择器为空时返回 [`RunError::SelectionMissing`],
    /// 不做任何其他修改.
    pub fn run<I>(&mut self, infer: &I, opts: &RunOptions) -> RunResult<()>
    where
        I: Inference + ?Sized,
    {
        let (Some(ct), Some(seg)) = (self.input.as_ref(), self.output.as_mut()) else {
            return Err(RunError::SelectionMissing);
        };
        pipeline::run(ct, seg, infer, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn some_ct() -> CtVolume {
        CtVolume::fake(Array3::<f32>::zeros((2, 2, 2)), [1.0, 1.0, 1.0])
    }

    /// (空, 空), (有, 空), (空, 有), (有, 有) 四种组合下的使能状态.
    #[test]
    fn test_can_run_truth_table() {
        let mut form = OvsegForm::new();
        assert!(!form.can_run());

        form.input = Some(some_ct());
        assert!(!form.can_run());

        form.input = None;
        form.output = Some(SegmentationNode::with_default_name());
        assert!(!form.can_run());

        form.input = Some(some_ct());
        assert!(form.can_run());
    }

    #[test]
    fn test_run_rejects_missing_selection() {
        struct NeverCalled;
        impl Inference for NeverCalled {
            fn infer(&self, _: &std::path::Path, _: bool) -> crate::infer::InferResult<()> {
                panic!("inference must not run without a complete selection");
            }
        }

        let mut form = OvsegForm::new();
        form.input = Some(some_ct());
        let err = form.run(&NeverCalled, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, RunError::SelectionMissing));
    }
}
