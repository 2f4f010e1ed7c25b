//! 通用常量.

/// ovseg pod_om 模型的标签约定.
pub mod labels {
    /// 背景体素值.
    pub const BACKGROUND: u8 = 0;

    /// 大网膜 (omentum) 病灶的体素值.
    pub const OMENTUM: u8 = 1;

    /// 主要病灶 (main disease) 的体素值.
    pub const MAIN_DISEASE: u8 = 9;

    /// 体素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// 体素是否是大网膜病灶?
    #[inline]
    pub const fn is_omentum(p: u8) -> bool {
        matches!(p, OMENTUM)
    }

    /// 体素是否是主要病灶?
    #[inline]
    pub const fn is_main_disease(p: u8) -> bool {
        matches!(p, MAIN_DISEASE)
    }
}

/// 导出 CT 的固定文件名. 推理例程按同名文件输出预测.
pub const CT_BASENAME: &str = "CT.nii.gz";

/// 推理例程在输入文件旁写预测结果的约定子目录名.
pub const PREDICTION_SUBDIR: &str = "ovseg_predictions_pod_om";

/// 外部 ovseg 包缺失时的安装源 (公开仓库 main 分支归档).
pub const OVSEG_ARCHIVE_URL: &str =
    "https://github.com/ThomasBudd/ovseg/archive/refs/heads/main.zip";

/// 输出分割容器的默认名称 (对应宿主选择器的 baseName).
pub const DEFAULT_SEGMENTATION_NAME: &str = "Ovarian cancer segmentation";

/// 宿主自动生成的 segment 名称前缀, 如 `Label_1`.
pub const SEGMENT_NAME_PREFIX: &str = "Label_";
