//! 模块自述信息.

/// 宿主插件面板展示用的模块元信息.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    /// 模块标题.
    pub title: &'static str,

    /// 所属分类.
    pub category: &'static str,

    /// 贡献者列表, 格式为 "姓名 (单位)".
    pub contributors: &'static [&'static str],

    /// 帮助文本.
    pub help_text: &'static str,
}

impl ModuleInfo {
    /// 卵巢癌 CT 分割模块的元信息.
    pub const fn ovseg() -> Self {
        Self {
            title: "Ovarian cancer CT Segmentation",
            category: "Segmentation",
            contributors: &[
                "Paolo Zaffino (Magna Graecia University of Catanzaro, Italy)",
                "Thomas Buddenkotte (University Medical Center Hamburg-Eppendorf, Germany)",
            ],
            help_text: "This module segments ovarian cancer tissues in CT images. \
                        The ovseg library is described at \
                        https://github.com/ThomasBudd/ovseg/tree/main.",
        }
    }
}

impl Default for ModuleInfo {
    fn default() -> Self {
        Self::ovseg()
    }
}
