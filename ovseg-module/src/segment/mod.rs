//! 分割容器与 segment 操作.
//!
//! `SegmentationNode` 是宿主侧 "输出分割对象" 的内存建模:
//! 一个有序 segment 列表, 每个 segment 对应预测 label map
//! 中的一个非零标签值.

pub mod rename;

use crate::consts::SEGMENT_NAME_PREFIX;
use crate::LabelMap;

/// 分割容器中的单个 segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    value: u8,
    name: String,
    surface: bool,
}

impl Segment {
    /// 该 segment 对应的 label map 标签值.
    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// segment 名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 重设 segment 名称.
    #[inline]
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// 是否已请求可渲染的闭合表面表示.
    #[inline]
    pub fn has_surface(&self) -> bool {
        self.surface
    }
}

/// 多 segment 分割容器.
///
/// 由用户在宿主中选择或新建, 导入与重命名步骤会就地修改它.
#[derive(Debug, Clone, Default)]
pub struct SegmentationNode {
    name: String,
    segments: Vec<Segment>,
}

impl SegmentationNode {
    /// 创建名为 `name` 的空分割容器.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// 以默认名称 (宿主选择器自动新建时的 baseName) 创建空分割容器.
    #[inline]
    pub fn with_default_name() -> Self {
        Self::new(crate::consts::DEFAULT_SEGMENTATION_NAME)
    }

    /// 容器名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 容器内 segment 个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// 容器是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 获取第 `index` 个 segment. 越界时返回 `None`.
    #[inline]
    pub fn nth_segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// 获取第 `index` 个 segment 的可变引用. 越界时返回 `None`.
    #[inline]
    pub fn nth_segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    /// 按序迭代所有 segment.
    #[inline]
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Segment> {
        self.segments.iter()
    }

    /// 将 label map 导入为 segment.
    ///
    /// 每个非零标签值追加一个 segment, 按标签值升序排列, 名称为
    /// `Label_<value>` (宿主自动生成名的约定). 背景 (0) 不产生 segment.
    ///
    /// 返回追加的 segment 个数.
    pub fn import_label_map(&mut self, label: &LabelMap) -> usize {
        let values = label.distinct_labels();
        let added = values.len();
        for value in values {
            self.segments.push(Segment {
                value,
                name: format!("{SEGMENT_NAME_PREFIX}{value}"),
                surface: false,
            });
        }
        added
    }

    /// 为容器内每个 segment 请求闭合表面表示.
    pub fn create_closed_surface_representation(&mut self) {
        for seg in &mut self.segments {
            seg.surface = true;
        }
    }
}
