//! segment 重命名表.
//!
//! pod_om 模型只约定两个有临床含义的标签, 因此这里是一张固定的
//! 两条目映射表, 而不是通用映射机制. 扩展标签词汇表时直接扩展
//! 该表即可.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::SegmentationNode;

/// 自动生成名 -> 临床名. 不在表中的 segment 保持原名.
pub static RENAME_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("Label_1", "Omentum"), ("Label_9", "Main disease")])
});

/// 按索引扫描容器内所有 segment, 命中 [`RENAME_TABLE`] 的改为临床名.
///
/// 返回实际改名的 segment 个数. segment 的顺序和个数不变.
pub fn apply(seg: &mut SegmentationNode) -> usize {
    let mut renamed = 0usize;
    for i in 0..seg.len() {
        // 索引来自 `0..len`, 不会越界.
        let segment = seg.nth_segment_mut(i).unwrap();
        if let Some(&clinical) = RENAME_TABLE.get(segment.name()) {
            log::info!("renaming segment `{}` -> `{clinical}`", segment.name());
            segment.set_name(clinical);
            renamed += 1;
        }
    }
    renamed
}
