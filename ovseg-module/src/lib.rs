#![warn(missing_docs)]

//! 卵巢癌 CT 分割模块核心库.
//!
//! 该 crate 是宿主可视化程序 (医学影像查看器) 中分割插件的编排层:
//! 模型推理本身由外部 `ovseg` 包完成, 这里只负责把宿主内存中的 CT
//! 体数据落盘为 nii 文件, 以黑盒方式调用推理, 再把预测结果读回并转换为
//! 多 segment 的分割对象.
//!
//! # 流水线
//!
//! 1. 表单 (两个选择器 + 一个触发按钮) 收集输入 CT 与输出分割容器,
//!    两者都非空时才允许运行. 实现位于 `src/form.rs`.
//! 2. 导出: CT 体素以 `f32` 写入独占临时目录下的 `CT.nii.gz`.
//!    实现位于 `src/data`.
//! 3. 推理: 以 `(文件路径, fast)` 调用外部 ovseg 推理例程,
//!    约定其结果写到 `ovseg_predictions_pod_om` 子目录.
//!    该例程完全不透明, 可能耗时数分钟. 实现位于 `src/infer`.
//! 4. 导入: 读取预测 label map, 每个非零标签值生成一个 segment,
//!    并请求表面表示. 实现位于 `src/segment`.
//! 5. 重命名: 按固定两条目映射表把 `Label_1`/`Label_9` 改名为
//!    `Omentum`/`Main disease`. 实现位于 `src/segment/rename.rs`.
//!
//! # 注意
//!
//! 1. 临时目录是 scoped 资源, 无论运行成功或失败都会被删除.
//! 2. 整条流水线严格串行, 调用方会被阻塞直到推理结束.
//! 3. 推理包缺失时会从固定归档地址安装一次并重试, 不做进一步回退.

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// nii 3D 体数据基础结构.
mod data;

pub use data::{CtVolume, LabelMap, NiftiGeometry};

pub mod consts;

pub mod infer;

pub mod segment;

pub use segment::{Segment, SegmentationNode};

pub mod pipeline;

mod form;

pub use form::OvsegForm;

mod module;

pub use module::ModuleInfo;

pub mod prelude;
