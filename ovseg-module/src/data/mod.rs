//! nii 格式 3D 体数据: CT 扫描与 label map.
//!
//! 数据在内存中统一按照 `[z, H, W]` 组织, 读写时与 nifti 的
//! `[W, H, z]` 惯用布局互相转换. 空间元信息 (体素分辨率,
//! 方向四元数等) 原样保留在 header 中, 导出时随数据一起写回,
//! 因此整个 "导出 -> 推理 -> 导入" 往返不会破坏几何信息.

use std::path::Path;

use itertools::Itertools;
use ndarray::{Array3, ArrayView, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::Idx3d;

/// `NiftiHeader` 是栈上大对象, 移动该对象的开销很可观.
/// 因此我们将其分配到堆上.
type BoxedHeader = Box<NiftiHeader>;

/// 将 (W, H, z) 转换成 (z, H, W). 以后均按照该模式访问.
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    // [W, H, z]. 体素个数数组.
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

/// 根据 `[w, h, z]` 形状与体素分辨率构造合成 header.
fn fake_header((w, h, z): Idx3d, pix_dim: [f32; 3]) -> BoxedHeader {
    let mut header = Box::<NiftiHeader>::default();
    header.dim = [3, w as u16, h as u16, z as u16, 1, 1, 1, 1];
    let [pw, ph, pz] = &pix_dim;
    let [_, hw, hh, hz, ..] = &mut header.pixdim;
    (*hw, *hh, *hz) = (*pw, *ph, *pz);
    header.intent_name[..4].copy_from_slice(b"fake");
    header
}

/// 3D nii 文件 header 的共用属性.
pub trait NiftiGeometry {
    /// 获取 header 部分.
    fn header(&self) -> &NiftiHeader;

    /// 获取数据形状大小, 按 `(z, H, W)` 组织.
    #[inline]
    fn shape(&self) -> Idx3d {
        get_shape_from_header(self.header())
    }

    /// 获取水平切片个数.
    #[inline]
    fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 获取单个体素分辨率, 以毫米为单位, 分别代表空间 (相邻切片方向),
    /// 高, 宽.
    #[inline]
    fn pix_dim(&self) -> [f64; 3] {
        let [_, w, h, z, ..] = self.header().pixdim;
        [z as f64, h as f64, w as f64]
    }

    /// 该结构是否是由 `fake` 方法手动拼接的.
    #[inline]
    fn is_faked(&self) -> bool {
        self.header().intent_name.starts_with(b"fake")
    }
}

/// nii 格式 3D CT 扫描, 包括 header 和 CT 扫描 (HU). HU 值以 `f32` 保存.
///
/// 即宿主场景中被选为输入的 scalar volume. 对本模块而言只读.
#[derive(Debug, Clone)]
pub struct CtVolume {
    header: BoxedHeader,
    data: Array3<f32>,
}

impl NiftiGeometry for CtVolume {
    #[inline]
    fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

impl CtVolume {
    /// 打开 nii 文件格式的 3D CT 扫描. `path` 为 nii 文件的本地路径.
    /// 体素值在读取时统一转换为 `f32`.
    pub fn open<P: AsRef<Path>>(path: P) -> nifti::Result<Self> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = Box::new(obj.header().clone());

        // [W, H, z] -> [z, H, W].
        let data = obj
            .into_volume()
            .into_ndarray::<f32>()?
            .permuted_axes([2, 1, 0].as_slice());

        // The nature of nifti data field layout.
        debug_assert!(data.is_standard_layout());

        // 该操作不会生成 `Err`, 可直接 unwrap.
        let data =
            Array3::<f32>::from_shape_vec(get_shape_from_header(&header), data.into_raw_vec())
                .unwrap();

        Ok(Self { header, data })
    }

    /// 将 CT 扫描以 `f32` 体素写入 `path`. 以 `.gz` 结尾的路径会被压缩存储.
    ///
    /// 写入失败时返回 `Err`, 不做任何静默回退.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> nifti::Result<()> {
        // [z, H, W] -> [W, H, z].
        let data = self.data.view().permuted_axes([2, 1, 0]);
        WriterOptions::new(path.as_ref())
            .reference_header(&self.header)
            .write_nifti(&data)
    }

    /// 根据裸数据和体素分辨率直接创建 `CtVolume` 实体.
    ///
    /// # 参数
    ///
    /// 1. `data` 按照 nifti 惯用标准以 \[w, h, z\] 格式存储.
    /// 2. `pix_dim` 按照 \[w, h, z\] 格式存储.
    ///
    /// # 注意
    ///
    /// 该方法可能会创建不一致的实体, 因此你应仅将其用于实验目的.
    pub fn fake(data: Array3<f32>, pix_dim: [f32; 3]) -> Self {
        let (w, h, z) = data.dim();
        let data = data.permuted_axes([2, 1, 0]);
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());

        Self {
            header: fake_header((w, h, z), pix_dim),
            data,
        }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, f32, Ix3> {
        self.data.view()
    }
}

/// nii 格式 3D label map, 包括 header 和标签值. 标签值以 `u8` 保存.
///
/// 即推理例程输出的预测体数据在内存中的中间形态. 它被转换为
/// segmentation 后即被丢弃.
#[derive(Debug, Clone)]
pub struct LabelMap {
    header: BoxedHeader,
    data: Array3<u8>,
}

impl NiftiGeometry for LabelMap {
    #[inline]
    fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

impl LabelMap {
    /// 打开 nii 文件格式的 3D label map. `path` 为 nii 文件的本地路径.
    /// 如果打开成功, 则返回 `Ok(Self)`, 否则返回 `Err`.
    pub fn open<P: AsRef<Path>>(path: P) -> nifti::Result<Self> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = Box::new(obj.header().clone());

        // [W, H, z] -> [z, H, W].
        let data = obj
            .into_volume()
            .into_ndarray::<u8>()?
            .permuted_axes([2, 1, 0].as_slice());

        debug_assert!(data.is_standard_layout());

        // 该操作不会生成 `Err`, 可直接 unwrap.
        let data =
            Array3::<u8>::from_shape_vec(get_shape_from_header(&header), data.into_raw_vec())
                .unwrap();

        Ok(Self { header, data })
    }

    /// 根据裸标签数据和体素分辨率直接创建 `LabelMap` 实体.
    ///
    /// # 参数
    ///
    /// 1. `data` 按照 nifti 惯用标准以 \[w, h, z\] 格式存储.
    /// 2. `pix_dim` 按照 \[w, h, z\] 格式存储.
    ///
    /// # 注意
    ///
    /// 该方法可能会创建不一致的实体, 因此你应仅将其用于实验目的.
    pub fn fake(data: Array3<u8>, pix_dim: [f32; 3]) -> Self {
        let (w, h, z) = data.dim();
        let data = data.permuted_axes([2, 1, 0]);
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        debug_assert!(data.is_standard_layout());

        Self {
            header: fake_header((w, h, z), pix_dim),
            data,
        }
    }

    /// 获取 label map 中值为 `label` 的体素个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 按升序收集 label map 中出现过的所有非零标签值.
    ///
    /// 背景 (0) 不会出现在返回值中.
    pub fn distinct_labels(&self) -> Vec<u8> {
        self.data
            .iter()
            .copied()
            .filter(|&p| !crate::consts::labels::is_background(p))
            .unique()
            .sorted()
            .collect()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_fake_volume_geometry() {
        let data = Array3::<f32>::zeros((4, 3, 2)); // [w, h, z]
        let ct = CtVolume::fake(data, [1.0, 1.0, 2.5]);
        assert!(ct.is_faked());
        assert_eq!(ct.shape(), (2, 3, 4));
        assert_eq!(ct.len_z(), 2);
        assert_eq!(ct.size(), 24);
        assert_eq!(ct.pix_dim(), [2.5, 1.0, 1.0]);
    }

    #[test]
    fn test_distinct_labels_skip_background() {
        let mut data = Array3::<u8>::zeros((3, 3, 3));
        data[(0, 0, 0)] = 9;
        data[(1, 1, 1)] = 1;
        data[(2, 2, 2)] = 9;
        let label = LabelMap::fake(data, [1.0, 1.0, 1.0]);
        assert_eq!(label.distinct_labels(), vec![1, 9]);
        assert_eq!(label.count(9), 2);
        assert_eq!(label.count(0), 24);
    }
}
