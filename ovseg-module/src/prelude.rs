//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::data::{CtVolume, LabelMap, NiftiGeometry};

pub use crate::segment::{rename, Segment, SegmentationNode};

pub use crate::infer::{prediction_path, InferError, Inference, PyInference};

pub use crate::pipeline::{self, RunError, RunOptions, RunResult};

pub use crate::consts::{CT_BASENAME, DEFAULT_SEGMENTATION_NAME, PREDICTION_SUBDIR};

pub use crate::form::OvsegForm;

pub use crate::module::ModuleInfo;
