//! Monte-Carlo ambient occlusion baking into paint layers.

mod ao;
mod sampling;

pub use ao::{
    AoBlendMode, AoSettings, BakeProgress, BakeReport, bake_ambient_occlusion,
    bake_ambient_occlusion_with_progress, occlusion_factor,
};
pub use sampling::{orientation, reflect, sample_cone};
