//! Carrying layer data across a change in vertex count.

use bevy::prelude::*;

use crate::layer::Layer;

/// For every vertex in `new`, the index of the nearest vertex in `old`.
///
/// Ties resolve to the lowest index. `old` must not be empty unless `new` is.
pub fn nearest_vertex_map(old: &[Vec3], new: &[Vec3]) -> Vec<usize> {
    new.iter()
        .map(|&target| {
            let mut nearest = 0;
            let mut min_distance = f32::INFINITY;
            for (index, &source) in old.iter().enumerate() {
                let distance = target.distance_squared(source);
                if distance < min_distance {
                    min_distance = distance;
                    nearest = index;
                }
            }
            nearest
        })
        .collect()
}

/// Rebuilds a layer's per-vertex arrays by copying from `map[i]` for each new vertex `i`.
///
/// Indices past the end of the layer's data read as empty data.
pub fn reproject_layer(layer: &mut Layer, map: &[usize]) {
    layer.ensure_allocated();
    let colors = layer.colors();
    let transparency = layer.transparency();

    let new_colors = map
        .iter()
        .map(|&i| colors.get(i).copied().unwrap_or(LinearRgba::NONE))
        .collect();
    let new_transparency = map
        .iter()
        .map(|&i| transparency.get(i).copied().unwrap_or(0.0))
        .collect();
    layer.set_vertex_data(new_colors, new_transparency);
}
