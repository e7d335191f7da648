//! Gradient-domain (Poisson) seamless compositing.
//!
//! Grafts a patch into a destination image so that the patch keeps its
//! internal gradient field while its boundary values match the surrounding
//! destination pixels. Instead of solving for the composite directly, the
//! solver works on the correction field `h = result - patch`: the Poisson
//! equation with the patch's own gradients as guidance reduces to the
//! Laplace equation for `h`, with `h = dest - patch` on the mask boundary.
//! `h` is seeded with the mean boundary offset and relaxed with Gauss-Seidel
//! sweeps, so the constant component is right before the first sweep and the
//! iterations only have to settle the low-frequency residual.

// Numeric image code: index/float conversions are bounds-checked by
// construction.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_ellipse_mut;

/// Soft elliptical mask for a `width` x `height` graft region.
///
/// Fully opaque inside an ellipse centered in the region with the given
/// semi-axis fractions, fully transparent outside. The ellipse never touches
/// the region edge for width fractions below 0.5, which keeps the solve
/// domain surrounded by boundary pixels.
#[must_use]
pub fn elliptical_mask(
    width: u32,
    height: u32,
    width_fraction: f64,
    height_fraction: f64,
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }
    let center = ((width / 2) as i32, (height / 2) as i32);
    let semi_x = ((f64::from(width) * width_fraction).round() as i32).max(1);
    let semi_y = ((f64::from(height) * height_fraction).round() as i32).max(1);
    draw_filled_ellipse_mut(&mut mask, center, semi_x, semi_y, Luma([255u8]));
    mask
}

/// One solvable pixel of the masked region.
struct Cell {
    /// Flat index into the patch grid.
    index: usize,
    /// Flat indices of 4-neighbors that are themselves solvable.
    interior: [usize; 4],
    interior_count: usize,
    /// Sum of `dest - patch` over boundary 4-neighbors, per channel.
    boundary_sum: [f32; 3],
    /// Total number of participating neighbors (interior + boundary).
    degree: f32,
}

/// Composites `patch` into `dest` at offset (`offset_x`, `offset_y`) with
/// Poisson-style seamless cloning over the nonzero pixels of `mask`.
///
/// `mask` must have the patch's dimensions. Masked pixels whose destination
/// coordinates fall outside the frame are ignored. Returns a new image; the
/// destination is not mutated.
#[must_use]
pub fn seamless_clone(
    patch: &RgbImage,
    dest: &RgbImage,
    mask: &GrayImage,
    offset_x: i64,
    offset_y: i64,
    iterations: u32,
) -> RgbImage {
    let (pw, ph) = patch.dimensions();
    let (dw, dh) = dest.dimensions();
    let mut out = dest.clone();
    if pw == 0 || ph == 0 || dw == 0 || dh == 0 || mask.dimensions() != (pw, ph) {
        return out;
    }

    let dest_coord = |px: u32, py: u32| -> Option<(u32, u32)> {
        let x = offset_x + i64::from(px);
        let y = offset_y + i64::from(py);
        if (0..i64::from(dw)).contains(&x) && (0..i64::from(dh)).contains(&y) {
            Some((x as u32, y as u32))
        } else {
            None
        }
    };

    // Solve domain: masked pixels that land inside the destination frame.
    let total = (pw * ph) as usize;
    let mut solvable = vec![false; total];
    for py in 0..ph {
        for px in 0..pw {
            if mask.get_pixel(px, py)[0] > 0 && dest_coord(px, py).is_some() {
                solvable[(py * pw + px) as usize] = true;
            }
        }
    }

    let channel_offset = |px: u32, py: u32, dx: u32, dy: u32| -> [f32; 3] {
        let d = dest.get_pixel(dx, dy).0;
        let p = patch.get_pixel(px, py).0;
        [
            f32::from(d[0]) - f32::from(p[0]),
            f32::from(d[1]) - f32::from(p[1]),
            f32::from(d[2]) - f32::from(p[2]),
        ]
    };

    let mut cells = Vec::new();
    let mut dc_sum = [0f32; 3];
    let mut dc_count = 0f32;
    for py in 0..ph {
        for px in 0..pw {
            let index = (py * pw + px) as usize;
            if !solvable[index] {
                continue;
            }
            let mut cell = Cell {
                index,
                interior: [0; 4],
                interior_count: 0,
                boundary_sum: [0.0; 3],
                degree: 0.0,
            };
            let neighbors = [
                (i64::from(px) - 1, i64::from(py)),
                (i64::from(px) + 1, i64::from(py)),
                (i64::from(px), i64::from(py) - 1),
                (i64::from(px), i64::from(py) + 1),
            ];
            for (nx, ny) in neighbors {
                if !(0..i64::from(pw)).contains(&nx) || !(0..i64::from(ph)).contains(&ny) {
                    // Neighbor outside the patch grid: dropped from the stencil.
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                let nindex = (ny * pw + nx) as usize;
                if solvable[nindex] {
                    cell.interior[cell.interior_count] = nindex;
                    cell.interior_count += 1;
                    cell.degree += 1.0;
                } else if let Some((dx, dy)) = dest_coord(nx, ny) {
                    let offset = channel_offset(nx, ny, dx, dy);
                    for c in 0..3 {
                        cell.boundary_sum[c] += offset[c];
                    }
                    cell.degree += 1.0;
                    for c in 0..3 {
                        dc_sum[c] += offset[c];
                    }
                    dc_count += 1.0;
                }
            }
            cells.push(cell);
        }
    }
    if cells.is_empty() {
        return out;
    }

    let dc = if dc_count > 0.0 {
        [dc_sum[0] / dc_count, dc_sum[1] / dc_count, dc_sum[2] / dc_count]
    } else {
        [0.0; 3]
    };
    let mut h = vec![dc; total];

    for _ in 0..iterations {
        for cell in &cells {
            if cell.degree == 0.0 {
                continue;
            }
            let mut acc = cell.boundary_sum;
            for &n in &cell.interior[..cell.interior_count] {
                for c in 0..3 {
                    acc[c] += h[n][c];
                }
            }
            h[cell.index] = [
                acc[0] / cell.degree,
                acc[1] / cell.degree,
                acc[2] / cell.degree,
            ];
        }
    }

    for cell in &cells {
        let px = (cell.index % pw as usize) as u32;
        let py = (cell.index / pw as usize) as u32;
        let Some((dx, dy)) = dest_coord(px, py) else {
            continue;
        };
        let p = patch.get_pixel(px, py).0;
        let correction = h[cell.index];
        let mut value = [0u8; 3];
        for c in 0..3 {
            value[c] = (f32::from(p[c]) + correction[c]).clamp(0.0, 255.0).round() as u8;
        }
        out.put_pixel(dx, dy, Rgb(value));
    }

    out
}
