use std::f64::consts::PI;

use crate::{PlineVertex, Polyline};

fn rotate_about(x: f64, y: f64, cx: f64, cy: f64, deg: f64) -> (f64, f64) {
    let rad = deg * PI / 180.0;
    let (s, c) = rad.sin_cos();
    let dx = x - cx;
    let dy = y - cy;
    (cx + dx * c - dy * s, cy + dx * s + dy * c)
}

fn bulge_for_quarter_circle() -> f64 {
    (PI / 8.0).tan()
}

pub fn circle(center: (f64, f64), radius: f64) -> Polyline<f64> {
    let (cx, cy) = center;
    let mut pl = Polyline::new_closed();

    // Represent a full circle as two 180° arcs (two vertices, both bulge=1).
    pl.vertex_data.push(PlineVertex::new(cx - radius, cy, 1.0));
    pl.vertex_data.push(PlineVertex::new(cx + radius, cy, 1.0));
    pl
}

pub fn rectangle(center: (f64, f64), size: (f64, f64), rotation_deg: f64) -> Polyline<f64> {
    rounded_rectangle(center, size, [0.0; 4], rotation_deg)
}

/// Rectangle with independent corner radii, given as
/// `[top-left, top-right, bottom-right, bottom-left]`.
///
/// Radii are clamped to half the shorter side. `rotation_deg` is counter-clockwise.
pub fn rounded_rectangle(
    center: (f64, f64),
    size: (f64, f64),
    radii: [f64; 4],
    rotation_deg: f64,
) -> Polyline<f64> {
    let (cx, cy) = center;
    let (w, h) = size;
    let hw = w / 2.0;
    let hh = h / 2.0;
    let clamp = |r: f64| r.min(hw).min(hh).max(0.0);
    let [tl, tr, br, bl] = radii.map(clamp);
    let b = bulge_for_quarter_circle();

    // CCW walk starting at the bottom-right corner. A rounded corner contributes two vertices,
    // the first carrying the arc bulge; a square corner contributes one.
    let mut pts: Vec<(f64, f64, f64)> = Vec::with_capacity(8);
    if br > 0.0 {
        pts.push((cx + hw - br, cy - hh, b));
        pts.push((cx + hw, cy - hh + br, 0.0));
    } else {
        pts.push((cx + hw, cy - hh, 0.0));
    }
    if tr > 0.0 {
        pts.push((cx + hw, cy + hh - tr, b));
        pts.push((cx + hw - tr, cy + hh, 0.0));
    } else {
        pts.push((cx + hw, cy + hh, 0.0));
    }
    if tl > 0.0 {
        pts.push((cx - hw + tl, cy + hh, b));
        pts.push((cx - hw, cy + hh - tl, 0.0));
    } else {
        pts.push((cx - hw, cy + hh, 0.0));
    }
    if bl > 0.0 {
        pts.push((cx - hw, cy - hh + bl, b));
        pts.push((cx - hw + bl, cy - hh, 0.0));
    } else {
        pts.push((cx - hw, cy - hh, 0.0));
    }

    if rotation_deg != 0.0 {
        for p in &mut pts {
            let (x, y) = rotate_about(p.0, p.1, cx, cy, rotation_deg);
            p.0 = x;
            p.1 = y;
        }
    }

    let mut pl = Polyline::new_closed();
    for (x, y, bulge) in pts {
        pl.vertex_data.push(PlineVertex::new(x, y, bulge));
    }
    pl
}

pub fn is_valid_closed_polyline(pl: &Polyline<f64>) -> bool {
    pl.is_closed && pl.vertex_data.len() >= 2
}
