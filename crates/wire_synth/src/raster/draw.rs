//! Stroke rasterization for straight and bent wires.
use glam::{DVec2, IVec2};

use super::Canvas;
use crate::wire::Wire;

/// Stroke width in whole pixels, `round(width)`, at least one.
pub fn stroke_width(width: f64) -> u32 {
    let w = width.round();
    if w.is_finite() && w >= 1.0 {
        w as u32
    } else {
        1
    }
}

/// Draw a wire onto the canvas.
///
/// Straight wires are a single segment. Bent wires are a polyline through
/// the arc vertices from [`Wire::arc_angles`], whose final vertex is the exact
/// terminal angle so the stroke reaches the end of the arc.
pub fn draw_wire(canvas: &mut Canvas, wire: &Wire) {
    let stroke = stroke_width(wire.width);
    if !wire.is_bent() {
        draw_line(canvas, wire.start, wire.end, stroke);
        return;
    }

    let mut previous: Option<IVec2> = None;
    for angle in wire.arc_angles() {
        let point = wire.arc_point(angle);
        if let Some(from) = previous {
            draw_line(canvas, from, point, stroke);
        }
        previous = Some(point);
    }
}

/// Draw a segment with a brush of `stroke` pixels stamped at every DDA step.
///
/// The segment is first clipped to the canvas grown by the brush size, so parts
/// far outside the canvas cost nothing.
pub fn draw_line(canvas: &mut Canvas, from: IVec2, to: IVec2, stroke: u32) {
    let margin = stroke as f64 + 1.0;
    let Some((a, b)) = clip_segment(
        from.as_dvec2(),
        to.as_dvec2(),
        -margin,
        canvas.size() as f64 + margin,
    ) else {
        return;
    };

    let delta = b - a;
    let steps = delta.x.abs().max(delta.y.abs()).ceil();
    if steps < 1.0 {
        stamp(canvas, round(a), stroke);
        return;
    }

    let step = delta / steps;
    for i in 0..=steps as u64 {
        stamp(canvas, round(a + step * i as f64), stroke);
    }
}

#[inline]
fn round(p: DVec2) -> IVec2 {
    IVec2::new(p.x.round() as i32, p.y.round() as i32)
}

/// Liang-Barsky clipping of `a -> b` against the square `[lo, hi]^2`.
fn clip_segment(a: DVec2, b: DVec2, lo: f64, hi: f64) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, a.x - lo),
        (d.x, hi - a.x),
        (-d.y, a.y - lo),
        (d.y, hi - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Square brush up to two pixels, round brush above.
fn stamp(canvas: &mut Canvas, center: IVec2, stroke: u32) {
    if stroke <= 1 {
        canvas.plot(center);
        return;
    }

    let stroke = i64::from(stroke);
    let lo = -((stroke - 1) / 2);
    let hi = stroke / 2;
    let mid = (lo + hi) as f64 / 2.0;
    let r2 = (stroke as f64 / 2.0).powi(2);

    // Only offsets that land on the canvas.
    let last = i64::from(canvas.size()) - 1;
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let (x0, x1) = (lo.max(-cx), hi.min(last - cx));
    let (y0, y1) = (lo.max(-cy), hi.min(last - cy));
    for oy in y0..=y1 {
        for ox in x0..=x1 {
            if stroke > 2 {
                let (fx, fy) = (ox as f64 - mid, oy as f64 - mid);
                if fx * fx + fy * fy > r2 {
                    continue;
                }
            }
            canvas.plot(IVec2::new((cx + ox) as i32, (cy + oy) as i32));
        }
    }
}
