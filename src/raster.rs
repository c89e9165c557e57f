//! Stateless rasterization routines.
//!
//! Every function here takes the canvas and its geometry explicitly and keeps
//! nothing between calls. Writes that land outside the canvas are dropped by
//! [`PixelCanvas::set_pixel`], so shapes may be stamped partly off-canvas.

use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};
use std::ops::RangeInclusive;

use egui::Color32;

use crate::canvas::{PixelCanvas, PixelPos, colors_match};
use crate::error::PaintResult;

/// Maximum number of pixels a single flood fill may paint
pub const DEFAULT_FILL_LIMIT: usize = 500_000;

/// Minimum number of angular steps used for a circle outline
const MIN_CIRCLE_STEPS: i64 = 360;

/// A circular nib: every offset within `reach` on both axes whose squared
/// length is at most `radius_sq` gets painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dab {
    pub reach: i32,
    pub radius_sq: i64,
}

impl Dab {
    /// Round dab of the given radius. Brush and shape outlines use `brush_size`,
    /// the eraser uses twice that.
    pub fn circle(radius: i32) -> Self {
        Self {
            reach: radius,
            radius_sq: i64::from(radius).pow(2),
        }
    }

    /// The pencil nib: same probe area as the brush but the squared radius is
    /// `size² / 4` with integer division, so it comes out smaller and harder.
    pub fn pencil(size: i32) -> Self {
        Self {
            reach: size,
            radius_sq: i64::from(size).pow(2) / 4,
        }
    }

    /// How far past the canvas edge a stamp centre can be and still paint
    fn margin(self) -> i64 {
        i64::from(self.reach.max(0)) + 1
    }
}

/// The canvas grown by a margin on every side. Stamps centred outside it
/// cannot touch a pixel, so the shape routines skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Bounds {
    fn around(canvas: &PixelCanvas, margin: i64) -> Self {
        Self {
            min_x: -margin,
            min_y: -margin,
            max_x: canvas.width() as i64 - 1 + margin,
            max_y: canvas.height() as i64 - 1 + margin,
        }
    }

    fn grow(self, by: i64) -> Self {
        Self {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    fn corners(&self) -> [(f64, f64); 4] {
        let (x0, y0) = (self.min_x as f64, self.min_y as f64);
        let (x1, y1) = (self.max_x as f64, self.max_y as f64);
        [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
    }

    /// Cut a segment down to the part inside the bounds (Liang-Barsky).
    /// Segments already inside come back unchanged.
    fn clip_segment(&self, from: PixelPos, to: PixelPos) -> Option<(PixelPos, PixelPos)> {
        let (x0, y0) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));
        if self.contains(x0, y0) && self.contains(x1, y1) {
            return Some((from, to));
        }

        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
        let edges = [
            (-dx, fx - self.min_x as f64),
            (dx, self.max_x as f64 - fx),
            (-dy, fy - self.min_y as f64),
            (dy, self.max_y as f64 - fy),
        ];
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
        }
        if t0 > t1 {
            return None;
        }

        let at = |t: f64| {
            let x = (fx + t * dx).round() as i64;
            let y = (fy + t * dy).round() as i64;
            PixelPos::new(saturate(x), saturate(y))
        };
        Some((at(t0), at(t1)))
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Paint one dab centred on `center`
pub fn stamp_dab(canvas: &mut PixelCanvas, center: PixelPos, dab: Dab, color: Color32) {
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let reach = i64::from(dab.reach);
    let x_range = (cx - reach).max(0)..=(cx + reach).min(canvas.width() as i64 - 1);
    let y_range = (cy - reach).max(0)..=(cy + reach).min(canvas.height() as i64 - 1);

    for x in x_range {
        for y in y_range.clone() {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= dab.radius_sq {
                canvas.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}

/// Set every pixel within `radius` of `center`
pub fn stamp_circle(canvas: &mut PixelCanvas, center: PixelPos, radius: i32, color: Color32) {
    stamp_dab(canvas, center, Dab::circle(radius), color);
}

/// Integer Bresenham walk from one cell to another, both endpoints included
#[derive(Debug, Clone)]
pub struct LineWalk {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    finished: bool,
}

impl LineWalk {
    pub fn new(start: PixelPos, end: PixelPos) -> Self {
        let (x, y) = (i64::from(start.x), i64::from(start.y));
        let (end_x, end_y) = (i64::from(end.x), i64::from(end.y));
        let dx = (end_x - x).abs();
        let dy = (end_y - y).abs();
        Self {
            x,
            y,
            end_x,
            end_y,
            dx,
            dy,
            sx: if x < end_x { 1 } else { -1 },
            sy: if y < end_y { 1 } else { -1 },
            err: dx - dy,
            finished: false,
        }
    }
}

impl Iterator for LineWalk {
    type Item = PixelPos;

    fn next(&mut self) -> Option<PixelPos> {
        if self.finished {
            return None;
        }
        // Every visited cell lies between the two i32 endpoints
        let visited = PixelPos::new(self.x as i32, self.y as i32);
        if self.x == self.end_x && self.y == self.end_y {
            self.finished = true;
            return Some(visited);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(visited)
    }
}

/// Stamp `dab` at every cell of the Bresenham walk from `from` to `to`.
///
/// Freehand strokes use this to join consecutive pointer samples. A segment
/// running far past the canvas is first cut to the stretch that can still
/// paint, so only the cells near the canvas are walked.
pub fn stroke_line(canvas: &mut PixelCanvas, from: PixelPos, to: PixelPos, dab: Dab, color: Color32) {
    let Some((from, to)) = Bounds::around(canvas, dab.margin()).clip_segment(from, to) else {
        return;
    };
    for cell in LineWalk::new(from, to) {
        stamp_dab(canvas, cell, dab, color);
    }
}

/// A line `brush_size` pixels thick in every direction
pub fn draw_line(
    canvas: &mut PixelCanvas,
    from: PixelPos,
    to: PixelPos,
    color: Color32,
    brush_size: i32,
) {
    stroke_line(canvas, from, to, Dab::circle(brush_size), color);
}

/// Outline of the axis-aligned rectangle spanned by two opposite corners
pub fn draw_rectangle_outline(
    canvas: &mut PixelCanvas,
    corner0: PixelPos,
    corner1: PixelPos,
    color: Color32,
    brush_size: i32,
) {
    let dab = Dab::circle(brush_size);
    let bounds = Bounds::around(canvas, dab.margin());
    let (min_x, max_x) = (i64::from(corner0.x.min(corner1.x)), i64::from(corner0.x.max(corner1.x)));
    let (min_y, max_y) = (i64::from(corner0.y.min(corner1.y)), i64::from(corner0.y.max(corner1.y)));

    let mut stamp = |x: i64, y: i64| {
        if bounds.contains(x, y) {
            stamp_dab(canvas, PixelPos::new(x as i32, y as i32), dab, color);
        }
    };
    for x in min_x.max(bounds.min_x)..=max_x.min(bounds.max_x) {
        stamp(x, min_y);
        stamp(x, max_y);
    }
    for y in min_y.max(bounds.min_y)..=max_y.min(bounds.max_y) {
        stamp(min_x, y);
        stamp(max_x, y);
    }
}

/// Circle outline through `edge_point`, centred on `center`.
///
/// The number of angular steps grows with the radius so neighbouring stamps
/// always overlap. Only the steps whose stamps can reach the canvas are
/// visited.
pub fn draw_circle_outline(
    canvas: &mut PixelCanvas,
    center: PixelPos,
    edge_point: PixelPos,
    color: Color32,
    brush_size: i32,
) {
    let dab = Dab::circle(brush_size);
    let dx = f64::from(edge_point.x) - f64::from(center.x);
    let dy = f64::from(edge_point.y) - f64::from(center.y);
    let radius = dx.hypot(dy) as i64;
    let steps = (radius * 4).max(MIN_CIRCLE_STEPS);

    let bounds = Bounds::around(canvas, dab.margin());
    let Some(indices) = visible_steps(center, radius, steps, bounds) else {
        return;
    };

    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    for i in indices {
        let angle = i.rem_euclid(steps) as f64 * TAU / steps as f64;
        let x = cx + (radius as f64 * angle.cos()) as i64;
        let y = cy + (radius as f64 * angle.sin()) as i64;
        if bounds.contains(x, y) {
            stamp_dab(canvas, PixelPos::new(x as i32, y as i32), dab, color);
        }
    }
}

/// Step indices of a circle outline that may land inside `bounds`, or `None`
/// when the ring misses them entirely. Indices can run past `steps` or below
/// zero and are meant to be wrapped.
fn visible_steps(center: PixelPos, radius: i64, steps: i64, bounds: Bounds) -> Option<RangeInclusive<i64>> {
    // Stamps sit on truncated ring points, up to a cell and a half away
    let area = bounds.grow(2);
    let (cx, cy) = (f64::from(center.x), f64::from(center.y));
    let r = radius as f64;

    let near_x = cx.clamp(area.min_x as f64, area.max_x as f64);
    let near_y = cy.clamp(area.min_y as f64, area.max_y as f64);
    let nearest = (near_x - cx).hypot(near_y - cy);
    let farthest = area
        .corners()
        .iter()
        .map(|&(x, y)| (x - cx).hypot(y - cy))
        .fold(0.0, f64::max);
    if r < nearest || r > farthest {
        return None;
    }
    if nearest == 0.0 {
        return Some(0..=steps - 1);
    }

    // Seen from outside, the area spans less than half a turn
    let (mid_x, mid_y) = (
        (area.min_x + area.max_x) as f64 / 2.0,
        (area.min_y + area.max_y) as f64 / 2.0,
    );
    let reference = (mid_y - cy).atan2(mid_x - cx);
    let (low, high) = area.corners().iter().fold((0.0_f64, 0.0_f64), |(low, high), &(x, y)| {
        let delta = ((y - cy).atan2(x - cx) - reference + PI).rem_euclid(TAU) - PI;
        (low.min(delta), high.max(delta))
    });

    let per_step = TAU / steps as f64;
    let first = ((reference + low) / per_step).floor() as i64 - 1;
    let last = ((reference + high) / per_step).ceil() as i64 + 1;
    Some(first..=last)
}

/// Result of a flood fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillOutcome {
    /// Number of pixels that were repainted
    pub filled: usize,
    /// True when the fill stopped at its pixel limit with matching pixels left
    pub capped: bool,
}

impl FillOutcome {
    pub fn is_complete(&self) -> bool {
        !self.capped
    }
}

/// 4-connected breadth-first fill of the region sharing the seed's color.
///
/// Stops after `limit` pixels, leaving the region partially filled and
/// reporting `capped`. The seed must lie on the canvas.
pub fn flood_fill(
    canvas: &mut PixelCanvas,
    seed: PixelPos,
    fill_color: Color32,
    limit: usize,
) -> PaintResult<FillOutcome> {
    let target = canvas.get_pixel(seed.x, seed.y)?;
    if colors_match(target, fill_color) {
        return Ok(FillOutcome::default());
    }

    let mut queue = VecDeque::from([seed]);
    let mut filled = 0;

    while filled < limit {
        let Some(pos) = queue.pop_front() else {
            break;
        };
        let Ok(color) = canvas.get_pixel(pos.x, pos.y) else {
            continue;
        };
        if !colors_match(color, target) {
            continue;
        }

        canvas.set_pixel(pos.x, pos.y, fill_color);
        filled += 1;

        queue.extend([
            pos.offset(1, 0),
            pos.offset(-1, 0),
            pos.offset(0, 1),
            pos.offset(0, -1),
        ]);
    }

    let capped = queue.iter().any(|pos| {
        canvas
            .get_pixel(pos.x, pos.y)
            .is_ok_and(|color| colors_match(color, target))
    });
    if capped {
        log::warn!("Flood fill stopped at its limit of {} pixels", limit);
    }

    Ok(FillOutcome { filled, capped })
}

/// Eyedropper: read the color under `pos`
pub fn pick_color(canvas: &PixelCanvas, pos: PixelPos) -> PaintResult<Color32> {
    canvas.get_pixel(pos.x, pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(size: usize) -> PixelCanvas {
        PixelCanvas::new(size, size, Color32::WHITE).unwrap()
    }

    fn painted(canvas: &PixelCanvas, color: Color32) -> usize {
        canvas.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_line_walk_endpoints() {
        let cells: Vec<_> = LineWalk::new(PixelPos::new(0, 0), PixelPos::new(4, 2)).collect();
        assert_eq!(cells.first(), Some(&PixelPos::new(0, 0)));
        assert_eq!(cells.last(), Some(&PixelPos::new(4, 2)));
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn test_line_walk_single_cell() {
        let cells: Vec<_> = LineWalk::new(PixelPos::new(3, 3), PixelPos::new(3, 3)).collect();
        assert_eq!(cells, vec![PixelPos::new(3, 3)]);
    }

    #[test]
    fn test_line_walk_steep_reverse() {
        let cells: Vec<_> = LineWalk::new(PixelPos::new(2, 9), PixelPos::new(0, 0)).collect();
        assert_eq!(cells.len(), 10);
        assert!(cells.windows(2).all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1));
    }

    #[test]
    fn test_stamp_circle_radius() {
        let mut canvas = white(21);
        stamp_circle(&mut canvas, PixelPos::new(10, 10), 3, Color32::BLACK);
        assert_eq!(canvas.get_pixel(13, 10).unwrap(), Color32::BLACK);
        assert_eq!(canvas.get_pixel(10, 7).unwrap(), Color32::BLACK);
        assert_eq!(canvas.get_pixel(13, 11).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(12, 12).unwrap(), Color32::BLACK);
        assert_eq!(canvas.get_pixel(13, 13).unwrap(), Color32::WHITE);
    }

    #[test]
    fn test_pencil_dab_is_smaller_than_brush() {
        let mut pencil = white(31);
        let mut brush = white(31);
        stamp_dab(&mut pencil, PixelPos::new(15, 15), Dab::pencil(5), Color32::BLACK);
        stamp_dab(&mut brush, PixelPos::new(15, 15), Dab::circle(5), Color32::BLACK);
        assert!(painted(&pencil, Color32::BLACK) < painted(&brush, Color32::BLACK));
        // 25 / 4 == 6, so (2, 1) is inside but (2, 2) is not
        assert_eq!(pencil.get_pixel(17, 16).unwrap(), Color32::BLACK);
        assert_eq!(pencil.get_pixel(17, 17).unwrap(), Color32::WHITE);
    }

    #[test]
    fn test_stamp_near_edge_is_clipped() {
        let mut canvas = white(10);
        stamp_circle(&mut canvas, PixelPos::new(0, 0), 4, Color32::RED);
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), Color32::RED);
        assert_eq!(canvas.pixels().len(), 100);
    }

    #[test]
    fn test_zero_length_line_matches_stamp() {
        let mut line = white(20);
        let mut stamp = white(20);
        let p = PixelPos::new(9, 11);
        draw_line(&mut line, p, p, Color32::BLUE, 4);
        stamp_circle(&mut stamp, p, 4, Color32::BLUE);
        assert_eq!(line, stamp);
    }

    #[test]
    fn test_circle_outline_leaves_center() {
        let mut canvas = white(100);
        draw_circle_outline(
            &mut canvas,
            PixelPos::new(50, 50),
            PixelPos::new(80, 50),
            Color32::BLACK,
            1,
        );
        assert_eq!(canvas.get_pixel(50, 50).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(80, 50).unwrap(), Color32::BLACK);
        assert_eq!(canvas.get_pixel(50, 80).unwrap(), Color32::BLACK);
        assert_eq!(canvas.get_pixel(20, 50).unwrap(), Color32::BLACK);
    }

    #[test]
    fn test_large_circle_outline_is_closed() {
        let mut canvas = white(700);
        let center = PixelPos::new(350, 350);
        draw_circle_outline(&mut canvas, center, PixelPos::new(650, 350), Color32::BLACK, 1);

        // A 4-connected fill from the centre must not leak through the ring
        let outcome = flood_fill(&mut canvas, center, Color32::RED, DEFAULT_FILL_LIMIT).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(699, 699).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(350, 60).unwrap(), Color32::RED);
        assert!(outcome.filled < 300 * 300 * 4);
    }

    #[test]
    fn test_far_off_canvas_shapes() {
        let mut canvas = white(20);
        draw_circle_outline(
            &mut canvas,
            PixelPos::new(0, 0),
            PixelPos::new(1_000_000_000, 0),
            Color32::BLACK,
            1,
        );
        assert_eq!(painted(&canvas, Color32::BLACK), 0);

        draw_line(
            &mut canvas,
            PixelPos::new(-2_000_000_000, 5),
            PixelPos::new(2_000_000_000, 5),
            Color32::BLACK,
            1,
        );
        assert!((0..20).all(|x| canvas.get_pixel(x, 5).unwrap() == Color32::BLACK));
        assert_eq!(canvas.get_pixel(7, 8).unwrap(), Color32::WHITE);

        draw_rectangle_outline(
            &mut canvas,
            PixelPos::new(i32::MIN, i32::MIN),
            PixelPos::new(i32::MAX, 15),
            Color32::RED,
            1,
        );
        assert!((0..20).all(|x| canvas.get_pixel(x, 15).unwrap() == Color32::RED));
        assert_eq!(canvas.get_pixel(7, 12).unwrap(), Color32::WHITE);

        stamp_circle(&mut canvas, PixelPos::new(i32::MAX, i32::MIN), 50, Color32::GREEN);
        assert_eq!(painted(&canvas, Color32::GREEN), 0);
    }

    #[test]
    fn test_huge_circle_crossing_canvas() {
        let mut canvas = white(20);
        draw_circle_outline(
            &mut canvas,
            PixelPos::new(-1_000_000_000, 10),
            PixelPos::new(0, 10),
            Color32::BLACK,
            3,
        );
        // Near the canvas the ring is a vertical line at x = 0
        assert!((0..20).all(|y| canvas.get_pixel(0, y).unwrap() == Color32::BLACK));
        assert!((0..20).all(|y| canvas.get_pixel(10, y).unwrap() == Color32::WHITE));
    }

    #[test]
    fn test_clipped_line_matches_unclipped_inside() {
        let mut near = white(30);
        let mut far = white(30);
        draw_line(&mut near, PixelPos::new(-3, 12), PixelPos::new(40, 12), Color32::BLUE, 2);
        draw_line(&mut far, PixelPos::new(-900_000, 12), PixelPos::new(900_000, 12), Color32::BLUE, 2);
        assert_eq!(near, far);
    }

    #[test]
    fn test_flood_fill_stops_at_border() {
        let mut canvas = white(20);
        draw_rectangle_outline(
            &mut canvas,
            PixelPos::new(5, 5),
            PixelPos::new(14, 14),
            Color32::BLACK,
            0,
        );
        let outcome = flood_fill(&mut canvas, PixelPos::new(10, 10), Color32::RED, DEFAULT_FILL_LIMIT).unwrap();
        // interior of a 10x10 outline is 8x8
        assert_eq!(outcome, FillOutcome { filled: 64, capped: false });
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(6, 6).unwrap(), Color32::RED);
    }

    #[test]
    fn test_flood_fill_same_color_is_noop() {
        let mut canvas = white(10);
        let before = canvas.clone();
        let near_white = Color32::from_rgb(254, 254, 254);
        let outcome = flood_fill(&mut canvas, PixelPos::new(3, 3), near_white, DEFAULT_FILL_LIMIT).unwrap();
        assert_eq!(outcome.filled, 0);
        assert!(outcome.is_complete());
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_flood_fill_capped() {
        let mut canvas = white(10);
        let outcome = flood_fill(&mut canvas, PixelPos::new(0, 0), Color32::RED, 30).unwrap();
        assert_eq!(outcome.filled, 30);
        assert!(outcome.capped);
        assert_eq!(painted(&canvas, Color32::RED), 30);
    }

    #[test]
    fn test_flood_fill_exact_limit_is_not_capped() {
        let mut canvas = white(5);
        let outcome = flood_fill(&mut canvas, PixelPos::new(2, 2), Color32::RED, 25).unwrap();
        assert_eq!(outcome, FillOutcome { filled: 25, capped: false });
    }

    #[test]
    fn test_flood_fill_seed_outside() {
        let mut canvas = white(5);
        assert!(flood_fill(&mut canvas, PixelPos::new(5, 0), Color32::RED, 10).is_err());
    }

    #[test]
    fn test_pick_color() {
        let mut canvas = white(5);
        canvas.set_pixel(1, 2, Color32::GREEN);
        assert_eq!(pick_color(&canvas, PixelPos::new(1, 2)).unwrap(), Color32::GREEN);
    }
}
