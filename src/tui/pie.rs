//! Cost breakdown pie chart, drawn with Plotters polygons.

use std::f64::consts::TAU;

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::CostSlice;

/// Slice fill colours, reused cyclically.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 136, 254),
    (0, 196, 159),
    (255, 187, 40),
    (255, 128, 66),
    (136, 132, 216),
    (130, 202, 157),
];

/// Arc resolution for a full circle.
const STEPS_PER_TURN: usize = 96;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

pub fn slice_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

pub fn slice_color(index: usize) -> Color {
    let (r, g, b) = slice_rgb(index);
    Color::Rgb(r, g, b)
}

/// Unit-circle polygons for each slice: the centre, then the arc.
///
/// Slices start at 3 o'clock and run counter-clockwise. Non-positive
/// slices produce no polygon, so the result may be shorter than `slices`.
pub fn slice_polygons(slices: &[CostSlice], steps_per_turn: usize) -> Vec<(usize, Vec<(f64, f64)>)> {
    let total: f64 = slices.iter().map(|s| s.percentage.max(0.0)).sum();
    if !(total > 0.0) {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(slices.len());
    let mut start = 0.0_f64;
    for (i, slice) in slices.iter().enumerate() {
        if !(slice.percentage > 0.0) {
            continue;
        }
        let sweep = TAU * slice.percentage / total;
        let steps = ((steps_per_turn as f64 * sweep / TAU).ceil() as usize).max(2);

        let mut points = Vec::with_capacity(steps + 2);
        points.push((0.0, 0.0));
        for k in 0..=steps {
            let a = start + sweep * k as f64 / steps as f64;
            points.push((a.cos(), a.sin()));
        }
        out.push((i, points));
        start += sweep;
    }
    out
}

pub struct CostPieChart<'a> {
    pub slices: &'a [CostSlice],
}

impl<'a> Widget for CostPieChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let polygons = slice_polygons(self.slices, STEPS_PER_TURN);
        if polygons.is_empty() {
            return;
        }

        // Stretch the shorter axis so the pie stays round on screen.
        let aspect = f64::from(area.width) / (f64::from(area.height) * CELL_ASPECT);
        let (xr, yr) = if aspect >= 1.0 { (1.1 * aspect, 1.1) } else { (1.1, 1.1 / aspect) };

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).margin(0).build_cartesian_2d(-xr..xr, -yr..yr)?;

            chart.draw_series(polygons.iter().map(|(i, points)| {
                let (r, g, b) = slice_rgb(*i);
                Polygon::new(points.clone(), RGBColor(r, g, b).filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
