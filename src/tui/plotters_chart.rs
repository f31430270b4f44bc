//! Plotters-powered monthly sales bar chart for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{MonthlyBucket, Period};
use crate::report::format_compact;

/// Sales bars (#3b82f6).
pub const SALES_RGB: (u8, u8, u8) = (59, 130, 246);
/// Returns bars (#ef4444).
pub const RETURNS_RGB: (u8, u8, u8) = (239, 68, 68);

/// Half-width of each bar in bucket units; the pair of bars spans 0.8.
const BAR_HALF: f64 = 0.4;

/// Render-only description of the sales-vs-returns chart.
///
/// All bounds are computed outside the render call so `render()` stays focused on drawing.
pub struct SalesBarChart<'a> {
    pub buckets: &'a [MonthlyBucket],
    /// Top of the value axis.
    pub y_max: f64,
}

impl<'a> SalesBarChart<'a> {
    pub fn new(buckets: &'a [MonthlyBucket]) -> Self {
        Self {
            buckets,
            y_max: value_ceiling(buckets),
        }
    }
}

/// Y-axis ceiling: 10% headroom over the tallest bar, `1.0` for flat data.
pub fn value_ceiling(buckets: &[MonthlyBucket]) -> f64 {
    let max = buckets
        .iter()
        .flat_map(|b| [b.sales_total, b.returns_total])
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// Compact x-axis label (`Jan 24`) for the bucket centred at `x`, or blank between buckets.
pub fn axis_label(buckets: &[MonthlyBucket], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    match buckets.get(idx as usize).map(|b| b.period) {
        Some(Period::Month { year, month }) => {
            let label = Period::Month { year, month }.label();
            // "Jan 2024" -> "Jan 24"
            format!("{} {:02}", &label[..3], year.rem_euclid(100))
        }
        Some(Period::Invalid) => "n/a".to_string(),
        None => String::new(),
    }
}

impl<'a> Widget for SalesBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.buckets.is_empty() || !(self.y_max.is_finite() && self.y_max > 0.0) {
            return;
        }

        let n = self.buckets.len();
        let x0 = -0.5;
        let x1 = n as f64 - 0.5;
        let y1 = self.y_max;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(n.min(12))
                .y_labels(5)
                .x_label_formatter(&|v| axis_label(self.buckets, *v))
                .y_label_formatter(&|v| format_compact(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let sales_color = RGBColor(SALES_RGB.0, SALES_RGB.1, SALES_RGB.2);
            let returns_color = RGBColor(RETURNS_RGB.0, RETURNS_RGB.1, RETURNS_RGB.2);

            // Sales on the left half of each slot, returns on the right.
            chart.draw_series(self.buckets.iter().enumerate().map(|(i, b)| {
                let x = i as f64;
                Rectangle::new([(x - BAR_HALF, 0.0), (x, b.sales_total.max(0.0))], sales_color.filled())
            }))?;
            chart.draw_series(self.buckets.iter().enumerate().map(|(i, b)| {
                let x = i as f64;
                Rectangle::new([(x, 0.0), (x + BAR_HALF, b.returns_total.max(0.0))], returns_color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(year: i32, month: u32, sales: f64, returns: f64) -> MonthlyBucket {
        let period = Period::Month { year, month };
        MonthlyBucket {
            period,
            label: period.label(),
            sales_total: sales,
            returns_total: returns,
        }
    }

    #[test]
    fn ceiling_has_headroom() {
        let b = vec![bucket(2024, 1, 100.0, 20.0), bucket(2024, 2, 250.0, 300.0)];
        assert!((value_ceiling(&b) - 330.0).abs() < 1e-9);
        assert_eq!(value_ceiling(&[]), 1.0);
        assert_eq!(value_ceiling(&[bucket(2024, 1, 0.0, 0.0)]), 1.0);
    }

    #[test]
    fn labels_only_on_bucket_centres() {
        let b = vec![bucket(2023, 12, 1.0, 0.0), bucket(2024, 1, 1.0, 0.0)];
        assert_eq!(axis_label(&b, 0.0), "Dec 23");
        assert_eq!(axis_label(&b, 1.0), "Jan 24");
        assert_eq!(axis_label(&b, 0.5), "");
        assert_eq!(axis_label(&b, 2.0), "");
        assert_eq!(axis_label(&b, -1.0), "");
    }

    #[test]
    fn renders_bars_into_the_buffer() {
        let b = vec![bucket(2024, 1, 900.0, 100.0), bucket(2024, 2, 1200.0, 0.0)];
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        SalesBarChart::new(&b).render(area, &mut buf);
        assert!(buf.content().iter().any(|c| c.symbol() != " "));
    }

    #[test]
    fn tiny_area_renders_hint_instead_of_chart() {
        let b = vec![bucket(2024, 1, 1.0, 0.0)];
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        SalesBarChart::new(&b).render(area, &mut buf);
        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(first_row.starts_with("Chart area"));
    }
}
