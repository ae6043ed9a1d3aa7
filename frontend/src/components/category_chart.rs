use std::f64::consts::PI;

use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{format_shekels, CategoryTotal};
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

const COLORS: [RGBColor; 7] = [
    RGBColor(0x10, 0xb9, 0x81),
    RGBColor(0x3b, 0x82, 0xf6),
    RGBColor(0xef, 0x44, 0x44),
    RGBColor(0xf9, 0x73, 0x16),
    RGBColor(0x8b, 0x5c, 0xf6),
    RGBColor(0xec, 0x48, 0x99),
    RGBColor(0xf5, 0x9e, 0x0b),
];

const CANVAS_SIZE: u32 = 300;
const RADIUS: f64 = 120.0;

fn color_for(index: usize) -> RGBColor {
    COLORS[index % COLORS.len()]
}

fn css_color(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Start and end angle (radians, clockwise from 12 o'clock) of each slice
pub fn slice_angles(totals: &[f64]) -> Vec<(f64, f64)> {
    let sum: f64 = totals.iter().filter(|total| **total > 0.0).sum();
    if sum <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    totals
        .iter()
        .map(|total| {
            let sweep = total.max(0.0) / sum * 2.0 * PI;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Polygon outline of one slice: the centre followed by points along the arc
fn slice_polygon(center: (i32, i32), radius: f64, (start, end): (f64, f64)) -> Vec<(i32, i32)> {
    let steps = (((end - start) / (2.0 * PI)) * 120.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.sin()).round() as i32,
            center.1 - (radius * angle.cos()).round() as i32,
        ));
    }
    points
}

#[derive(Properties, PartialEq)]
pub struct CategoryChartProps {
    pub categories: Vec<CategoryTotal>,
}

pub enum Msg {}

pub struct CategoryChart {
    canvas_ref: NodeRef,
}

impl Component for CategoryChart {
    type Message = Msg;
    type Properties = CategoryChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {}
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if !ctx.props().categories.is_empty() {
            self.draw_chart(&ctx.props().categories);
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let categories = &ctx.props().categories;

        if categories.is_empty() {
            return html! {
                <div class="chart-empty">
                    <p>{"הוסיפו הוצאות כדי לראות את התפלגות הקטגוריות"}</p>
                </div>
            };
        }

        html! {
            <div class="category-chart">
                <canvas
                    ref={self.canvas_ref.clone()}
                    class="category-chart-canvas"
                    width={CANVAS_SIZE.to_string()}
                    height={CANVAS_SIZE.to_string()}
                ></canvas>
                <ul class="chart-legend">
                    {for categories.iter().enumerate().map(|(index, entry)| html! {
                        <li key={entry.category.key()}>
                            <span
                                class="legend-swatch"
                                style={format!("background: {}", css_color(color_for(index)))}
                            ></span>
                            {format!("{}: {}", entry.category.label(), format_shekels(entry.total))}
                        </li>
                    })}
                </ul>
            </div>
        }
    }
}

impl CategoryChart {
    fn draw_chart(&self, categories: &[CategoryTotal]) {
        let canvas = match self.canvas_ref.cast::<HtmlCanvasElement>() {
            Some(canvas) => canvas,
            None => return,
        };

        // resizing clears whatever was drawn before
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);

        let backend = match CanvasBackend::with_canvas_object(canvas) {
            Some(backend) => backend,
            None => return,
        };

        let root = backend.into_drawing_area();

        let center = ((CANVAS_SIZE / 2) as i32, (CANVAS_SIZE / 2) as i32);
        let totals: Vec<f64> = categories.iter().map(|entry| entry.total).collect();

        for (index, slice) in slice_angles(&totals).into_iter().enumerate() {
            if slice.1 <= slice.0 {
                continue;
            }
            let outline = slice_polygon(center, RADIUS, slice);
            if let Err(e) = root.draw(&Polygon::new(outline, color_for(index).filled())) {
                gloo::console::error!(format!("Failed to draw chart slice: {:?}", e));
                return;
            }
        }

        let _ = root.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_angles_cover_full_circle() {
        let slices = slice_angles(&[50.0, 25.0, 25.0]);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0], (0.0, PI));
        assert!((slices[2].1 - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_slice_angles_empty_when_nothing_spent() {
        assert!(slice_angles(&[]).is_empty());
        assert!(slice_angles(&[0.0, 0.0]).is_empty());
    }

    #[test]
    fn test_slice_polygon_starts_at_centre() {
        let points = slice_polygon((150, 150), 100.0, (0.0, PI / 2.0));

        assert_eq!(points[0], (150, 150));
        assert_eq!(points[1], (150, 50));
        assert_eq!(*points.last().unwrap(), (250, 150));
    }
}
