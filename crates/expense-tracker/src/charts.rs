//! SVG chart rendering
//!
//! Each chart is a self-contained SVG document that pages embed inline.

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::constants;
use crate::monthly::CategoryShare;
use crate::reports::round1;
use crate::views::escape;

/// A rendered chart
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    svg: String,
}

impl Chart {
    pub fn svg(&self) -> &str {
        &self.svg
    }
}

/// Point on a circle, angle in degrees counter-clockwise from 3 o'clock
fn polar(cx: f64, cy: f64, r: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees * PI / 180.0;
    (cx + r * rad.cos(), cy - r * rad.sin())
}

fn open_svg(out: &mut String, width: u32, height: u32, label: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}" font-family="sans-serif">"#,
        w = width,
        h = height,
        label = escape(label),
    );
    let _ = write!(out, r#"<rect width="{}" height="{}" fill="white"/>"#, width, height);
}

/// Map a total onto the drawable range: NaN and negatives become 0, infinity
/// becomes `f64::MAX`
fn drawable(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, f64::MAX)
    }
}

// =============================================================================
// Pie chart (monthly category breakdown)
// =============================================================================

/// Wedge weights relative to the largest category, so summing them cannot
/// overflow. Non-positive totals weigh 0.
fn wedge_weights(categories: &[CategoryShare]) -> Vec<f64> {
    let totals: Vec<f64> = categories.iter().map(|c| drawable(c.total)).collect();
    let largest = totals.iter().copied().fold(0.0, f64::max);
    if largest <= 0.0 {
        return vec![0.0; totals.len()];
    }
    totals.into_iter().map(|t| t / largest).collect()
}

/// Category breakdown for one month.
///
/// Wedges start at 12 o'clock and run counter-clockwise in category order.
/// Categories with a non-positive total get no wedge, and percentage labels
/// give each wedge's share of the drawn disc.
pub fn pie_chart(categories: &[CategoryShare]) -> Chart {
    let size = constants::PIE_SIZE as f64;
    let (cx, cy) = (size / 2.0, size / 2.0);
    let r = size * 0.36;

    let mut svg = String::new();
    open_svg(
        &mut svg,
        constants::PIE_SIZE,
        constants::PIE_SIZE,
        "Expenses by category",
    );

    let weights = wedge_weights(categories);
    let positive: f64 = weights.iter().sum();
    if positive <= 0.0 {
        let _ = write!(
            svg,
            r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="#7f7f7f"/>"##
        );
        svg.push_str("</svg>");
        return Chart { svg };
    }

    let mut start = 90.0;
    for (i, (category, weight)) in categories.iter().zip(&weights).enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        let fraction = weight / positive;
        let sweep = fraction * 360.0;
        let end = start + sweep;
        let color = constants::PIE_PALETTE[i % constants::PIE_PALETTE.len()];
        let tooltip = format!("{}: {:.2}", category.category, category.total);

        if fraction >= 1.0 {
            let _ = write!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"><title>{}</title></circle>"#,
                escape(&tooltip)
            );
        } else {
            let (x0, y0) = polar(cx, cy, r, start);
            let (x1, y1) = polar(cx, cy, r, end);
            let large_arc = u8::from(sweep > 180.0);
            // sweep-flag 0: counter-clockwise on screen
            let _ = write!(
                svg,
                r#"<path d="M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 0 {x1:.2} {y1:.2} Z" fill="{color}"><title>{}</title></path>"#,
                escape(&tooltip)
            );
        }

        let mid = start + sweep / 2.0;
        let (lx, ly) = polar(cx, cy, r * constants::PIE_LABEL_DISTANCE, mid);
        let anchor = if lx >= cx { "start" } else { "end" };
        let _ = write!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" dominant-baseline="middle" font-size="12" fill="black">{}</text>"#,
            escape(&category.category)
        );

        let (px, py) = polar(cx, cy, r * constants::PIE_PERCENT_DISTANCE, mid);
        let _ = write!(
            svg,
            r#"<text x="{px:.2}" y="{py:.2}" text-anchor="middle" dominant-baseline="middle" font-size="12" fill="black">{:.1}%</text>"#,
            round1(fraction * 100.0)
        );

        start = end;
    }

    svg.push_str("</svg>");
    Chart { svg }
}

// =============================================================================
// Bar chart (yearly totals by month)
// =============================================================================

/// Round a raw tick step up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Decimal places needed to print multiples of `step`
fn tick_decimals(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}

/// Twelve monthly totals, one bar per month.
///
/// Negative totals are drawn as empty bars. Totals that overflowed to infinity
/// are drawn at full height.
pub fn bar_chart(year: i32, monthly_totals: &[f64; 12], currency_symbol: &str) -> Chart {
    let width = constants::BAR_WIDTH as f64;
    let height = constants::BAR_HEIGHT as f64;
    let (left, right, top, bottom) = (90.0, 20.0, 50.0, 60.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;
    let baseline = top + plot_h;

    let max = monthly_totals.iter().copied().map(drawable).fold(0.0, f64::max);
    let step = nice_step(max / constants::BAR_TICK_TARGET);
    let axis_max = if max > 0.0 {
        let rounded = (max / step).ceil() * step;
        if rounded.is_finite() { rounded } else { max }
    } else {
        step * constants::BAR_TICK_TARGET
    };
    let decimals = tick_decimals(step);
    let y_of = |value: f64| baseline - drawable(value).min(axis_max) / axis_max * plot_h;

    let mut svg = String::new();
    let title = format!("Total Expenses by Month - {}", year);
    open_svg(&mut svg, constants::BAR_WIDTH, constants::BAR_HEIGHT, &title);

    // Grid lines and y-axis tick labels
    let ticks = ((axis_max / step).round() as usize).min(constants::BAR_MAX_TICKS);
    for i in 0..=ticks {
        let value = step * i as f64;
        if value > axis_max {
            break;
        }
        let y = y_of(value);
        let _ = write!(
            svg,
            r#"<line x1="{left}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-dasharray="4 3" stroke-opacity="0.7"/>"#,
            left + plot_w,
            constants::GRID_COLOR
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{y:.2}" text-anchor="end" dominant-baseline="middle" font-size="11">{value:.decimals$}</text>"#,
            left - 6.0
        );
    }

    // Bars and month labels
    let slot = plot_w / 12.0;
    for (i, total) in monthly_totals.iter().enumerate() {
        let month = i as u32 + 1;
        let x = left + slot * i as f64 + slot * 0.1;
        let y = y_of(*total);
        let _ = write!(
            svg,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{}: {total:.2}</title></rect>"#,
            slot * 0.8,
            baseline - y,
            constants::BAR_COLOR,
            constants::month_abbreviation(month)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12">{}</text>"#,
            left + slot * (i as f64 + 0.5),
            baseline + 18.0,
            constants::month_abbreviation(month)
        );
    }

    // Axes
    let _ = write!(
        svg,
        r#"<line x1="{left}" y1="{top}" x2="{left}" y2="{baseline}" stroke="black"/><line x1="{left}" y1="{baseline}" x2="{:.2}" y2="{baseline}" stroke="black"/>"#,
        left + plot_w
    );

    // Title and axis labels
    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="30" text-anchor="middle" font-size="16">{}</text>"#,
        width / 2.0,
        escape(&title)
    );
    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="13">Month</text>"#,
        left + plot_w / 2.0,
        height - 15.0
    );
    let _ = write!(
        svg,
        r#"<text x="20" y="{:.2}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {:.2})">Total Expense ({})</text>"#,
        top + plot_h / 2.0,
        top + plot_h / 2.0,
        escape(currency_symbol)
    );

    svg.push_str("</svg>");
    Chart { svg }
}
