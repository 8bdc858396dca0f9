//! SVG rendering of analysis plots.

use std::{ops::Range, path::Path};

use anyhow::Context as _;
use m2048_analysis::{
    display::DisplayConfig,
    series::{Plot, PlotStyle, Series},
    training_log::ScoreCurve,
};
use m2048_stats::histogram::Histogram;
use plotters::{prelude::*, series::DashedLineSeries};

const FIGURE_SIZE: (u32, u32) = (1024, 768);
const FONT: (&str, u32) = ("sans-serif", 20);

/// The ten colors `C0`..`C9` of the default matplotlib cycle.
const TAB10: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Parses `C0`..`C9`, `#rrggbb` or a basic color name.
fn parse_color(s: &str) -> Option<RGBColor> {
    let s = s.trim();
    if let Some(index) = s.strip_prefix('C')
        && let Ok(index) = index.parse::<usize>()
    {
        return TAB10.get(index).copied();
    }
    if let Some(hex) = s.strip_prefix('#')
        && hex.len() == 6
    {
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let color = match s.to_ascii_lowercase().as_str() {
        "black" | "k" => BLACK,
        "white" | "w" => WHITE,
        "red" | "r" => TAB10[3],
        "blue" | "b" => TAB10[0],
        "green" | "g" => TAB10[2],
        "orange" => TAB10[1],
        "purple" => TAB10[4],
        "brown" => TAB10[5],
        "pink" => TAB10[6],
        "gray" | "grey" => TAB10[7],
        "olive" => TAB10[8],
        "cyan" | "c" => TAB10[9],
        "magenta" | "m" => MAGENTA,
        "yellow" | "y" => YELLOW,
        _ => return None,
    };
    Some(color)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineDash {
    Solid,
    /// Dash length and gap in pixels.
    Dashed(u32, u32),
}

impl LineDash {
    fn parse(s: &str) -> Self {
        match s.trim() {
            "dashed" | "--" => Self::Dashed(8, 6),
            "dotted" | ":" => Self::Dashed(2, 4),
            "dashdot" | "-." => Self::Dashed(12, 4),
            "solid" | "-" => Self::Solid,
            other => {
                log::warn!("unknown linestyle '{other}', drawing solid");
                Self::Solid
            }
        }
    }
}

#[derive(Debug, Clone)]
struct SeriesLook {
    label: String,
    color: RGBColor,
    dash: LineDash,
}

fn look_of(index: usize, name: &str, display: Option<&DisplayConfig>) -> SeriesLook {
    let default_color = TAB10[index % TAB10.len()];
    let Some(display) = display else {
        return SeriesLook {
            label: name.to_owned(),
            color: default_color,
            dash: LineDash::Solid,
        };
    };
    let entry = display.get(name);
    let color = entry
        .and_then(|e| e.color.as_deref())
        .and_then(|c| {
            let color = parse_color(c);
            if color.is_none() {
                log::warn!("{name}: unknown color '{c}', using the default cycle");
            }
            color
        })
        .unwrap_or(default_color);
    SeriesLook {
        label: display.label_for(name).to_owned(),
        color,
        dash: entry.map_or(LineDash::Solid, |e| LineDash::parse(&e.linestyle)),
    }
}

fn padded(range: Range<f64>) -> Range<f64> {
    if !range.start.is_finite() || !range.end.is_finite() {
        return 0.0..1.0;
    }
    let span = range.end - range.start;
    if span <= 0.0 {
        return (range.start - 0.5)..(range.end + 0.5);
    }
    (range.start - span * 0.05)..(range.end + span * 0.05)
}

fn bounds<I>(points: I) -> (Range<f64>, Range<f64>)
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let init = (
        f64::INFINITY..f64::NEG_INFINITY,
        f64::INFINITY..f64::NEG_INFINITY,
    );
    let (x, y) = points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(init, |(x, y), (px, py)| {
            (
                x.start.min(px)..x.end.max(px),
                y.start.min(py)..y.end.max(py),
            )
        });
    (padded(x), padded(y))
}

fn series_points(series: &Series) -> Vec<(f64, f64)> {
    series.points.iter().map(|p| (p.x, p.y)).collect()
}

/// Renders a line or scatter plot to an SVG file.
///
/// Series labels, colors and line styles are looked up in `display` when given.
pub fn render_plot(plot: &Plot, display: Option<&DisplayConfig>, path: &Path) -> anyhow::Result<()> {
    let (x_range, y_range) = bounds(
        plot.series
            .iter()
            .chain(&plot.lines)
            .flat_map(|s| s.points.iter().map(|p| (p.x, p.y))),
    );
    let y_range = if plot.zero_baseline {
        y_range.start.min(0.0)..y_range.end.max(0.0)
    } else {
        y_range
    };

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart
        .configure_mesh()
        .x_desc(plot.x_label.as_str())
        .y_desc(plot.y_label.as_str())
        .label_style(FONT)
        .draw()?;

    for (i, series) in plot.series.iter().enumerate() {
        let look = look_of(i, &series.name, display);
        let color = look.color;
        let points = series_points(series);
        let anno = match (plot.style, look.dash) {
            (PlotStyle::Scatter, _) => chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 2, color.mix(0.6).filled())),
            )?,
            (PlotStyle::Line, LineDash::Solid) => {
                chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?
            }
            (PlotStyle::Line, LineDash::Dashed(size, spacing)) => chart.draw_series(
                DashedLineSeries::new(points, size, spacing, color.stroke_width(2)),
            )?,
        };
        anno.label(look.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    for (i, line) in plot.lines.iter().enumerate() {
        let color = if line.name == "y = x" {
            BLACK
        } else {
            TAB10[i % TAB10.len()]
        };
        chart
            .draw_series(DashedLineSeries::new(
                series_points(line),
                8,
                6,
                color.stroke_width(1),
            ))?
            .label(line.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if plot.zero_baseline {
        chart.draw_series(DashedLineSeries::new(
            [(x_range.start, 0.0), (x_range.end, 0.0)],
            4,
            4,
            BLACK.mix(0.6).stroke_width(1),
        ))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(FONT)
        .draw()?;
    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Renders a score histogram as adjacent bars.
#[expect(clippy::cast_precision_loss)]
pub fn render_histogram(histogram: &Histogram, title: &str, path: &Path) -> anyhow::Result<()> {
    let (x_range, y_range) = bounds(
        histogram
            .bins
            .iter()
            .flat_map(|b| [(b.range.start, 0.0), (b.range.end, b.count as f64)]),
    );

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, FONT)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0.0..y_range.end)?;
    chart
        .configure_mesh()
        .x_desc("score")
        .y_desc("games")
        .label_style(FONT)
        .draw()?;
    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
            TAB10[0].mix(0.8).filled(),
        )
    }))?;
    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Renders mean curves with a shaded band of one standard deviation.
#[expect(clippy::cast_precision_loss)]
pub fn render_score_curves(
    curves: &[&ScoreCurve],
    x_label: &str,
    y_label: &str,
    path: &Path,
) -> anyhow::Result<()> {
    let (x_range, y_range) = bounds(curves.iter().flat_map(|c| {
        c.points.iter().flat_map(|(x, s)| {
            let x = *x as f64;
            [(x, s.mean - s.std_dev), (x, s.mean + s.std_dev)]
        })
    }));

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(FONT)
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let color = TAB10[i % TAB10.len()];
        let upper = curve
            .points
            .iter()
            .map(|(x, s)| (*x as f64, s.mean + s.std_dev));
        let lower = curve
            .points
            .iter()
            .rev()
            .map(|(x, s)| (*x as f64, s.mean - s.std_dev));
        chart.draw_series(std::iter::once(Polygon::new(
            upper.chain(lower).collect::<Vec<_>>(),
            color.mix(0.2),
        )))?;
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().map(|(x, s)| (*x as f64, s.mean)),
                color.stroke_width(2),
            ))?
            .label(curve.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(FONT)
        .draw()?;
    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
