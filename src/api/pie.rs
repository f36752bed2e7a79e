use std::f64::consts::{FRAC_PI_2, TAU};

use crate::core::{Dataset, Point, PreparedDataset, Rect, Size, apportion_percentages};
use crate::render::{FontSpec, PieWedge, TextRun};

use super::text_metrics::TextMeasurer;

const FONT_SHRINK_STEP: f64 = 1.0;
const FONT_GROW_STEP: f64 = 0.1;
const MAX_GROW_STEPS: usize = 9;

#[derive(Debug, Clone, Copy)]
pub(super) struct PieLayout {
    pub plot: Rect,
    pub edge_inset_px: f64,
    pub max_font_px: f64,
    pub fill_ratio: f64,
}

/// One wedge per visible series at `index`, accumulating clockwise from angle 0.
pub(super) fn pie_wedges(
    dataset: &Dataset,
    prepared: &PreparedDataset,
    index: usize,
    layout: PieLayout,
    measurer: &dyn TextMeasurer,
) -> Vec<PieWedge> {
    if prepared.visible().is_empty() || index >= dataset.len() {
        return Vec::new();
    }
    let percents = apportion_percentages(&prepared.column(dataset, index));
    let center = layout.plot.center();
    let radius = (layout.plot.width.min(layout.plot.height) / 2.0 - layout.edge_inset_px).max(0.0);
    let series = dataset.series();

    let mut start_angle = 0.0;
    prepared
        .visible()
        .iter()
        .zip(percents)
        .map(|(&series_index, percent)| {
            let sweep = percent as f64 / 100.0 * TAU;
            let end_angle = start_angle + sweep;
            let label = (percent > 0)
                .then(|| wedge_label(percent, center, radius, start_angle, sweep, layout, measurer))
                .flatten();
            let wedge = PieWedge {
                color: series[series_index].color,
                center,
                radius,
                start_angle,
                end_angle,
                percent,
                label,
            };
            start_angle = end_angle;
            wedge
        })
        .collect()
}

/// Largest label font whose half-diagonal fits the scaled inscribed circle.
fn wedge_label(
    percent: i64,
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    layout: PieLayout,
    measurer: &dyn TextMeasurer,
) -> Option<TextRun> {
    let half = (sweep / 2.0).min(FRAC_PI_2);
    let sin = half.sin();
    let inner_radius = radius * (1.0 - 1.0 / (1.0 + sin));
    let limit = inner_radius * layout.fill_ratio;
    let text = format!("{percent}%");
    let fits = |size_px: f64| {
        let size = measurer.measure(&text, FontSpec::semibold(size_px));
        (size.width * size.width + size.height * size.height).sqrt() / 2.0 <= limit
    };

    let mut size_px = layout.max_font_px;
    while size_px > 0.0 && !fits(size_px) {
        size_px -= FONT_SHRINK_STEP;
    }
    if size_px <= 0.0 {
        return None;
    }
    for _ in 0..MAX_GROW_STEPS {
        if !fits(size_px + FONT_GROW_STEP) {
            break;
        }
        size_px += FONT_GROW_STEP;
    }

    let font = FontSpec::semibold(size_px);
    let size: Size = measurer.measure(&text, font);
    let angle = start_angle + sweep / 2.0;
    let distance = radius - inner_radius;
    let label_center = Point::new(
        center.x + distance * angle.cos(),
        center.y + distance * angle.sin(),
    );
    Some(TextRun {
        text,
        frame: Rect::from_center(label_center, size),
        font,
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::{PieLayout, pie_wedges};
    use crate::api::text_metrics::EstimatedTextMeasurer;
    use crate::core::{ChartKind, DataPoint, Dataset, PreparedDataset, Rect, Series};
    use crate::render::Color;

    fn dataset(values: &[i64]) -> Dataset {
        let series = values
            .iter()
            .enumerate()
            .map(|(index, &y)| {
                Series::new(
                    format!("s{index}"),
                    format!("Series {index}"),
                    Color::rgb(0.2, 0.4, 0.6),
                    ChartKind::Area,
                    vec![DataPoint::new(0.0, y), DataPoint::new(86_400.0, y)],
                )
            })
            .collect();
        Dataset::new("pie", series)
            .expect("dataset")
            .with_stacked(true)
            .with_percentage(true)
    }

    fn layout() -> PieLayout {
        PieLayout {
            plot: Rect::new(0.0, 0.0, 300.0, 200.0),
            edge_inset_px: 6.0,
            max_font_px: 30.0,
            fill_ratio: 0.75,
        }
    }

    #[test]
    fn wedges_cover_full_circle_with_apportioned_percents() {
        let dataset = dataset(&[40, 35, 26]);
        let prepared = PreparedDataset::new(&dataset);
        let wedges = pie_wedges(&dataset, &prepared, 1, layout(), &EstimatedTextMeasurer::default());

        let percents: Vec<i64> = wedges.iter().map(|wedge| wedge.percent).collect();
        assert_eq!(percents, vec![39, 35, 26]);
        assert_eq!(wedges[0].start_angle, 0.0);
        assert!((wedges[2].end_angle - TAU).abs() <= 1e-9);
        assert!((wedges[0].radius - 94.0).abs() <= 1e-9);
        assert_eq!(wedges[0].center.x, 150.0);

        let label = wedges[0].label.as_ref().expect("label");
        assert_eq!(label.text, "39%");
        assert!(label.font.size_px > 0.0 && label.font.size_px < 31.0);
    }

    #[test]
    fn zero_percent_wedge_has_no_label() {
        let dataset = dataset(&[100, 0]);
        let prepared = PreparedDataset::new(&dataset);
        let wedges = pie_wedges(&dataset, &prepared, 0, layout(), &EstimatedTextMeasurer::default());
        assert_eq!(wedges.len(), 2);
        assert!(wedges[1].label.is_none());
        assert_eq!(wedges[1].start_angle, wedges[1].end_angle);
    }
}
