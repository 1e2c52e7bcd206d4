use std::{fmt::Write, time::Duration};

use temp_heatmap::{
    color::MISSING, interaction::tooltip_position, Heatmap, HeatmapConfig, Mode, Point, View,
};
use time::{Date, Duration as Days, Month};

/// One row per day of every year in `years`, with a seasonal max/min.
fn daily_csv(years: std::ops::RangeInclusive<i32>) -> String {
    let mut csv = String::from("date,max_temperature,min_temperature\n");
    for year in years {
        let mut date = Date::from_calendar_date(year, Month::January, 1).unwrap();
        while date.year() == year {
            let season = f64::from(date.ordinal()) / 366.0 * std::f64::consts::TAU;
            let max = 20.0 - 12.0 * season.cos() + f64::from(year % 7);
            let min = max - 9.0;
            writeln!(csv, "{date},{max:.1},{min:.1}").unwrap();
            date += Days::days(1);
        }
    }
    csv
}

fn heatmap(csv: &str) -> Heatmap {
    Heatmap::from_reader(csv.as_bytes(), HeatmapConfig::default()).unwrap()
}

#[test]
fn three_full_years_make_36_cells() {
    let heatmap = heatmap(&daily_csv(2018..=2020));
    assert_eq!(heatmap.years(), &[2018, 2019, 2020]);
    assert_eq!(heatmap.cells().len(), 36);
    let february_2020 = heatmap.cell(2020, 2).unwrap();
    assert_eq!(february_2020.daily.len(), 29);
}

#[test]
fn fifteen_years_keep_the_last_ten() {
    let heatmap = heatmap(&daily_csv(2005..=2019));
    assert_eq!(heatmap.years(), (2010..=2019).collect::<Vec<_>>().as_slice());
    assert_eq!(heatmap.cells().len(), 120);
    assert!(heatmap.cells().iter().all(|cell| cell.year >= 2010));
    assert!(heatmap.cell(2009, 6).is_none());
}

#[test]
fn window_size_follows_the_config() {
    let config = HeatmapConfig {
        year_window: 2,
        ..HeatmapConfig::default()
    };
    let heatmap = Heatmap::from_reader(daily_csv(2015..=2019).as_bytes(), config).unwrap();
    assert_eq!(heatmap.years(), &[2018, 2019]);
}

#[test]
fn cells_agree_with_their_days() {
    let heatmap = heatmap(&daily_csv(2016..=2017));
    let range = heatmap.range();
    for cell in heatmap.cells() {
        let max = cell.daily.iter().map(|d| d.max).fold(f64::MIN, f64::max);
        let min = cell.daily.iter().map(|d| d.min).fold(f64::MAX, f64::min);
        assert_eq!(cell.max, max);
        assert_eq!(cell.min, min);
        assert!(cell.daily.windows(2).all(|pair| pair[0].day < pair[1].day));
        assert!(range.min <= cell.min && cell.min <= cell.max && cell.max <= range.max);
    }
}

#[test]
fn input_order_does_not_matter() {
    let csv = daily_csv(2019..=2019);
    let mut lines: Vec<&str> = csv.lines().collect();
    let header = lines.remove(0);
    lines.reverse();
    let shuffled = format!("{header}\n{}\n", lines.join("\n"));

    let ordered = heatmap(&csv);
    let reversed = heatmap(&shuffled);
    assert_eq!(ordered.cells(), reversed.cells());
}

#[test]
fn not_a_number_does_not_crash() {
    let csv = "date,max_temperature,min_temperature
2021-03-01,N/A,2
2021-03-02,11,N/A
2021-04-01,N/A,N/A
";
    let heatmap = heatmap(csv);
    assert_eq!(heatmap.missing_values(), 3);

    let march = heatmap.cell(2021, 3).unwrap();
    assert_eq!(march.max, 11.0);
    assert_eq!(march.min, 2.0);
    assert!(march.daily[0].max.is_nan());

    let april = heatmap.cell(2021, 4).unwrap();
    assert!(april.max.is_nan() && april.min.is_nan());

    let view = heatmap.view();
    let april_index = heatmap.cells().iter().position(|c| c.month == 4).unwrap();
    assert_eq!(view.fill_at(april_index, Duration::ZERO), MISSING);
    assert!(heatmap.render_svg(&view, Duration::ZERO).is_ok());
}

#[test]
fn tooltip_never_leaves_the_viewport() {
    let heatmap = heatmap(&daily_csv(2019..=2020));
    let mut view = heatmap.view();
    let layout = heatmap.layout();
    let viewport = layout.width;
    let tooltip = heatmap.config().tooltip;

    // rightmost column, close to the edge of a viewport as wide as the chart
    let pointer = Point::new(
        layout.x.center(&2020).unwrap(),
        layout.y.center(&1).unwrap(),
    );
    view.hover(&heatmap, pointer, viewport).unwrap();
    let shown = view.tooltip().unwrap();
    assert!(shown.x < pointer.x);
    assert!(shown.x + tooltip.width <= viewport);
    assert_eq!(
        (shown.x, shown.y),
        tooltip_position(pointer, viewport, &tooltip)
    );

    let left = Point::new(
        layout.x.center(&2019).unwrap(),
        layout.y.center(&1).unwrap(),
    );
    view.hover(&heatmap, left, 2000.0).unwrap();
    assert!(view.tooltip().unwrap().x > left.x);

    // too narrow for either side: pinned to the left edge
    view.hover(&heatmap, left, left.x + 10.0).unwrap();
    assert_eq!(view.tooltip().unwrap().x, 0.0);
}

#[test]
fn toggling_twice_restores_the_view() {
    let heatmap = heatmap(&daily_csv(2017..=2020));
    let mut view = heatmap.view();
    let scale = *view.scale();
    let legend = view.legend().clone();

    view.toggle(&heatmap, Duration::ZERO);
    assert_eq!(view.mode(), Mode::Min);
    assert_ne!(*view.scale(), scale);
    assert!(view.scale().hot < scale.hot);
    assert_eq!(view.scale().cold, scale.cold);

    view.toggle(&heatmap, Duration::from_millis(100));
    assert_eq!(view.mode(), Mode::Max);
    assert_eq!(*view.scale(), scale);
    assert_eq!(*view.legend(), legend);

    let settled = Duration::from_secs(1);
    let fresh = View::new(&heatmap);
    for i in 0..heatmap.cells().len() {
        assert_eq!(view.fill_at(i, settled), fresh.fill_at(i, Duration::ZERO));
    }
}

#[test]
fn sparkline_scale_ignores_the_mode() {
    let heatmap = heatmap(&daily_csv(2019..=2020));
    let before = heatmap.layout().spark_y;
    let mut view = heatmap.view();
    view.toggle(&heatmap, Duration::ZERO);
    assert_eq!(heatmap.layout().spark_y, before);
    assert_eq!(before.domain, (heatmap.range().min, heatmap.range().max));
}

#[test]
fn missing_file_is_a_load_error() {
    let err = Heatmap::from_path("does-not-exist.csv", HeatmapConfig::default()).unwrap_err();
    assert!(matches!(err, temp_heatmap::LoadError::Io { .. }));
}
