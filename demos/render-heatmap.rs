use std::time::Duration;

use miette::IntoDiagnostic;
use temp_heatmap::{Heatmap, HeatmapConfig, Point};

fn main() -> miette::Result<()> {
    env_logger::init();

    let input = std::env::args().nth(1).expect("Missing filename");
    let config = match std::env::args().nth(2) {
        Some(path) => HeatmapConfig::from_path(path)?,
        None => HeatmapConfig::default(),
    };
    println!("opening {input}");

    let heatmap = Heatmap::from_path(&input, config)?;
    let mut view = heatmap.view();

    let output = format!("{input}.svg");
    std::fs::write(&output, heatmap.render_svg(&view, Duration::ZERO)?).into_diagnostic()?;
    println!("Wrote {output}");

    // hover the most recent July, or whatever cell comes last
    let layout = heatmap.layout();
    if let Some(cell) = heatmap
        .cells()
        .iter()
        .rev()
        .find(|cell| cell.month == 7)
        .or_else(|| heatmap.cells().last())
    {
        let pointer = Point::new(
            layout.x.center(&cell.year).unwrap_or_default(),
            layout.y.center(&cell.month).unwrap_or_default(),
        );
        view.hover(&heatmap, pointer, layout.width);
        let output = format!("{input}.hover.svg");
        std::fs::write(&output, heatmap.render_svg(&view, Duration::ZERO)?).into_diagnostic()?;
        println!("Wrote {output}");
        view.pointer_out();
    }

    view.toggle(&heatmap, Duration::ZERO);
    let settled = heatmap.config().transition();
    let output = format!("{input}.min.svg");
    std::fs::write(&output, heatmap.render_svg(&view, settled)?).into_diagnostic()?;
    println!("Wrote {output} ({})", view.toggle_label());

    Ok(())
}
