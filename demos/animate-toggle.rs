use std::time::Duration;

use miette::IntoDiagnostic;
use temp_heatmap::{Heatmap, HeatmapConfig};

const FRAME: Duration = Duration::from_millis(50);

fn main() -> miette::Result<()> {
    env_logger::init();

    let input = std::env::args().nth(1).expect("Missing filename");
    let heatmap = Heatmap::from_path(&input, HeatmapConfig::default())?;
    let mut view = heatmap.view();

    // toggle to min, then back to max halfway through
    let halfway = heatmap.config().transition() / 2;
    view.toggle(&heatmap, Duration::ZERO);

    let mut now = Duration::ZERO;
    let mut frame = 0;
    let mut toggled_back = false;
    while view.is_animating(now) || !toggled_back {
        if !toggled_back && now >= halfway {
            view.toggle(&heatmap, now);
            toggled_back = true;
        }
        let output = format!("{input}.frame-{frame:03}.svg");
        std::fs::write(&output, heatmap.render_svg(&view, now)?).into_diagnostic()?;
        println!("Wrote {output} ({:?}, {:?})", now, view.mode());
        now += FRAME;
        frame += 1;
    }
    view.settle(now);

    Ok(())
}
