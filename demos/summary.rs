use miette::IntoDiagnostic;
use temp_heatmap::{month_name, Heatmap, HeatmapConfig};

fn main() -> miette::Result<()> {
    let file = std::env::args().nth(1).expect("Missing filename");
    println!("opening {file}");

    let heatmap = Heatmap::from_path(&file, HeatmapConfig::default())?;
    let unit = heatmap.config().unit;

    for rejected in heatmap.rejected() {
        eprintln!("skipped: {rejected}");
    }
    println!(
        "{} cells over {:?}, {} days with a missing temperature",
        heatmap.cells().len(),
        heatmap.years(),
        heatmap.missing_values()
    );
    let range = heatmap.range();
    println!(
        "Range: {} to {}",
        unit.label(range.min),
        unit.label(range.max)
    );

    let json: Vec<_> = heatmap
        .cells()
        .iter()
        .map(|cell| {
            println!(
                "{} {:>9}: max {:>14}, min {:>14}, {} days",
                cell.year,
                month_name(cell.month),
                unit.label(cell.max),
                unit.label(cell.min),
                cell.daily.len()
            );
            serde_json::json!({
                "year": cell.year,
                "month": cell.month,
                "max": cell.max,
                "min": cell.min,
            })
        })
        .collect();

    if std::env::args().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
    }

    Ok(())
}
