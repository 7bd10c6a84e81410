use piecefit::{draw_solution, ImageSource, OverlayStyle, Solver};
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <background.jpg> <sprite.jpg> [out.json] [overlay.png]",
            args[0]
        );
        std::process::exit(2);
    }

    let background = ImageSource::Path(PathBuf::from(&args[1]));
    let sprite = ImageSource::Path(PathBuf::from(&args[2]));

    let solver = Solver::new();
    let result = solver.solve_sources(&background, &sprite)?;

    println!(
        "Matched {} of {} pieces ({} candidates scored).",
        result.matches.len(),
        result.sprite_regions.len(),
        result.candidates_scored
    );
    for (m, [x, y]) in result.matches.iter().zip(result.drop_points()) {
        println!(
            "  piece {} -> ({:.1}, {:.1})  angle {:+}°  similarity {:.1}",
            m.sprite_index, x, y, m.angle, m.similarity
        );
    }

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    if let Some(overlay_path) = args.get(4) {
        let bg = background.load()?;
        draw_solution(&bg, &result, &OverlayStyle::default()).save(overlay_path)?;
        println!("Wrote {overlay_path}");
    }
    Ok(())
}
