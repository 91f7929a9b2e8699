use std::path::{Path, PathBuf};

use pdf::{ParsedDocument, RenderMode};
use unredact_core::{DocumentReconstruction, ReconstructOptions};

use crate::prelude::{println, *};

/// Name of the directory created next to the input when no output is given.
const OUTPUT_DIR: &str = "unredacted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Original page on the left, recovered text on the right
    #[value(alias = "side_by_side")]
    SideBySide,
    /// Recovered text drawn in white over the original page
    #[value(alias = "overlay_white")]
    OverlayWhite,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::SideBySide => RenderMode::SideBySide,
            Mode::OverlayWhite => RenderMode::OverlayWhite,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RevealOptions {
    /// Path to the redacted PDF
    #[clap(env = "UNREDACT_INPUT")]
    input: PathBuf,

    /// Output PDF path (defaults to <input dir>/unredacted/<stem>_<mode>.pdf)
    #[arg(short, long, env = "UNREDACT_OUTPUT")]
    output: Option<PathBuf>,

    /// How the recovered text is presented
    #[arg(long, value_enum, env = "UNREDACT_MODE", default_value = "side-by-side")]
    mode: Mode,

    /// Line grouping tolerance in points. Try 1.5 to 4.0
    #[arg(long, env = "UNREDACT_LINE_TOL", default_value = "2.0")]
    line_tol: f64,

    /// Points per inserted space (bigger means fewer spaces)
    #[arg(long, env = "UNREDACT_SPACE_UNIT", default_value = "3.0")]
    space_unit: f64,

    /// Minimum spaces between words when a gap exists
    #[arg(long, env = "UNREDACT_MIN_SPACES", default_value = "1")]
    min_spaces: usize,

    /// Draw recovered text in the closest standard font to the original
    #[arg(long, env = "UNREDACT_MATCH_FONT")]
    match_font: bool,

    /// Display recovery statistics
    #[arg(long, env = "UNREDACT_STATS")]
    stats: bool,

    /// Write recovery statistics to a JSON file
    #[arg(long, value_name = "FILE", env = "UNREDACT_STATS_JSON")]
    stats_json: Option<PathBuf>,

    /// Process pages one at a time instead of in parallel
    #[arg(long, env = "UNREDACT_SEQUENTIAL")]
    sequential: bool,
}

impl RevealOptions {
    fn reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions {
            line_tol: self.line_tol,
            space_unit_pts: self.space_unit,
            min_spaces: self.min_spaces,
            match_font: self.match_font,
            parallel: !self.sequential,
            ..Default::default()
        }
    }
}

/// `<input dir>/unredacted/<stem>_<mode>.pdf`
pub fn default_output_path(input: &Path, mode: RenderMode) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| Error::InvalidInput(input.to_path_buf()))?;
    let dir = input.parent().unwrap_or(Path::new("")).join(OUTPUT_DIR);

    Ok(dir.join(f!("{}_{}.pdf", stem.to_string_lossy(), mode)))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| f!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, bytes).wrap_err_with(|| f!("Failed to write {}", path.display()))
}

fn write_stats(path: &Path, reconstruction: &DocumentReconstruction) -> Result<()> {
    let json = reconstruction.stats.to_json()?;
    std::fs::write(path, json).wrap_err_with(|| f!("Failed to write {}", path.display()))
}

/// Reconstruct the input and write the rendered PDF. Returns where it went.
pub fn reveal(options: &RevealOptions) -> Result<(PathBuf, DocumentReconstruction)> {
    if !options.input.exists() {
        return Err(Error::InputNotFound(options.input.clone()).into());
    }

    let mode = RenderMode::from(options.mode);
    let output = match &options.output {
        Some(path) => path.clone(),
        None => default_output_path(&options.input, mode)?,
    };

    let doc = ParsedDocument::load(&options.input).map_err(Error::from)?;
    let reconstruction = doc.reconstruct(&options.reconstruct_options());
    let bytes = doc.render(mode, &reconstruction).map_err(Error::from)?;

    write_output(&output, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), output.display());

    Ok((output, reconstruction))
}

pub fn run(options: RevealOptions, global: crate::Global) -> Result<()> {
    let (output, reconstruction) = reveal(&options)?;
    println!("Wrote: {}", output.display());

    if global.verbose {
        crate::report::print_pages(&reconstruction);
    }

    if options.stats {
        println!("{}", reconstruction.stats.render_report());
    }

    if let Some(path) = &options.stats_json {
        write_stats(path, &reconstruction)?;
        println!("Stats written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, clap::Parser)]
    struct TestApp {
        #[clap(flatten)]
        options: RevealOptions,
    }

    fn parse(args: &[&str]) -> RevealOptions {
        let mut argv = vec!["unredact"];
        argv.extend_from_slice(args);
        TestApp::try_parse_from(argv).unwrap().options
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("files/report.pdf"), RenderMode::SideBySide).unwrap();
        assert_eq!(path, PathBuf::from("files/unredacted/report_side_by_side.pdf"));

        let path = default_output_path(Path::new("report.pdf"), RenderMode::OverlayWhite).unwrap();
        assert_eq!(path, PathBuf::from("unredacted/report_overlay_white.pdf"));
    }

    #[test]
    fn test_default_output_path_without_file_name() {
        assert!(default_output_path(Path::new("/"), RenderMode::SideBySide).is_err());
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse(&["doc.pdf"]);
        assert_eq!(options.mode, Mode::SideBySide);
        assert!(!options.stats);
        assert!(options.output.is_none());

        let reconstruct = options.reconstruct_options();
        assert_eq!(reconstruct.line_tol, 2.0);
        assert_eq!(reconstruct.space_unit_pts, 3.0);
        assert_eq!(reconstruct.min_spaces, 1);
        assert!(!reconstruct.match_font);
        assert!(reconstruct.parallel);
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse(&[
            "doc.pdf",
            "-o",
            "out.pdf",
            "--mode",
            "overlay-white",
            "--line-tol",
            "3.5",
            "--space-unit",
            "4",
            "--min-spaces",
            "0",
            "--match-font",
            "--stats",
            "--stats-json",
            "stats.json",
            "--sequential",
        ]);
        assert_eq!(options.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(options.mode, Mode::OverlayWhite);
        assert_eq!(options.stats_json, Some(PathBuf::from("stats.json")));

        let reconstruct = options.reconstruct_options();
        assert_eq!(reconstruct.line_tol, 3.5);
        assert_eq!(reconstruct.space_unit_pts, 4.0);
        assert_eq!(reconstruct.min_spaces, 0);
        assert!(reconstruct.match_font);
        assert!(!reconstruct.parallel);
    }

    #[test]
    fn test_mode_accepts_underscore_names() {
        assert_eq!(parse(&["doc.pdf", "--mode", "overlay_white"]).mode, Mode::OverlayWhite);
        assert_eq!(parse(&["doc.pdf", "--mode", "side_by_side"]).mode, Mode::SideBySide);
        assert_eq!(RenderMode::from(Mode::OverlayWhite), RenderMode::OverlayWhite);
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        let options = parse(&[missing.to_str().unwrap()]);

        let err = reveal(&options).unwrap_err();
        assert_eq!(err.to_string(), f!("Input file not found: {}", missing.display()));
    }

    #[test]
    fn test_garbage_input_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();

        let options = parse(&[input.to_str().unwrap()]);
        assert!(reveal(&options).is_err());
        assert!(!dir.path().join(OUTPUT_DIR).join("broken_side_by_side.pdf").exists());
    }

    #[test]
    fn test_write_output_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.pdf");
        write_output(&path, b"%PDF-1.5").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }

    fn redacted_pdf() -> Vec<u8> {
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = b"BT /F1 10 Tf 110 678 Td (secret) Tj ET 0 0 0 rg 100 672 100 20 re f".to_vec();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_run_writes_default_output_and_stats_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("memo.pdf");
        std::fs::write(&input, redacted_pdf()).unwrap();
        let stats_path = dir.path().join("stats.json");

        let options = parse(&[
            input.to_str().unwrap(),
            "--mode",
            "overlay-white",
            "--stats",
            "--stats-json",
            stats_path.to_str().unwrap(),
        ]);
        run(options, crate::Global { verbose: true }).unwrap();

        let output = dir.path().join(OUTPUT_DIR).join("memo_overlay_white.pdf");
        assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF-"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
        assert_eq!(json["redaction_boxes_found"], 1);
        assert_eq!(json["words_under_redactions"], 1);
        assert_eq!(json["chars_under_redactions"], 6);
        assert_eq!(json["total_words_extracted"], 1);
        assert_eq!(json["recovery_rate"], 100.0);
    }

    #[test]
    fn test_reveal_honours_explicit_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("memo.pdf");
        std::fs::write(&input, redacted_pdf()).unwrap();
        let target = dir.path().join("out").join("revealed.pdf");

        let options = parse(&[input.to_str().unwrap(), "-o", target.to_str().unwrap()]);
        let (output, reconstruction) = reveal(&options).unwrap();

        assert_eq!(output, target);
        assert!(target.exists());
        assert!(!dir.path().join(OUTPUT_DIR).exists());
        assert_eq!(reconstruction.pages[0].lines[0].text, "secret");
    }
}
