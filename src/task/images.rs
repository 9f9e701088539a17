//! Images task: optimize `app/images` into `dist/images`.
//!
//! PNG and JPEG files are re-encoded (max PNG compression, configurable
//! JPEG quality), SVG markup is minified, GIF and anything unrecognized
//! is copied verbatim. Relative paths are preserved.
//!
//! No source image is ever dropped: a file that fails to optimize is
//! logged and copied as-is. Outputs that are already up to date are
//! skipped when caching is enabled.

use std::{fs, path::Path};

use anyhow::Result;
use image::{
    ImageReader,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
};
use rayon::prelude::*;

use crate::{
    config::PipelineConfig,
    debug, freshness, log,
    transform::svg::minify_svg,
    utils::walk::{files_recursive, has_ext},
};

use super::Report;

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let src_dir = config.paths.images_dir();
    let out_dir = config.paths.images_out_dir();

    let sources = files_recursive(&src_dir);
    if sources.is_empty() {
        return Ok(Report::default());
    }
    fs::create_dir_all(&out_dir)?;

    let report = sources
        .par_iter()
        .map(|source| -> Result<Report> {
            let rel = source.strip_prefix(&src_dir).unwrap_or(source);
            let dest = out_dir.join(rel);

            if config.images.cache && fresh(source, &dest) {
                debug!("images"; "skip {}", rel.display());
                return Ok(Report {
                    skipped: 1,
                    ..Report::default()
                });
            }

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut report = Report::default();
            match optimize(config, source, &dest) {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    // Keep the image: copy verbatim on optimizer failure
                    log!("error"; "{}: {err:#}, copying verbatim", rel.display());
                    fs::copy(source, &dest)?;
                    report.failed += 1;
                }
            }
            freshness::mark_processed(source);
            Ok(report)
        })
        .try_reduce(Report::default, |a, b| Ok(a + b))?;

    log!("images"; "{} optimized, {} up to date", report.processed, report.skipped);
    Ok(report)
}

/// Output exists and the source changed neither on disk nor in session.
fn fresh(source: &Path, dest: &Path) -> bool {
    dest.exists()
        && (freshness::is_up_to_date(source, dest) || !freshness::is_source_dirty(source))
}

fn optimize(config: &PipelineConfig, source: &Path, dest: &Path) -> Result<()> {
    if has_ext(source, &["png"]) {
        let img = ImageReader::open(source)?.decode()?;
        let writer = io_writer(dest)?;
        let encoder =
            PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
        img.write_with_encoder(encoder)?;
    } else if has_ext(source, &["jpg", "jpeg"]) {
        let img = ImageReader::open(source)?.decode()?;
        let writer = io_writer(dest)?;
        let encoder = JpegEncoder::new_with_quality(writer, config.images.jpeg_quality);
        img.write_with_encoder(encoder)?;
    } else if has_ext(source, &["svg"]) {
        let markup = fs::read_to_string(source)?;
        fs::write(dest, minify_svg(&markup, config.images.keep_svg_ids)?)?;
    } else {
        // GIF and unknown formats pass through untouched
        fs::copy(source, dest)?;
    }
    Ok(())
}

fn io_writer(dest: &Path) -> Result<std::io::BufWriter<fs::File>> {
    Ok(std::io::BufWriter::new(fs::File::create(dest)?))
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.root = dir.path().to_path_buf();
        config.paths.normalize(dir.path());
        fs::create_dir_all(dir.path().join("app/images")).unwrap();
        config
    }

    fn write_png(path: &Path) {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_png_reencoded() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        write_png(&dir.path().join("app/images/dot.png"));

        let report = run(&config).unwrap();
        assert_eq!(report.processed, 1);

        let out = dir.path().join("dist/images/dot.png");
        assert!(out.exists());
        image::open(&out).unwrap();
    }

    #[test]
    fn test_svg_minified() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(
            dir.path().join("app/images/icon.svg"),
            "<svg>\n  <!-- c -->\n  <g id=\"a\"/>\n</svg>",
        )
        .unwrap();

        run(&config).unwrap();
        let out = fs::read_to_string(dir.path().join("dist/images/icon.svg")).unwrap();
        assert_eq!(out, "<svg><g id=\"a\"/></svg>");
    }

    #[test]
    fn test_broken_image_copied_verbatim() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(dir.path().join("app/images/broken.png"), b"not a png").unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(
            fs::read(dir.path().join("dist/images/broken.png")).unwrap(),
            b"not a png"
        );
    }

    #[test]
    fn test_cache_skips_second_run() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        write_png(&dir.path().join("app/images/dot.png"));

        assert_eq!(run(&config).unwrap().processed, 1);
        let second = run(&config).unwrap();
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 1);
    }

    #[test]
    fn test_cache_disabled_reprocesses() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.images.cache = false;
        write_png(&dir.path().join("app/images/dot.png"));

        assert_eq!(run(&config).unwrap().processed, 1);
        assert_eq!(run(&config).unwrap().processed, 1);
    }

    #[test]
    fn test_nested_layout_preserved() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::create_dir_all(dir.path().join("app/images/logos")).unwrap();
        write_png(&dir.path().join("app/images/logos/brand.png"));

        run(&config).unwrap();
        assert!(dir.path().join("dist/images/logos/brand.png").exists());
    }
}
