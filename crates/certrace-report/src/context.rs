use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::surface::PlotSurface;

/// Rendering context shared by every handler in one run.
///
/// Owns the output directory layout and the artifact namespace. Chart
/// acquisition goes through [`ReportContext::plot`], which guarantees
/// the surface is finalized or discarded on every exit path. A failing
/// draw closure writes nothing.
pub struct ReportContext {
    output_dir: PathBuf,
    images_dir: PathBuf,
    reserved_stems: HashSet<String>,
}

impl ReportContext {
    pub const IMAGES_DIR: &'static str = "images";

    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        let images_dir = output_dir.join(Self::IMAGES_DIR);
        fs::create_dir_all(&images_dir)
            .with_context(|| format!("creating output directory {}", images_dir.display()))?;
        Ok(Self {
            output_dir,
            images_dir,
            reserved_stems: HashSet::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Claim a free artifact stem. A collision with an earlier artifact
    /// gets a numeric suffix, incremented until the name is free; an
    /// existing artifact is never overwritten.
    pub fn reserve_image_stem(&mut self, stem: &str) -> String {
        let mut candidate = stem.to_string();
        let mut suffix = 0;
        while self.reserved_stems.contains(&candidate) {
            suffix += 1;
            candidate = format!("{stem}_{suffix}");
        }
        self.reserved_stems.insert(candidate.clone());
        candidate
    }

    /// Scoped chart rendering: build a surface, hand it to `draw`, and
    /// write `images/<stem>.svg` only if the closure succeeds. Returns
    /// the artifact path for an `Item::Image`.
    pub fn plot<F>(&mut self, stem: &str, draw: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut PlotSurface) -> Result<()>,
    {
        let mut surface = PlotSurface::new();
        draw(&mut surface)?;

        let stem = self.reserve_image_stem(stem);
        let path = self.images_dir.join(format!("{stem}.svg"));
        fs::write(&path, surface.into_svg())
            .with_context(|| format!("writing chart artifact {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_stem_reservation_disambiguates() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        assert_eq!(ctx.reserve_image_stem("affinity"), "affinity");
        assert_eq!(ctx.reserve_image_stem("affinity"), "affinity_1");
        assert_eq!(ctx.reserve_image_stem("affinity"), "affinity_2");
        assert_eq!(ctx.reserve_image_stem("other"), "other");
    }

    #[test]
    fn test_plot_writes_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let path = ctx
            .plot("chart", |surface| {
                surface.set_title("ok");
                Ok(())
            })
            .unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "svg");
    }

    #[test]
    fn test_plot_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let result = ctx.plot("chart", |_| Err(anyhow!("bad data shape")));
        assert!(result.is_err());

        let entries: Vec<_> = fs::read_dir(ctx.images_dir()).unwrap().collect();
        assert!(entries.is_empty());

        // the failed attempt did not burn the stem
        let path = ctx.plot("chart", |_| Ok(())).unwrap();
        assert!(path.ends_with("images/chart.svg"));
    }
}
