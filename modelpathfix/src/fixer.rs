//! Rewrite orchestration over model buffers and files.
//!
//! [`ModelFixer`] drives the locator, resolver and encoder over one model
//! buffer at a time. [`run`] is the batch entry point: discover, index, then
//! fix every model sequentially in discovery order.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::config::FixerConfig;
use crate::discovery::FileDiscovery;
use crate::encoding::decode_wide;
use crate::error::{FixError, FixResult, RewriteError};
use crate::locator::{PathLocator, PathOccurrence, ScanHit};
use crate::relative::{encode_replacement, relative_texture_path};
use crate::report::{ModelReport, RewriteCounters, RunReport};
use crate::resolver::{TextureResolver, LEGACY_SEPARATOR};
use crate::texture_index::TextureIndex;

/// Rewrites embedded texture paths in model files.
#[derive(Debug, Clone)]
pub struct ModelFixer<'a> {
    resolver: TextureResolver<'a>,
    locator: PathLocator,
    dry_run: bool,
}

impl<'a> ModelFixer<'a> {
    /// Create a fixer resolving against `index`.
    pub fn new(index: &'a TextureIndex, config: &FixerConfig) -> Self {
        Self {
            resolver: TextureResolver::new(index),
            locator: PathLocator::new(config.max_path_chars),
            dry_run: config.dry_run,
        }
    }

    /// Rewrite every resolvable path in `buffer`.
    ///
    /// `model` must be the absolute path the buffer was read from; replacement
    /// paths are relative to its directory. The buffer length never changes.
    /// Failed occurrences are counted in `counters` and left untouched.
    pub fn fix_buffer(
        &self,
        model: &Path,
        buffer: &mut [u8],
        counters: &mut RewriteCounters,
    ) -> ModelReport {
        let mut report = ModelReport::new(model);
        let mut pos = 0;

        while let Some(hit) = self.locator.find_next(buffer, pos) {
            pos = hit.start() + 1;
            report.occurrences += 1;
            debug!(index = hit.start(), "Found absolute path");

            let result = match hit {
                ScanHit::Path(occurrence) => self.rewrite_occurrence(model, buffer, occurrence),
                ScanHit::Unterminated { start } => {
                    Err(RewriteError::MissingEndMarker { offset: start })
                }
            };

            match result {
                Ok(()) => report.rewritten += 1,
                Err(e) => {
                    counters.record(&e);
                    report.failed += 1;
                    warn!(model = %model.display(), "{} - {}", e.kind(), e);
                }
            }
        }

        report
    }

    /// Resolve, encode and splice a single occurrence.
    fn rewrite_occurrence(
        &self,
        model: &Path,
        buffer: &mut [u8],
        occurrence: PathOccurrence,
    ) -> Result<(), RewriteError> {
        let hardcoded = decode_wide(occurrence.bytes(buffer));
        info!(
            index = occurrence.start(),
            "HardcodedPath=\"{}\"", hardcoded
        );

        let texture = self.resolver.resolve(&hardcoded)?;
        let name = hardcoded
            .rsplit(LEGACY_SEPARATOR)
            .next()
            .unwrap_or_default();

        let relative = relative_texture_path(model, texture.path()).unwrap_or_default();
        info!("RelativePath=\"{}\"", relative);

        let replacement = encode_replacement(&relative, name, occurrence.len())?;
        buffer[occurrence.range()].copy_from_slice(&replacement);

        Ok(())
    }

    /// Read a model file, fix it and write it back in place.
    ///
    /// The file is only written when at least one path was rewritten and the
    /// fixer is not in dry-run mode.
    pub fn fix_file(&self, model: &Path, counters: &mut RewriteCounters) -> FixResult<ModelReport> {
        info!("Model File = \"{}\"", model.display());

        let mut buffer = std::fs::read(model).map_err(|source| FixError::ReadFailed {
            path: model.to_path_buf(),
            source,
        })?;

        let mut report = self.fix_buffer(model, &mut buffer, counters);

        if report.rewritten > 0 && !self.dry_run {
            std::fs::write(model, &buffer).map_err(|source| FixError::WriteFailed {
                path: model.to_path_buf(),
                source,
            })?;
            report.written = true;
        }

        Ok(report)
    }
}

/// Fix every model under `root`.
///
/// Fails only when `root` is not an existing directory. Every other problem is
/// logged, counted and reported in the returned [`RunReport`].
pub fn run(root: &Path, config: &FixerConfig) -> FixResult<RunReport> {
    let not_found = || FixError::RootNotFound(root.to_path_buf());
    let discovery = FileDiscovery::new(root.canonicalize().map_err(|_| not_found())?, config);
    if !discovery.exists() {
        return Err(not_found());
    }

    info!("Scanning \"{}\"", discovery.root().display());
    let found = discovery.discover();
    info!("Found {} model files!...", found.models.len());
    info!("Found {} texture files!...", found.textures.len());

    let index = TextureIndex::build(found.textures);
    debug!(
        textures = index.len(),
        names = index.name_count(),
        duplicates = index.duplicate_names().len(),
        "Texture index built"
    );
    let fixer = ModelFixer::new(&index, config);

    let mut report = RunReport {
        textures_indexed: index.len(),
        duplicate_names: index.duplicate_names().to_vec(),
        dry_run: config.dry_run,
        ..Default::default()
    };

    let total = found.models.len();
    for (i, model) in found.models.iter().enumerate() {
        info!("Processing file {}/{}...", i + 1, total);

        let model_report = match fixer.fix_file(model, &mut report.counters) {
            Ok(model_report) => model_report,
            Err(e) => {
                error!(error = %e, "Model skipped");
                ModelReport {
                    io_error: Some(e.to_string()),
                    ..ModelReport::new(model)
                }
            }
        };
        report.models.push(model_report);
    }

    for line in report.to_text().lines() {
        info!("{}", line);
    }

    Ok(report)
}
