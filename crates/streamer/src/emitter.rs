use log::{debug, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::{MalformedPolicy, StreamConfig};
use crate::error::{Result, StreamError};
use crate::lines::LineReader;
use crate::naming::{extract_field, output_name, sanitize_field, Counter};
use crate::pacer::{FixedInterval, Pacer};

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmitSummary {
    /// Source files whose lines were emitted.
    pub files_processed: usize,
    /// Directory entries that did not pass the suffix filter or were not files.
    pub files_ignored: usize,
    pub lines_emitted: usize,
    /// Malformed lines dropped under [`MalformedPolicy::Skip`].
    pub lines_skipped: usize,
    /// Every output path written, in emission order.
    pub outputs: Vec<PathBuf>,
}

/// Fans the lines of every matching source file out into one output file each.
pub struct LineEmitter<P = FixedInterval> {
    config: StreamConfig,
    pacer: P,
    counter: Counter,
}

impl LineEmitter<FixedInterval> {
    /// Emitter that sleeps for the configured interval after each emission.
    pub fn new(config: StreamConfig) -> Self {
        let pacer = FixedInterval::new(config.interval());
        Self::with_pacer(config, pacer)
    }
}

impl<P: Pacer> LineEmitter<P> {
    pub fn with_pacer(config: StreamConfig, pacer: P) -> Self {
        let counter = Counter::new(config.counter_mode);
        Self {
            config,
            pacer,
            counter,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Processes every matching source file, one after another.
    ///
    /// Stops at the first fatal error. Outputs written before the failure stay
    /// on disk.
    pub fn run(&mut self) -> Result<EmitSummary> {
        println!("Streaming ...");

        let mut summary = EmitSummary::default();
        let (sources, ignored) = self.scan_sources()?;
        summary.files_ignored = ignored;

        for source in &sources {
            self.emit_file(source, &mut summary)?;
        }

        info!(
            "Done. Emitted {} lines from {} files ({} lines skipped).",
            summary.lines_emitted, summary.files_processed, summary.lines_skipped
        );
        Ok(summary)
    }

    /// Source files passing the suffix filter, in processing order.
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.scan_sources()?.0)
    }

    fn scan_sources(&self) -> Result<(Vec<PathBuf>, usize)> {
        let dir = &self.config.source_dir;
        let source_dir_err = |source| StreamError::SourceDir {
            path: dir.clone(),
            source,
        };

        let mut files = Vec::new();
        let mut ignored = 0;
        for entry in fs::read_dir(dir).map_err(source_dir_err)? {
            let entry = entry.map_err(source_dir_err)?;
            let path = entry.path();

            if !entry.file_name().to_string_lossy().ends_with(&self.config.suffix) {
                ignored += 1;
                continue;
            }
            if path.is_dir() {
                debug!("Ignoring directory {:?}", path);
                ignored += 1;
                continue;
            }
            files.push(path);
        }

        if self.config.sorted {
            files.sort();
        }
        Ok((files, ignored))
    }

    /// Emits every line of one source file, pausing after each emission.
    pub fn emit_file(&mut self, path: &Path, summary: &mut EmitSummary) -> Result<()> {
        let source_file_err = |source| StreamError::SourceFile {
            path: path.to_path_buf(),
            source,
        };

        info!("Streaming {:?}", path);
        let file = File::open(path).map_err(source_file_err)?;
        let reader = LineReader::new(BufReader::new(file));

        self.counter.begin_file();
        for (idx, line) in reader.enumerate() {
            let line = line.map_err(source_file_err)?;
            self.counter.begin_line();

            let field = match extract_field(&line, self.config.field_index) {
                Some(field) => field,
                None => match self.config.malformed_lines {
                    MalformedPolicy::Abort => {
                        return Err(StreamError::MalformedLine {
                            path: path.to_path_buf(),
                            line: idx + 1,
                            index: self.config.field_index,
                        });
                    }
                    MalformedPolicy::Skip => {
                        warn!(
                            "Skipping {:?} line {}: no field at index {}",
                            path,
                            idx + 1,
                            self.config.field_index
                        );
                        summary.lines_skipped += 1;
                        continue;
                    }
                },
            };

            let name = output_name(
                &self.config.prefix,
                self.counter.current(),
                &sanitize_field(field, self.config.field_policy),
            );
            self.counter.advance();

            let target = self.config.destination_dir.join(name);
            fs::write(&target, line.as_bytes()).map_err(|source| StreamError::Write {
                path: target.clone(),
                source,
            })?;
            debug!("Emitted {:?}", target);

            summary.lines_emitted += 1;
            summary.outputs.push(target);
            self.pacer.pause();
        }

        summary.files_processed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CounterMode;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingPacer(usize);

    impl Pacer for CountingPacer {
        fn pause(&mut self) {
            self.0 += 1;
        }
    }

    fn setup(config: impl FnOnce(&mut StreamConfig)) -> (TempDir, StreamConfig) {
        let root = tempfile::tempdir().unwrap();
        let mut cfg = StreamConfig {
            source_dir: root.path().join("src"),
            destination_dir: root.path().join("out"),
            interval_ms: 0,
            ..StreamConfig::default()
        };
        fs::create_dir(&cfg.source_dir).unwrap();
        fs::create_dir(&cfg.destination_dir).unwrap();
        config(&mut cfg);
        (root, cfg)
    }

    #[test]
    fn pauses_once_per_emission() {
        let (_root, cfg) = setup(|_| {});
        fs::write(cfg.source_dir.join("a.csv"), "1,x\n2,y\n3,z\n").unwrap();

        let mut pacer = CountingPacer::default();
        let summary = LineEmitter::with_pacer(cfg, &mut pacer).run().unwrap();

        assert_eq!(summary.lines_emitted, 3);
        assert_eq!(pacer.0, 3);
    }

    #[test]
    fn skipped_lines_do_not_pause() {
        let (_root, cfg) = setup(|c| c.malformed_lines = MalformedPolicy::Skip);
        fs::write(cfg.source_dir.join("a.csv"), "bad\n1,ok\n").unwrap();

        let mut pacer = CountingPacer::default();
        let summary = LineEmitter::with_pacer(cfg, &mut pacer).run().unwrap();

        assert_eq!(summary.lines_skipped, 1);
        assert_eq!(summary.lines_emitted, 1);
        assert_eq!(pacer.0, 1);
    }

    #[test]
    fn per_file_counter_restarts_for_each_source() {
        let (_root, cfg) = setup(|c| {
            c.counter_mode = CounterMode::PerFile;
            c.sorted = true;
        });
        fs::write(cfg.source_dir.join("a.csv"), "1,x\n2,x\n").unwrap();
        fs::write(cfg.source_dir.join("b.csv"), "1,y\n").unwrap();

        let out = cfg.destination_dir.clone();
        let summary = LineEmitter::with_pacer(cfg, CountingPacer::default()).run().unwrap();

        assert_eq!(
            summary.outputs,
            vec![
                out.join("tweet - 0#x\n.csv"),
                out.join("tweet - 1#x\n.csv"),
                out.join("tweet - 0#y\n.csv"),
            ]
        );
    }

    #[test]
    fn sorted_listing_orders_by_name() {
        let (_root, cfg) = setup(|c| c.sorted = true);
        for name in ["c.csv", "a.csv", "b.csv", "notes.txt"] {
            fs::write(cfg.source_dir.join(name), "").unwrap();
        }

        let emitter = LineEmitter::with_pacer(cfg, CountingPacer::default());
        let files = emitter.source_files().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }
}
