//! Patch execution.
//!
//! A run opens stores lazily, applies the Lookup, Add and Update phases in
//! that order, and only writes modified stores once every instruction has
//! succeeded. Any instruction failure aborts the run with nothing written.
//! A failing save during the commit reports `StoreWriteFailed`, but files
//! saved before it remain in the output directory.

mod add;
mod columns;
mod lookup;
mod references;
mod run;
mod update;

pub use references::next_generated_id;

use crate::{
    error::{ErrorOrigin, PatchError, PatchResultCode},
    obs::{PatchPhase, PatchTraceEvent, PatchTraceSink},
    patch::{Patch, TargetsFile},
    provider::{LoadOptions, StorageProvider},
    store::StoreManager,
};
use rowpatch_config::PatcherConfig;
use run::PatchRun;
use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

///
/// PatchReport
///
/// Outcome of a successful run.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatchReport {
    /// Output paths written, in first-mutation order.
    pub written: Vec<PathBuf>,
    /// Reference bindings at the end of the run.
    pub references: BTreeMap<String, i64>,
}

impl PatchReport {
    #[must_use]
    pub const fn code(&self) -> PatchResultCode {
        PatchResultCode::Ok
    }
}

///
/// Patcher
///

pub struct Patcher<P: StorageProvider> {
    config: PatcherConfig,
    provider: P,
    debug: bool,
    trace: Option<Arc<dyn PatchTraceSink>>,
}

impl<P: StorageProvider> Patcher<P> {
    // ======================================================================
    // Construction & configuration
    // ======================================================================

    #[must_use]
    pub fn new(config: PatcherConfig, provider: P) -> Self {
        let debug = config.debug;

        Self {
            config,
            provider,
            debug,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn PatchTraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &PatcherConfig {
        &self.config
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    fn emit(&self, event: PatchTraceEvent) {
        if let Some(sink) = &self.trace {
            sink.on_event(event);
        }
    }

    // ======================================================================
    // Execution
    // ======================================================================

    /// Apply `patch` to the configured input files.
    ///
    /// Every call starts from the files on disk with an empty reference
    /// table; nothing carries over between calls. If a save fails while
    /// committing, the outputs already saved are left in place.
    pub fn apply_patch(&self, patch: &Patch) -> Result<PatchReport, PatchError> {
        let options = LoadOptions {
            build: &self.config.build,
            locale: self.config.locale,
        };
        let stores = StoreManager::new(&self.provider, &self.config.input_dir, options);
        let mut run = PatchRun::new(stores, self.debug);

        self.debug_log(format!(
            "patch: {} lookup, {} add, {} update instruction(s)",
            patch.lookup.len(),
            patch.add.len(),
            patch.update.len()
        ));
        self.emit(PatchTraceEvent::RunStart {
            instructions: patch.len(),
        });

        self.run_phase(&mut run, PatchPhase::Lookup, &patch.lookup, PatchRun::lookup)?;
        self.run_phase(&mut run, PatchPhase::Add, &patch.add, PatchRun::add)?;
        self.run_phase(&mut run, PatchPhase::Update, &patch.update, PatchRun::update)?;

        let written = match run.commit(&self.config.output_dir) {
            Ok(written) => written,
            Err(err) => {
                let err = PatchError::new(
                    PatchResultCode::StoreWriteFailed,
                    ErrorOrigin::Provider,
                    err.to_string(),
                );
                self.debug_log(format!("commit failed: {err}"));
                self.emit(PatchTraceEvent::CommitFailed { code: err.code() });

                return Err(err);
            }
        };

        self.debug_log(format!("committed {} file(s)", written.len()));
        self.emit(PatchTraceEvent::Committed {
            files: written.clone(),
        });

        Ok(PatchReport {
            written,
            references: run.into_references().into_inner(),
        })
    }

    fn run_phase<'a, I: TargetsFile>(
        &self,
        run: &mut PatchRun<'a, P>,
        phase: PatchPhase,
        instructions: &[I],
        apply: fn(&mut PatchRun<'a, P>, &I) -> Result<(), PatchError>,
    ) -> Result<(), PatchError> {
        self.debug_log(format!("{phase}: {} instruction(s)", instructions.len()));
        self.emit(PatchTraceEvent::PhaseStart {
            phase,
            instructions: instructions.len(),
        });

        for (index, instruction) in instructions.iter().enumerate() {
            let file = instruction.file_name();
            let result = if file.is_empty() {
                Err(PatchError::engine(
                    PatchResultCode::InvalidArgument,
                    format!("Found {phase} instruction #{index} without a file name."),
                ))
            } else {
                apply(run, instruction)
            };

            if let Err(err) = result {
                self.debug_log(format!("{phase} #{index} on '{file}' failed: {err}"));
                self.emit(PatchTraceEvent::Aborted {
                    phase,
                    index,
                    code: err.code(),
                });

                return Err(err);
            }

            self.emit(PatchTraceEvent::InstructionFinished {
                phase,
                index,
                file: file.to_string(),
                code: PatchResultCode::Ok,
            });
        }

        Ok(())
    }
}
