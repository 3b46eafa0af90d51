//! Shared fixtures for wisp-bundler integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;
use wisp_bundler::{
    DeclarationEmitter, DeclarationRequest, Engine, EngineContext, EngineFailure, EngineOutput,
    EngineRequest, Result,
};

/// A package directory on disk with the given source files.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(sources: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for source in sources {
            let path = dir.path().join(source);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export default 1;\n").unwrap();
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

#[derive(Default)]
pub struct EngineLog {
    pub opened: Vec<EngineRequest>,
    pub rebuilds: usize,
}

/// Engine that writes a fixed body to the requested outfile.
#[derive(Clone, Default)]
pub struct StubEngine {
    pub log: Arc<Mutex<EngineLog>>,
    /// Output paths (file names) whose builds fail.
    pub failing: Arc<Mutex<Vec<String>>>,
}

impl StubEngine {
    pub fn opened(&self) -> Vec<EngineRequest> {
        self.log.lock().opened.clone()
    }

    pub fn rebuilds(&self) -> usize {
        self.log.lock().rebuilds
    }

    pub fn fail_on(&self, file_name: &str) {
        self.failing.lock().push(file_name.to_string());
    }
}

#[async_trait]
impl Engine for StubEngine {
    async fn open(
        &self,
        request: EngineRequest,
    ) -> std::result::Result<Box<dyn EngineContext>, EngineFailure> {
        self.log.lock().opened.push(request.clone());
        Ok(Box::new(StubContext {
            request,
            engine: self.clone(),
        }))
    }
}

struct StubContext {
    request: EngineRequest,
    engine: StubEngine,
}

#[async_trait]
impl EngineContext for StubContext {
    async fn rebuild(&mut self) -> std::result::Result<EngineOutput, EngineFailure> {
        self.engine.log.lock().rebuilds += 1;

        let file_name = self
            .request
            .outfile
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.engine.failing.lock().contains(&file_name) {
            return Err(EngineFailure::new(format!("cannot build {file_name}")));
        }

        if let Some(parent) = self.request.outfile.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&self.request.outfile, "console.log(1);\n").unwrap();
        Ok(EngineOutput {
            files: vec![self.request.outfile.clone()],
        })
    }
}

/// Declaration emitter that only counts calls.
#[derive(Clone, Default)]
pub struct CountingEmitter {
    pub calls: Arc<Mutex<Vec<DeclarationRequest>>>,
}

impl CountingEmitter {
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl DeclarationEmitter for CountingEmitter {
    async fn emit(&self, request: &DeclarationRequest) -> Result<()> {
        self.calls.lock().push(request.clone());
        Ok(())
    }
}
