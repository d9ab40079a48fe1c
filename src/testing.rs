//! In-memory stand-ins for the external collaborators, used by unit tests

use crate::actions::OutputReporter;
use crate::cache::{CacheKey, CachePaths, CacheStore};
use crate::error::SetupResult;
use crate::process::{CommandSpec, ExecutionPath, ProcessOutput, ProcessRunner, WhichResolver};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct Rule {
    prefix: Vec<String>,
    responses: VecDeque<ProcessOutput>,
}

/// Scripted process runner. Commands are matched by a prefix of
/// `program args...`; the first matching rule answers. Sequenced responses
/// are consumed in order and the last one repeats. Unmatched commands exit 0.
#[derive(Default)]
pub(crate) struct FakeRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit(code: i32) -> ProcessOutput {
        ProcessOutput {
            code,
            ..Default::default()
        }
    }

    pub fn stdout(text: &str) -> ProcessOutput {
        ProcessOutput {
            code: 0,
            stdout: text.to_string(),
            stderr: String::new(),
        }
    }

    pub fn on(self, prefix: &[&str], output: ProcessOutput) -> Self {
        self.on_seq(prefix, vec![output])
    }

    pub fn on_seq(mut self, prefix: &[&str], outputs: Vec<ProcessOutput>) -> Self {
        self.rules.get_mut().unwrap().push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            responses: outputs.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|spec| Self::matches(spec, prefix))
            .count()
    }

    fn matches<S: AsRef<str>>(spec: &CommandSpec, prefix: &[S]) -> bool {
        let words: Vec<&str> = std::iter::once(spec.program.as_str())
            .chain(spec.args.iter().map(String::as_str))
            .collect();
        prefix.len() <= words.len()
            && prefix.iter().zip(&words).all(|(p, w)| p.as_ref() == *w)
    }

    fn respond(&self, spec: &CommandSpec) -> ProcessOutput {
        self.calls.lock().unwrap().push(spec.clone());

        let mut rules = self.rules.lock().unwrap();
        let rule = rules.iter_mut().find(|rule| Self::matches(spec, &rule.prefix[..]));
        match rule {
            Some(rule) if rule.responses.len() > 1 => rule.responses.pop_front().unwrap_or_default(),
            Some(rule) => rule.responses.front().cloned().unwrap_or_default(),
            None => ProcessOutput::default(),
        }
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn exec(&self, command: &CommandSpec) -> SetupResult<i32> {
        Ok(self.respond(command).code)
    }

    async fn exec_output(&self, command: &CommandSpec) -> SetupResult<ProcessOutput> {
        Ok(self.respond(command))
    }
}

/// Resolver that knows a fixed set of binaries
#[derive(Default)]
pub(crate) struct FakeResolver {
    known: HashSet<String>,
}

impl FakeResolver {
    pub fn with(binaries: &[&str]) -> Self {
        Self {
            known: binaries.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WhichResolver for FakeResolver {
    fn resolve(&self, binary: &str, _path: &ExecutionPath) -> Option<PathBuf> {
        self.known
            .contains(binary)
            .then(|| PathBuf::from("/usr/bin").join(binary))
    }
}

/// Cache store that answers every restore with a fixed key
#[derive(Default)]
pub(crate) struct FakeStore {
    restored: Option<CacheKey>,
    restores: Mutex<usize>,
    saves: Mutex<Vec<CacheKey>>,
}

impl FakeStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(key: CacheKey) -> Self {
        Self {
            restored: Some(key),
            ..Default::default()
        }
    }

    pub fn restores(&self) -> usize {
        *self.restores.lock().unwrap()
    }

    pub fn saves(&self) -> Vec<CacheKey> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheStore for FakeStore {
    async fn restore(&self, _paths: &CachePaths, _key: &CacheKey) -> Option<CacheKey> {
        *self.restores.lock().unwrap() += 1;
        self.restored.clone()
    }

    async fn save(&self, _paths: &CachePaths, key: &CacheKey) -> SetupResult<()> {
        self.saves.lock().unwrap().push(key.clone());
        Ok(())
    }
}

/// Reporter that records everything
#[derive(Default)]
pub(crate) struct MemoryReporter {
    outputs: Mutex<Vec<(String, String)>>,
    states: Mutex<Vec<(String, String)>>,
    paths: Mutex<Vec<PathBuf>>,
    warnings: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn last(entries: &Mutex<Vec<(String, String)>>, name: &str) -> Option<String> {
        entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn output(&self, name: &str) -> Option<String> {
        Self::last(&self.outputs, name)
    }

    pub fn state(&self, name: &str) -> Option<String> {
        Self::last(&self.states, name)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl OutputReporter for MemoryReporter {
    fn set_output(&self, name: &str, value: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
    }

    fn save_state(&self, name: &str, value: &str) {
        self.states
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
    }

    fn add_path(&self, dir: &Path) {
        self.paths.lock().unwrap().push(dir.to_path_buf());
    }

    fn info(&self, _message: &str) {}

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}
