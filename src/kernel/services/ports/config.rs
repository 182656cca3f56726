use super::settings::Settings;
use crate::kernel::language::LanguageId;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl InterpreterSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    pub timeout_ms: u64,
    pub interpreters: FxHashMap<LanguageId, InterpreterSpec>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        let mut interpreters = FxHashMap::default();
        interpreters.insert(LanguageId::JavaScript, InterpreterSpec::new("node", &[]));
        interpreters.insert(LanguageId::Python, InterpreterSpec::new("python3", &[]));
        interpreters.insert(LanguageId::Php, InterpreterSpec::new("php", &[]));
        interpreters.insert(LanguageId::Ruby, InterpreterSpec::new("ruby", &[]));
        interpreters.insert(LanguageId::Go, InterpreterSpec::new("go", &["run"]));
        Self {
            timeout_ms: 5000,
            interpreters,
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interpreter(&self, language: LanguageId) -> Option<&InterpreterSpec> {
        self.interpreters.get(&language)
    }
}

#[derive(Clone, Debug)]
pub struct PlaygroundConfig {
    pub autosave_enabled: bool,
    pub autosave_interval_ms: u64,
    /// false 时每次只保存活动标签
    pub autosave_all_tabs: bool,
    pub notification_duration_ms: u64,
    pub download_dir: Option<PathBuf>,
    pub execution: ExecutionConfig,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            autosave_interval_ms: 3000,
            autosave_all_tabs: true,
            notification_duration_ms: 5000,
            download_dir: None,
            execution: ExecutionConfig::default(),
        }
    }
}

impl PlaygroundConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut execution = ExecutionConfig {
            timeout_ms: settings.execution.timeout_ms.max(1),
            ..ExecutionConfig::default()
        };
        for rule in &settings.execution.interpreters {
            execution.interpreters.insert(
                rule.language,
                InterpreterSpec {
                    program: rule.program.clone(),
                    args: rule.args.clone(),
                },
            );
        }

        Self {
            autosave_enabled: settings.autosave.enabled,
            autosave_interval_ms: settings.autosave.interval_ms.max(100),
            autosave_all_tabs: settings.autosave.all_tabs,
            notification_duration_ms: settings.notifications.duration_ms,
            download_dir: settings.download_dir.as_ref().map(PathBuf::from),
            execution,
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }
}
