use intakeflow::config::WizardConfig;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

const CATALOG_FIXTURE: &str = "tests/fixtures/intake_catalog.json";

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.workspace.path().join("sessions")
    }

    pub fn config(&self) -> WizardConfig {
        let mut config = WizardConfig::default();
        config.sessions.snapshot_dir = Some(self.snapshot_dir());
        config
    }

    /// Points `INTAKEFLOW_HOME` at this workspace.
    pub fn use_as_home(&self) {
        env::set_var("INTAKEFLOW_HOME", self.workspace.path());
    }
}

pub fn catalog_fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(CATALOG_FIXTURE)
}

mod config_roundtrip;
mod wizard_flow;
mod wizard_resume;
mod wizard_submit;
pub mod support;

#[test]
fn catalog_fixture_exists() {
    assert!(
        catalog_fixture_path().exists(),
        "Expected catalog fixture to exist: {CATALOG_FIXTURE}"
    );
}
