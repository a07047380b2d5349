use crate::IntegrationHarness;
use intakeflow::config::{self, WizardConfig};

#[test]
fn config_round_trips_through_workspace_home() {
    let harness = IntegrationHarness::new();
    harness.use_as_home();

    let defaults = config::load_or_default().expect("missing config falls back to defaults");
    assert_eq!(defaults, WizardConfig::default());
    assert!(!config::config_file_path()
        .expect("config path resolves")
        .exists());

    let mut custom = harness.config();
    custom.validation.infer_required_from_text = false;
    custom.sessions.autosave = false;
    config::save(&custom).expect("config saves");

    let path = config::config_file_path().expect("config path resolves");
    assert!(path.starts_with(harness.workspace_path()));
    let loaded = config::load_or_default().expect("config loads");
    assert_eq!(loaded, custom);
    assert_eq!(
        config::snapshot_dir(&loaded).expect("snapshot dir resolves"),
        harness.snapshot_dir()
    );
}
