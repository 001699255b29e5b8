use porter_fare::fare::estimator::{MaxFeaturesName, MaxFeaturesSetting};
use porter_fare::settings::{LogFormat, SettingsError};
use porter_fare::Settings;
use std::fs;

#[test]
fn files_layer_default_local_then_extra() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[corpus]\nsize = 300\n\n[estimator]\nseed = 1\nn_estimators = 20\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("local.toml"),
        "[estimator]\nseed = 2\nn_estimators = 50\n",
    )
    .unwrap();
    let extra = dir.path().join("extra.toml");
    fs::write(&extra, "[estimator]\nseed = 3\n\n[logging]\nformat = \"json\"\n").unwrap();

    let settings = Settings::load_from(dir.path(), Some(extra.as_path())).unwrap();
    assert_eq!(settings.corpus.size, 300);
    assert_eq!(settings.estimator.n_estimators, 50);
    assert_eq!(settings.estimator.seed, 3);
    assert_eq!(
        settings.estimator.max_features,
        MaxFeaturesSetting::Named(MaxFeaturesName::Sqrt)
    );
    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn missing_config_directory_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("absent"), None).unwrap();
    assert_eq!(settings.corpus.size, 200);
    assert_eq!(settings.estimator.n_estimators, 100);
    assert_eq!(settings.estimator.seed, 42);
}

#[test]
fn load_reads_extra_file() {
    let dir = tempfile::tempdir().unwrap();
    let extra = dir.path().join("porter.toml");
    fs::write(&extra, "[corpus]\nsize = 64\n").unwrap();

    let settings = Settings::load(Some(extra.as_path())).unwrap();
    assert_eq!(settings.corpus.size, 64);
}

#[test]
fn missing_extra_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
    assert!(matches!(err, SettingsError::Load(_)));
}

#[test]
fn invalid_layered_value_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("local.toml"), "[estimator]\nn_estimators = 0\n").unwrap();

    let err = Settings::load_from(dir.path(), None).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Invalid {
            key: "estimator.n_estimators",
            ..
        }
    ));
}
