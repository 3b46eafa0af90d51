use std::path::PathBuf;

pub fn default_src() -> PathBuf {
    PathBuf::from("./src")
}

pub fn default_dist() -> PathBuf {
    PathBuf::from("./dist")
}

pub fn default_target() -> Vec<String> {
    vec!["es2022".to_string()]
}

pub fn default_dts() -> bool {
    true
}

pub fn default_debounce_ms() -> u64 {
    wisp_bundler::DEFAULT_DEBOUNCE.as_millis() as u64
}
