// src/buildinfo.rs
//! Build metadata, filled in by the release pipeline through env vars at
//! compile time.

pub const GIT_COMMIT: &str = match option_env!("SPOTBOT_GIT_COMMIT") {
    Some(v) => v,
    None => "dev",
};

pub const GIT_BRANCH: &str = match option_env!("SPOTBOT_GIT_BRANCH") {
    Some(v) => v,
    None => "local",
};

pub const GIT_TAG: &str = match option_env!("SPOTBOT_GIT_TAG") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

pub const BUILD_DATE: &str = match option_env!("SPOTBOT_BUILD_DATE") {
    Some(v) => v,
    None => "N/A",
};

pub fn render() -> String {
    format!(
        "--- Application Build Info ---\n\
         Version:     {GIT_TAG}\n\
         Branch:      {GIT_BRANCH}\n\
         Commit Hash: {GIT_COMMIT}\n\
         Build Date:  {BUILD_DATE}"
    )
}
