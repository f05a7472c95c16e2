use std::path::PathBuf;

fn static_fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/tests/fixtures/static")
}

/// Stands in for `wwwroot`.
pub fn server_root() -> PathBuf {
    static_fixtures().join("wwwroot")
}

/// Stands in for the client build output.
pub fn client_root() -> PathBuf {
    static_fixtures().join("client")
}
