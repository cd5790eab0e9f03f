fn main() {
    // Writes `built.rs` into OUT_DIR; the git commit hash feeds `/health` and `--version`.
    if let Err(err) = built::write_built_file() {
        println!("cargo:warning=failed to acquire build-time information: {err}");
    }
}
