use std::env;
use std::process::Command;

// Stamps `tally --version` with the commit it was built from. Packagers without
// a checkout can pass TALLY_BUILD_SHA through the environment instead.
fn main() {
    println!("cargo:rerun-if-env-changed=TALLY_BUILD_SHA");

    let sha = env::var("TALLY_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=TALLY_BUILD_SHA={sha}");
}

fn git_describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=9"])
        .current_dir(env::var_os("CARGO_MANIFEST_DIR")?)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let described = String::from_utf8(out.stdout).ok()?;
    let described = described.trim();
    (!described.is_empty()).then(|| described.to_string())
}
