//! Common test utilities

#![allow(dead_code)]

use assert_cmd::Command;
use sigcli::Invocation;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

/// Command for one of the demo binaries, with debug output off
pub fn demo(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.env_remove("SIGCLI_DEBUG");
    cmd
}

/// Create a temporary directory with an overrides.yml file
pub fn create_override_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("overrides.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Shared log of handler invocations
pub type Calls = Rc<RefCell<Vec<Invocation>>>;

/// Handler that records each invocation
pub fn recorder(calls: &Calls) -> impl Fn(&Invocation) -> anyhow::Result<()> + 'static {
    let calls = Rc::clone(calls);
    move |call: &Invocation| {
        calls.borrow_mut().push(call.clone());
        Ok(())
    }
}
