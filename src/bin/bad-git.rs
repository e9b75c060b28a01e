//! A toy `git` whose sub-commands are declared as signatures.

use sigcli::{App, Invocation, Param, Signature, Value, ValueType};
use std::process;

fn verbose(call: &Invocation) -> bool {
    call.global("verbose").and_then(Value::as_bool).unwrap_or(false)
}

fn text(call: &Invocation, name: &str) -> String {
    call.get(name).map(|v| v.to_string()).unwrap_or_default()
}

fn clone(call: &Invocation) -> anyhow::Result<()> {
    let branch = match call.get("branch") {
        Some(Value::Str(b)) => format!(" -b {}", b),
        _ => String::new(),
    };
    if verbose(call) {
        println!("git clone{} {} {}", branch, text(call, "url"), text(call, "target"));
    }
    Ok(())
}

fn push(call: &Invocation) -> anyhow::Result<()> {
    let force = call.get("force").and_then(|v| v.as_bool()).unwrap_or(false);
    if verbose(call) {
        println!(
            "git push{} {} {}",
            if force { " -f" } else { "" },
            text(call, "remote"),
            text(call, "branch")
        );
    }
    Ok(())
}

fn commit(call: &Invocation) -> anyhow::Result<()> {
    println!("all={}", text(call, "all"));
    println!("message={}", text(call, "message"));
    Ok(())
}

fn add(call: &Invocation) -> anyhow::Result<()> {
    let files: Vec<String> = call.variadic.iter().map(|v| v.to_string()).collect();
    if verbose(call) {
        println!("adding files: {:?}", files);
    }
    if call.kwarg("updated").and_then(Value::as_bool).unwrap_or(false) {
        println!("updated only");
    }
    Ok(())
}

fn build() -> sigcli::Result<App> {
    let mut app = App::new("bad-git").about("A really lame version of git.");
    app.global_arg(
        Param::positional("verbose")
            .default(false)
            .flags(["verbose", "-v"])
            .help("Print what would run"),
    )?;

    app.arg("commit", "all", ["-a"], sigcli::options([("help", "Commit all changed files")]))
        .arg("commit", "message", ["-m"], Default::default())
        .arg("add", "updated", ["-u"], Default::default());

    app.subcommand(
        Signature::new("clone")
            .doc(
                "Clone the branch so you can melt your computer.

                Args:
                  url: Repository to clone
                  target: Directory to clone into
                ",
            )
            .param(Param::positional("url"))
            .param(Param::positional("target").ty(ValueType::Path))
            .param(Param::positional("branch").default(Value::None)),
        clone,
    )?
    .subcommand(
        Signature::new("push")
            .param(Param::positional("remote"))
            .param(Param::positional("branch"))
            .param(Param::positional("force").default(false)),
        push,
    )?
    .subcommand(
        Signature::new("commit")
            .param(Param::positional("all").default(false))
            .param(Param::positional("message").default(Value::None)),
        commit,
    )?
    .subcommand(
        Signature::new("add")
            .param(Param::variadic("files"))
            .param(Param::positional("updated").default(false)),
        add,
    )?;

    Ok(app)
}

fn main() {
    match build() {
        Ok(app) => app.dispatch(),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
