//! Greets somebody, a configurable number of times.

use sigcli::{App, Invocation, Param, Signature, ValueType};
use std::process;

fn say_hello(call: &Invocation) -> anyhow::Result<()> {
    let name = call.get("name").map(|v| v.to_string()).unwrap_or_default();
    let greeting = call.get("greeting").map(|v| v.to_string()).unwrap_or_default();
    let times = call.get("num_times").and_then(|v| v.as_i64()).unwrap_or(1);

    if times < 0 {
        anyhow::bail!("num-times must not be negative, got {}", times);
    }
    for _ in 0..times {
        println!("{}, {}", greeting, name);
    }
    Ok(())
}

fn build() -> sigcli::Result<App> {
    let mut app = App::new("greet").version(sigcli::VERSION);
    app.arg("say_hello", "greeting", ["greeting", "-g"], sigcli::options([("help", "Greeting to use")]));
    app.main(
        Signature::new("say_hello")
            .doc(
                "Reach out and greet somebody.

                Args:
                  name: Who to greet
                  num_times: How many times to say it
                ",
            )
            .param(Param::positional("name").ty(ValueType::Str))
            .param(Param::positional("greeting").default("sup"))
            .param(Param::positional("num_times").default(1i64)),
        say_hello,
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
