//! CLI driver for the unit-of-work registry.
//!
//! # Responsibility
//! - Replay a `<category> <id>` argument script against one registry.
//! - Print the resulting per-category identities as JSON.
//!
//! Usage: `datamapper_cli new 5 dirty 7 deleted 5`

use datamapper_core::{
    core_version, init_logging, parse_category, Category, Entity, LoggingConfig, UnitOfWork,
};
use log::{error, info};
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

/// Identity-only entity built from command-line input.
struct ScriptEntity {
    id: String,
}

impl Entity for ScriptEntity {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

fn main() -> ExitCode {
    let config = match LoggingConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid logging configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match collect_args(std::env::args_os().skip(1)).and_then(|args| run(&args)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn collect_args(raw: impl IntoIterator<Item = OsString>) -> Result<Vec<String>, String> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            value.into_string().map_err(|value| {
                format!("argument {index} is not valid UTF-8: {}", value.to_string_lossy())
            })
        })
        .collect()
}

fn run(args: &[String]) -> Result<String, String> {
    if args.len() % 2 != 0 {
        return Err("expected `<new|dirty|deleted> <id>` pairs".to_string());
    }
    info!(
        "event=cli_run module=cli status=start version={} steps={}",
        core_version(),
        args.len() / 2
    );

    let mut unit = UnitOfWork::new();
    for (step, pair) in args.chunks(2).enumerate() {
        let category = parse_category(&pair[0]).map_err(|err| format!("step {step}: {err}"))?;
        let entity = Arc::new(ScriptEntity {
            id: pair[1].clone(),
        });
        let registered = match category {
            Category::New => unit.register_new(&entity),
            Category::Dirty => unit.register_dirty(&entity),
            Category::Deleted => unit.register_deleted(&entity),
        };
        registered.map_err(|err| format!("step {step}: {err}"))?;
    }

    let report = serde_json::json!({
        "summary": unit.summary(),
        "new": unit.new_objects().keys().collect::<Vec<_>>(),
        "dirty": unit.dirty_objects().keys().collect::<Vec<_>>(),
        "deleted": unit.deleted_objects().keys().collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{collect_args, run};
    use std::ffi::OsString;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn replays_script_into_report() {
        let output = run(&args(&["new", "5", "dirty", "7", "deleted", "5", "deleted", "7"]))
            .expect("script should succeed");
        let report: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(report["summary"]["new"], 0);
        assert_eq!(report["summary"]["deleted"], 1);
        assert_eq!(report["deleted"], serde_json::json!(["7"]));
    }

    #[test]
    fn reports_step_of_first_conflict() {
        let err = run(&args(&["dirty", "5", "new", "5"])).expect_err("conflict should fail");
        assert!(err.starts_with("step 1:"));
        assert!(err.contains("already registered as dirty"));
    }

    #[test]
    fn rejects_unknown_category_and_odd_arguments() {
        let err = run(&args(&["some-state", "5"])).expect_err("unknown category should fail");
        assert!(err.contains("unknown registry"));

        assert!(run(&args(&["new"])).is_err());
    }

    #[test]
    fn collect_args_accepts_utf8_arguments() {
        let collected = collect_args(vec![OsString::from("new"), OsString::from("5")])
            .expect("UTF-8 arguments should convert");
        assert_eq!(collected, args(&["new", "5"]));
    }

    #[cfg(unix)]
    #[test]
    fn collect_args_rejects_non_utf8_argument() {
        use std::os::unix::ffi::OsStringExt;

        let invalid = OsString::from_vec(vec![0x66, 0x80, 0x6f]);
        let err = collect_args(vec![OsString::from("new"), invalid])
            .expect_err("non-UTF-8 argument should fail");
        assert!(err.starts_with("argument 1 is not valid UTF-8"));
    }
}
