//! The sample files shipped in `data/` load, validate and run end to end.

use std::path::PathBuf;

use wayfinder_demo::cli::{Cli, Commands, InputArgs, RunArgs, ValidateArgs, run, validate};
use wayfinder_demo::host::Entry;
use wayfinder_demo::runner::{RunSettings, Runner};
use wayfinder_demo::scene::{load_catalog, load_options, load_scene};
use wayfinder_demo::script::parse_script;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn input() -> InputArgs {
    InputArgs {
        catalog: data("catalog.toml"),
        options: data("tour.toml"),
    }
}

#[test]
fn bundled_files_validate_cleanly() {
    let problems = validate(&input()).expect("load");
    assert!(problems.is_empty(), "{problems:?}");
}

#[test]
fn bundled_tour_visits_every_step() {
    let catalog = load_catalog(&data("catalog.toml")).expect("catalog");
    let options = load_options(&data("tour.toml")).expect("options");
    let scene = load_scene(&data("scene.toml")).expect("scene");
    let expected = options.steps.clone();

    let mut runner = Runner::new(catalog, scene, RunSettings::default()).expect("runner");
    runner.start(options).expect("start");
    runner.run_script(&[]);
    let entries = runner.finish();

    let visited: Vec<String> = entries
        .iter()
        .filter_map(|e| match e {
            Entry::Step(info) => Some(info.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(visited, expected);

    let welcome_side = entries.iter().find_map(|e| match e {
        Entry::Mount { step, side, .. } if step == "welcome" => Some(*side),
        _ => None,
    });
    assert_eq!(welcome_side, Some(wayfinder::Side::Center));
}

#[test]
fn scripted_run_with_scroll_and_prev() {
    let catalog = load_catalog(&data("catalog.toml")).expect("catalog");
    let options = load_options(&data("tour.toml")).expect("options");
    let scene = load_scene(&data("scene.toml")).expect("scene");
    let script = parse_script("next,scroll:0x200,prev,close").expect("script");

    let mut runner = Runner::new(catalog, scene, RunSettings::default()).expect("runner");
    runner.start(options).expect("start");
    runner.run_script(&script);
    let entries = runner.finish();

    assert!(entries.iter().any(|e| matches!(e, Entry::Reposition { .. })));
    let last_step = entries.iter().rev().find_map(|e| match e {
        Entry::Step(info) => Some(info.name.clone()),
        _ => None,
    });
    assert_eq!(last_step.as_deref(), Some("welcome"));
    assert!(entries.contains(&Entry::ScrollToOrigin));
}

#[test]
fn json_options_are_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tour.json");
    std::fs::write(&path, r#"{"steps":["welcome","events"],"waiting_time_ms":5}"#).expect("write");

    let options = load_options(&path).expect("json options");
    assert_eq!(options.steps, vec!["welcome", "events"]);
    assert_eq!(options.waiting_time_ms, 5);
}

#[test]
fn validation_flags_unknown_steps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tour.toml");
    std::fs::write(&path, "steps = [\"welcome\", \"nowhere\", \"welcome\"]\nfirst_step = \"gone\"\n")
        .expect("write");

    let problems = validate(&InputArgs {
        catalog: data("catalog.toml"),
        options: path.clone(),
    })
    .expect("load");
    assert_eq!(problems.len(), 3, "{problems:?}");

    let err = run(Cli {
        log_json: false,
        verbose: 0,
        command: Commands::Validate(ValidateArgs {
            input: InputArgs {
                catalog: data("catalog.toml"),
                options: path,
            },
        }),
    })
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn run_command_prints_json_transcript() {
    let result = run(Cli {
        log_json: false,
        verbose: 0,
        command: Commands::Run(RunArgs {
            input: input(),
            scene: data("scene.toml"),
            script: "next,close".to_string(),
            async_navigation: true,
            json: true,
        }),
    });
    assert!(result.is_ok(), "{result:?}");
}
