mod common;

use common::TestEnv;

#[test]
fn yaml_file_shows_the_file_as_written() {
    let env = TestEnv::with_fixture();

    let result = env.run(&["inspect", "yaml-file", "defs/leaf.yaml"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    assert!(result.stdout.starts_with("# Leaf ("));
    assert!(result.stdout.contains("require: solar/mid"));
    assert!(!result.stdout.contains("unit:"));
}

#[test]
fn yaml_file_resolve_layers_the_parents() {
    let env = TestEnv::with_fixture();

    let result = env.run(&["inspect", "yaml-file", "defs/leaf.yaml", "--resolve"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    assert!(result.stdout.contains("unit: W"));
    assert!(result.stdout.contains("description: The leaf"));
    assert!(!result.stdout.contains("require:"));
}

#[test]
fn yaml_file_json_event_carries_the_definition() {
    let env = TestEnv::with_fixture();

    let result = env.run(&["--json", "inspect", "yaml-file", "defs/other.yaml", "--resolve"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    let events = result.events();
    let data = events.last().unwrap();
    assert_eq!(data["event"], "data");
    assert_eq!(data["name"], "Other");
    assert_eq!(data["resolved"], true);
    assert_eq!(data["definition"]["unit"], "kW");
    assert_eq!(data["definition"]["label"], "Base quantity");
}

fn generated(env: &TestEnv) {
    let result = env.run(&[
        "generate",
        "--source-path",
        "defs",
        "--output-file",
        "definitions.py",
    ]);
    assert!(result.success, "stderr:\n{}", result.stderr);
}

#[test]
fn python_dictionary_lists_names() {
    let env = TestEnv::with_fixture();
    generated(&env);

    let result = env.run(&["inspect", "python-dictionary", "definitions.py"]);

    assert!(result.success, "stderr:\n{}", result.stderr);
    let mut names: Vec<&str> = result.stdout.lines().collect();
    names.sort();
    assert_eq!(names, vec!["Base", "Leaf", "Mid", "Other"]);
}

#[test]
fn python_dictionary_reads_attributes() {
    let env = TestEnv::with_fixture();
    generated(&env);

    let scalar = env.run(&[
        "inspect",
        "python-dictionary",
        "definitions.py",
        "--definition",
        "Leaf",
        "--attribute",
        "unit",
    ]);
    assert!(scalar.success, "stderr:\n{}", scalar.stderr);
    assert_eq!(scalar.stdout, "W\n");

    let nested = env.run(&[
        "--json",
        "inspect",
        "python-dictionary",
        "definitions.py",
        "--definition",
        "Leaf",
        "--attribute",
        "sections.output.structure",
    ]);
    assert!(nested.success, "stderr:\n{}", nested.stderr);
    let events = nested.events();
    let result = &events.last().unwrap()["result"];
    assert_eq!(result["kind"], "attribute");
    assert_eq!(result["value"][1]["section"], "b");
}

#[test]
fn python_dictionary_missing_attribute_fails() {
    let env = TestEnv::with_fixture();
    generated(&env);

    let result = env.run(&[
        "inspect",
        "python-dictionary",
        "definitions.py",
        "--definition",
        "Leaf",
        "--attribute",
        "nope",
    ]);

    assert!(!result.success);
    assert!(result.stderr.contains("attribute 'nope' not found"));
}

#[test]
fn python_dictionary_missing_definition_fails() {
    let env = TestEnv::with_fixture();
    generated(&env);

    let result = env.run(&[
        "inspect",
        "python-dictionary",
        "definitions.py",
        "--definition",
        "Ghost",
    ]);

    assert!(!result.success);
    assert!(result.stderr.contains("definition 'Ghost' not found"));
}

#[test]
fn attribute_requires_a_definition() {
    let env = TestEnv::with_fixture();

    let result = env.run(&[
        "inspect",
        "python-dictionary",
        "definitions.py",
        "--attribute",
        "unit",
    ]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 2);
}
